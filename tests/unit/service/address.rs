use super::*;

#[test]
fn parses_original_addresses() {
    let addr = AssetAddress::parse("original:/photos/a.jpg").unwrap();
    assert_eq!(
        addr,
        AssetAddress::Original {
            source: PathBuf::from("/photos/a.jpg"),
        }
    );
}

#[test]
fn parses_bare_thumbnail_addresses() {
    let addr = AssetAddress::parse("thumb:/photos/a.jpg").unwrap();
    assert_eq!(
        addr,
        AssetAddress::Thumbnail(ThumbnailSpec {
            source: PathBuf::from("/photos/a.jpg"),
            width: None,
            crop: None,
        })
    );
}

#[test]
fn parses_size_and_crop_parameters() {
    let addr = AssetAddress::parse("thumb:/photos/a.jpg?size=512&crop=1,2,30,40").unwrap();
    assert_eq!(
        addr,
        AssetAddress::Thumbnail(ThumbnailSpec {
            source: PathBuf::from("/photos/a.jpg"),
            width: Some(512),
            crop: Some(CropRect::new(1, 2, 30, 40)),
        })
    );
}

#[test]
fn rejects_bad_addresses() {
    assert!(AssetAddress::parse("ftp:/photos/a.jpg").is_err());
    assert!(AssetAddress::parse("original:").is_err());
    assert!(AssetAddress::parse("thumb:").is_err());
    assert!(AssetAddress::parse("thumb:/a.jpg?size=0").is_err());
    assert!(AssetAddress::parse("thumb:/a.jpg?size=abc").is_err());
    assert!(AssetAddress::parse("thumb:/a.jpg?crop=1,2").is_err());
    assert!(AssetAddress::parse("thumb:/a.jpg?zoom=2").is_err());
    assert!(AssetAddress::parse("thumb:/a.jpg?size").is_err());
}

#[test]
fn display_round_trips() {
    for s in [
        "original:/photos/a.jpg",
        "thumb:/photos/a.jpg",
        "thumb:/photos/a.jpg?size=512",
        "thumb:/photos/a.jpg?crop=1,2,30,40",
        "thumb:/photos/a.jpg?size=512&crop=1,2,30,40",
    ] {
        let addr = AssetAddress::parse(s).unwrap();
        assert_eq!(addr.to_string(), s);
        assert_eq!(AssetAddress::parse(&addr.to_string()).unwrap(), addr);
    }
}

#[test]
fn normalization_unifies_separators() {
    let p = Path::new(r"C:\shoots\2026\dsc_0042.nef");
    assert_eq!(normalize_source_path(p), "C:/shoots/2026/dsc_0042.nef");
}

#[test]
fn normalization_strips_verbatim_prefix() {
    let p = Path::new(r"\\?\C:\very\long\path\img.jpg");
    assert_eq!(normalize_source_path(p), "C:/very/long/path/img.jpg");
}

#[test]
fn normalization_keeps_locale_characters() {
    let p = Path::new("/photos/réunion/été_001.jpg");
    assert_eq!(normalize_source_path(p), "/photos/réunion/été_001.jpg");
}
