use super::*;

const PATH: &str = "shoots/2026-08/dsc_0042.nef";

#[test]
fn identical_inputs_derive_identical_keys() {
    let crop = CropRect::new(0, 0, 100, 100);
    let a = derive_fingerprint(PATH, 1_000, 250, Some(&crop));
    let b = derive_fingerprint(PATH, 1_000, 250, Some(&crop));
    assert_eq!(a, b);
}

#[test]
fn each_input_changes_the_key() {
    let base = derive_fingerprint(PATH, 1_000, 250, None);

    assert_ne!(base, derive_fingerprint("shoots/other.nef", 1_000, 250, None));
    assert_ne!(base, derive_fingerprint(PATH, 1_001, 250, None));
    assert_ne!(base, derive_fingerprint(PATH, 1_000, 251, None));
    assert_ne!(
        base,
        derive_fingerprint(PATH, 1_000, 250, Some(&CropRect::new(0, 0, 10, 10)))
    );
}

#[test]
fn no_crop_never_collides_with_any_crop() {
    let uncropped = derive_fingerprint(PATH, 1_000, 250, None);
    // A crop spanning the whole image is still a different key: the tag byte
    // separates the two shapes regardless of the rectangle's value.
    for crop in [
        CropRect::new(0, 0, 10, 10),
        CropRect::new(0, 0, 0, 0),
        CropRect::new(0, 0, u32::MAX, u32::MAX),
    ] {
        assert_ne!(uncropped, derive_fingerprint(PATH, 1_000, 250, Some(&crop)));
    }
}

#[test]
fn crop_fields_are_order_sensitive() {
    let a = derive_fingerprint(PATH, 1_000, 250, Some(&CropRect::new(1, 2, 3, 4)));
    let b = derive_fingerprint(PATH, 1_000, 250, Some(&CropRect::new(2, 1, 3, 4)));
    assert_ne!(a, b);
}

#[test]
fn hex_form_is_fixed_length() {
    let fp = derive_fingerprint(PATH, 1_000, 250, None);
    let hex = fp.to_hex();
    assert_eq!(hex.len(), 32);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hex, fp.to_string());
}

#[test]
fn pre_epoch_mtimes_are_distinct() {
    let a = derive_fingerprint(PATH, -1, 250, None);
    let b = derive_fingerprint(PATH, 1, 250, None);
    assert_ne!(a, b);
}
