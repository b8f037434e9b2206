use super::*;

#[test]
fn defaults_carry_the_documented_constants() {
    assert_eq!(Settings::default().thumb_width, DEFAULT_THUMB_WIDTH);

    let opts = LifecycleOpts::default();
    assert_eq!(opts.render_timeout_ms, 15_000);
    assert_eq!(opts.fresh_window_ms, 10_000);
    assert_eq!(opts.fresh.max_attempts, 20);
    assert_eq!(opts.fresh.interval_ms, 500);
    assert_eq!(opts.stale.max_attempts, 3);
    assert_eq!(opts.stale.interval_ms, 2_000);
}

#[test]
fn settings_parse_known_keys() {
    let s = Settings::from_str(r#"{"thumb_width": 512}"#).unwrap();
    assert_eq!(s.thumb_width, 512);
}

#[test]
fn settings_ignore_unknown_keys_and_fill_defaults() {
    let s = Settings::from_str(r#"{"theme": "dark"}"#).unwrap();
    assert_eq!(s.thumb_width, DEFAULT_THUMB_WIDTH);
}

#[test]
fn settings_reject_invalid_documents() {
    assert!(Settings::from_str("not json").is_err());
    assert!(Settings::from_str(r#"{"thumb_width": "wide"}"#).is_err());
}
