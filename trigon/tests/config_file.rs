use std::path::PathBuf;

use trigon::AppConfig;

#[test]
fn test_shipped_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../trigon.ron");
    let config = AppConfig::load(&path).expect("shipped config should parse");

    assert_eq!(
        config,
        AppConfig::default(),
        "trigon.ron should spell out the built-in defaults"
    );
}
