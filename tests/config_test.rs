//! Integration tests for configuration loading

use std::io::Write;
use tempfile::NamedTempFile;
use zone_checker::infra::Config;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[zones]
file = "/config/zones.json"

[tracking]
trail_length = 12
classes = [1, 3]

[pipeline]
channel_capacity = 8

[metrics]
progress_every_frames = 0
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.zones_file(), "/config/zones.json");
    assert_eq!(config.trail_length(), 12);
    assert_eq!(config.classes(), &[1, 3]);
    assert_eq!(config.channel_capacity(), 8);
    assert_eq!(config.progress_every_frames(), 0);
    assert_eq!(config.config_file(), temp_file.path().display().to_string());
}

#[test]
fn test_zero_trail_length_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[tracking]\ntrail_length = 0\n").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("trail_length"));
}

#[test]
fn test_invalid_toml_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[tracking\ntrail_length = ").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.zones_file(), "config/zones.json");
    assert_eq!(config.trail_length(), 30);
    assert_eq!(config.config_file(), "default");
}
