//! Integration tests for configuration loading.

use mdxkit::cellset::CoordinatePolicy;
use mdxkit::config::{Settings, SettingsError};
use std::fs;

#[test]
fn test_load_from_file() {
    let dir = std::env::temp_dir().join(format!("mdxkit-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mdxkit.toml");
    fs::write(
        &path,
        r#"
[decode]
elements_unique_names = false
coordinate_policy = "strict"
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert!(!settings.decode.elements_unique_names);
    assert_eq!(settings.decode.coordinate_policy, CoordinatePolicy::Strict);
    assert!(settings.output.pretty);

    let options = settings.decode.to_options();
    assert!(!options.elements_unique_names);
    assert_eq!(options.coordinate_policy, CoordinatePolicy::Strict);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_invalid_file_reports_parse_error() {
    let dir = std::env::temp_dir().join(format!("mdxkit-invalid-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mdxkit.toml");
    fs::write(&path, "[decode]\ntop = \"many\"\n").unwrap();

    assert!(matches!(
        Settings::from_file(&path),
        Err(SettingsError::ParseError(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Settings::from_file("/nonexistent/dir/mdxkit.toml"),
        Err(SettingsError::FileNotFound(_))
    ));
}
