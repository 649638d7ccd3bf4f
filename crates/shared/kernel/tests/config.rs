use eco_kernel::config::{ConfigError, load_config};
use eco_kernel::domain::config::{EcoConfig, EmailFallback};
use serial_test::serial;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn file_values_are_loaded() {
    let file = write_config(
        r#"
        [api]
        base_url = "http://192.168.0.121:3333"

        [contact]
        email_fallback = "disabled"

        [map]
        use_device_position = false
        "#,
    );

    let cfg: EcoConfig = load_config(Some(file.path())).expect("config loads");
    assert_eq!(cfg.api.base_url, "http://192.168.0.121:3333");
    assert_eq!(cfg.contact.email_fallback, EmailFallback::Disabled);
    assert!(!cfg.map.use_device_position);
    assert_eq!(cfg.catalog.regions_path, "regions");
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = load_config::<EcoConfig>(Some(&missing)).expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}
