use std::time::Duration;

use gto_extract::config::{ConfigLoader, DEFAULT_SETTINGS_FILE, ResolvedSettings};

// Changes the working directory, so it lives in its own test binary.
#[test]
fn default_settings_file_in_working_directory() {
    let temp = tempfile::tempdir().unwrap();
    std::env::set_current_dir(temp.path()).unwrap();

    let resolved = ConfigLoader::resolve(None).unwrap();
    assert_eq!(resolved, ResolvedSettings::default());

    std::fs::write(
        temp.path().join(DEFAULT_SETTINGS_FILE),
        r#"{ "timeout_secs": 5, "pretty": true }"#,
    )
    .unwrap();
    let resolved = ConfigLoader::resolve(None).unwrap();
    assert_eq!(resolved.timeout, Duration::from_secs(5));
    assert!(resolved.pretty);
}
