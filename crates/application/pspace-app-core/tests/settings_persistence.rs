use pspace_app_core::persistence::FilePersistence;
use pspace_app_core::{AppSettings, SettingsRepo, SettleTimings};

#[test]
fn missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let repo = FilePersistence::with_config_dir(dir.path().join("nested"));

    let settings = repo.load().unwrap();
    assert_eq!(settings, AppSettings::default());
    assert_eq!(settings.timings, SettleTimings::default());
    assert_eq!(settings.default_space_name, "Space");
}

#[test]
fn saved_settings_are_read_back() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let repo = FilePersistence::with_config_dir(dir.path());

    let settings = AppSettings {
        adb_path: "/opt/platform-tools/adb".into(),
        device_serial: Some("emulator-5554".into()),
        timings: SettleTimings {
            create_settle_ms: 8000,
            delete_pre_delay_ms: 0,
            delete_settle_ms: 3000,
        },
        default_space_name: "Parallel".into(),
        space_limit: Some(4),
        create_user_args: "--profileOf 0".into(),
        poll_interval_secs: 0,
    };
    repo.save(&settings).unwrap();
    repo.save(&settings).unwrap();

    assert_eq!(repo.load().unwrap(), settings);
    assert!(!dir.path().join("settings.json.tmp").exists());
}

#[test]
fn partial_settings_file_fills_in_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{ "device_serial": "R58M", "timings": { "create_settle_ms": 1, "delete_pre_delay_ms": 2, "delete_settle_ms": 3 } }"#,
    )
    .unwrap();

    let settings = FilePersistence::with_config_dir(dir.path()).load().unwrap();
    assert_eq!(settings.device_serial.as_deref(), Some("R58M"));
    assert_eq!(settings.timings.delete_settle_ms, 3);
    assert_eq!(settings.adb_path, "adb");
    assert_eq!(
        settings.poll_interval_secs,
        pspace_config::DEFAULT_POLL_INTERVAL_SECS
    );
}

#[test]
fn corrupt_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

    let err = FilePersistence::with_config_dir(dir.path())
        .load()
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse settings"));
}
