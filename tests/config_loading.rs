use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use calcdag::config::loader::{apply_overrides_from, load_and_validate, load_from_path, load_optional};
use calcdag::config::{parse_duration, ConfigFile, RawConfigFile};
use calcdag::errors::CalcdagError;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Calcdag.toml");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn empty_file_uses_defaults() {
    let (_dir, path) = write_config("");
    let raw = load_from_path(&path).unwrap();
    let cfg = ConfigFile::try_from(raw).unwrap();

    assert_eq!(cfg, ConfigFile::default());
    assert_eq!(cfg.workers.count, 1);
    assert_eq!(cfg.workers.idle_backoff, Duration::from_millis(100));
    assert_eq!(cfg.workers.shutdown_grace, Duration::from_secs(5));
    assert_eq!(cfg.latencies.division, Duration::from_millis(100));
    assert_eq!(cfg.poll_interval, Duration::from_millis(50));
}

#[test]
fn sections_are_parsed() {
    let (_dir, path) = write_config(
        r#"
[workers]
count = 4
idle_backoff = "20ms"
shutdown_grace = "2s"

[latency]
addition = "1ms"
subtraction = "2ms"
multiplication = "3ms"
division = "1m"
default = "0ms"

[client]
poll_interval = "10ms"
"#,
    );

    let raw = load_from_path(&path).unwrap();
    let cfg = ConfigFile::try_from(raw).unwrap();

    assert_eq!(cfg.workers.count, 4);
    assert_eq!(cfg.workers.idle_backoff, Duration::from_millis(20));
    assert_eq!(cfg.workers.shutdown_grace, Duration::from_secs(2));
    assert_eq!(cfg.latencies.for_operation("+"), Duration::from_millis(1));
    assert_eq!(cfg.latencies.for_operation("-"), Duration::from_millis(2));
    assert_eq!(cfg.latencies.for_operation("*"), Duration::from_millis(3));
    assert_eq!(cfg.latencies.for_operation("/"), Duration::from_secs(60));
    assert_eq!(cfg.latencies.for_operation("%"), Duration::ZERO);
    assert_eq!(cfg.poll_interval, Duration::from_millis(10));
}

#[test]
fn zero_workers_is_rejected() {
    let (_dir, path) = write_config("[workers]\ncount = 0\n");
    let err = ConfigFile::try_from(load_from_path(&path).unwrap()).unwrap_err();
    assert!(matches!(err, CalcdagError::ConfigError(_)));
}

#[test]
fn malformed_duration_is_rejected() {
    let (_dir, path) = write_config("[latency]\naddition = \"fast\"\n");
    let err = ConfigFile::try_from(load_from_path(&path).unwrap()).unwrap_err();
    match err {
        CalcdagError::ConfigError(msg) => assert!(msg.contains("latency.addition"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let (_dir, path) = write_config("[workers\ncount = ");
    assert!(matches!(load_from_path(&path), Err(CalcdagError::TomlError(_))));
}

#[test]
fn missing_explicit_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(load_and_validate(&missing), Err(CalcdagError::IoError(_))));
    assert!(load_optional(Some(missing.as_path())).is_err());
}

#[test]
fn no_path_falls_back_to_defaults() {
    // Only the poll interval is immune to environment overrides.
    let cfg = load_optional(None).unwrap();
    assert_eq!(cfg.poll_interval, Duration::from_millis(50));
}

#[test]
fn environment_overrides_apply() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("COMPUTING_POWER", "6"),
        ("TIME_ADDITION_MS", "5"),
        ("TIME_SUBTRACTION_MS", "6"),
        ("TIME_MULTIPLICATIONS_MS", "7"),
        ("TIME_DIVISIONS_MS", "8"),
    ]);

    let mut raw = RawConfigFile::default();
    apply_overrides_from(&mut raw, |key| env.get(key).map(|v| v.to_string())).unwrap();
    let cfg = ConfigFile::try_from(raw).unwrap();

    assert_eq!(cfg.workers.count, 6);
    assert_eq!(cfg.latencies.addition, Duration::from_millis(5));
    assert_eq!(cfg.latencies.subtraction, Duration::from_millis(6));
    assert_eq!(cfg.latencies.multiplication, Duration::from_millis(7));
    assert_eq!(cfg.latencies.division, Duration::from_millis(8));
    assert_eq!(cfg.latencies.default, Duration::from_millis(100));
}

#[test]
fn non_numeric_environment_override_is_rejected() {
    let mut raw = RawConfigFile::default();
    let err = apply_overrides_from(&mut raw, |key| {
        (key == "COMPUTING_POWER").then(|| "lots".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, CalcdagError::ConfigError(_)));
}

#[test]
fn duration_suffixes() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration(" 3s ").unwrap(), Duration::from_secs(3));
    assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
    assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("10d").is_err());
    assert!(parse_duration("ms").is_err());
}

#[test]
fn oversized_durations_are_rejected_not_wrapped() {
    assert!(parse_duration("307445734561825861m").is_err());
    assert!(parse_duration("5124095576030432h").is_err());
    assert_eq!(
        parse_duration("307445734561825860m").unwrap(),
        Duration::from_secs(307_445_734_561_825_860 * 60)
    );

    let mut raw = RawConfigFile::default();
    raw.latency.division = "5124095576030432h".to_string();
    let err = ConfigFile::try_from(raw).unwrap_err();
    match err {
        CalcdagError::ConfigError(msg) => {
            assert!(msg.contains("invalid duration"), "{msg}");
            assert!(msg.contains("too large"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}
