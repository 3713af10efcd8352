use super::*;
use std::fs::File;
use std::io::Write;
use tempfile::{tempdir, TempDir};

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        listen_addr: "127.0.0.1:8000".to_string(),
        page_size: 5,
        session_ttl_hours: 24,
    }
}

#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        listen_addr: Some("0.0.0.0:9000".to_string()),
        page_size: Some(20),
        session_ttl_hours: Some(1),
        server_url: None,
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.listen_addr, "0.0.0.0:9000");
    assert_eq!(updated.page_size, 20);
    assert_eq!(updated.session_ttl_hours, 1);
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        page_size: Some(10),
        ..Default::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "original.db");
    assert_eq!(updated.listen_addr, "127.0.0.1:8000");
    assert_eq!(updated.page_size, 10);
    assert_eq!(updated.session_ttl_hours, 24);
}

#[test]
fn test_session_ttl_conversion() {
    assert_eq!(sample_config().session_ttl(), chrono::Duration::hours(24));
}

#[test]
fn test_session_ttl_out_of_range_uses_default() {
    let default_ttl = chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS);

    for hours in [0, -5, i64::MAX / 1000, i64::MAX] {
        let config = Config {
            session_ttl_hours: hours,
            ..sample_config()
        };
        assert_eq!(config.session_ttl(), default_ttl, "session_ttl_hours = {}", hours);
    }
}

#[test]
fn test_sanitized_keeps_values_in_range() {
    let config = Config {
        page_size: MAX_PAGE_SIZE,
        session_ttl_hours: MAX_SESSION_TTL_HOURS,
        ..sample_config()
    }
    .sanitized();

    assert_eq!(config.page_size, MAX_PAGE_SIZE);
    assert_eq!(config.session_ttl_hours, MAX_SESSION_TTL_HOURS);
    assert_eq!(sample_config().sanitized().page_size, 5);
    assert_eq!(sample_config().sanitized().session_ttl_hours, 24);
}

#[test]
fn test_sanitized_replaces_out_of_range_values() {
    let cases = [
        (0, 0),
        (-1, -1),
        (MAX_PAGE_SIZE + 1, MAX_SESSION_TTL_HOURS + 1),
        (i64::MAX, i64::MAX / 1000),
    ];

    for (page_size, session_ttl_hours) in cases {
        let config = Config {
            page_size,
            session_ttl_hours,
            ..sample_config()
        }
        .sanitized();

        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE, "page_size = {}", page_size);
        assert_eq!(
            config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS,
            "session_ttl_hours = {}",
            session_ttl_hours
        );
        assert_eq!(config.database_url, "original.db");
    }
}

#[test]
fn test_out_of_range_file_values_are_sanitized() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(&temp_dir, "page_size = 0\nsession_ttl_hours = 9223372036854775\n");

    let update = config_from_file(Some(config_path)).unwrap();
    let config = base_config(None).apply_update(update).sanitized();

    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
}

#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "taxi.db");
    assert_eq!(config.listen_addr, format!("127.0.0.1:{}", default_port()));
    assert_eq!(config.page_size, 5);
    assert_eq!(config.session_ttl_hours, 336);
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("taxi.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
}

#[test]
fn test_config_from_args() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        page_size: Some(7),
        debug: true,
        ..Default::default()
    };

    let update = config_from_args(&args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.listen_addr, None);
    assert_eq!(update.page_size, Some(7));
    assert_eq!(update.session_ttl_hours, None);
    assert_eq!(update.server_url, None);
}

#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();

    assert_eq!(update.database_url, None);
    assert_eq!(update.page_size, None);
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(
        &temp_dir,
        r#"
            database_url = "file.db"
            listen_addr = "0.0.0.0:8080"
            page_size = 10
            session_ttl_hours = 48
            server_url = "http://fleet.local:8080"
        "#,
    );

    let update = config_from_file(Some(config_path)).unwrap();

    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.listen_addr, Some("0.0.0.0:8080".to_string()));
    assert_eq!(update.page_size, Some(10));
    assert_eq!(update.session_ttl_hours, Some(48));
    assert_eq!(update.server_url, Some("http://fleet.local:8080".to_string()));
}

#[test]
fn test_config_from_file_with_partial_values() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(
        &temp_dir,
        r#"
            page_size = 3
            # everything else left out
        "#,
    );

    let update = config_from_file(Some(config_path)).unwrap();

    assert_eq!(update.page_size, Some(3));
    assert_eq!(update.database_url, None);
    assert_eq!(update.server_url, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(&temp_dir, r#"page_size = "lots""#);

    let result = config_from_file(Some(config_path));

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();

    assert_eq!(update.database_url, None);
}

#[test]
fn test_precedence_args_over_file_over_base() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..Default::default()
    };
    let file_update = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        page_size: Some(50),
        ..Default::default()
    };

    let config = base_config(None)
        .apply_update(file_update)
        .apply_update(config_from_args(&args));

    assert_eq!(config.database_url, "args.db");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
}
