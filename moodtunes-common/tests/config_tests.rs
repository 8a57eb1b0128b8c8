//! Tests for config file resolution and graceful degradation
//!
//! Tests that manipulate MOODTUNES_CONFIG or the working directory are marked
//! with #[serial] so they never run in parallel.

use moodtunes_common::config::{
    load_config, resolve_config_path, ConfigSource, TomlConfig, CONFIG_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("from-env.toml");
    env::set_var(CONFIG_ENV_VAR, &config_path);

    let resolved = resolve_config_path(None);

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(config_path));
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/moodtunes-env.toml");

    let cli = PathBuf::from("/tmp/moodtunes-cli.toml");
    let resolved = resolve_config_path(Some(&cli));

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(cli));
}

#[test]
#[serial]
fn test_missing_explicit_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let (config, source) = load_config(Some(&missing)).unwrap();

    assert_eq!(config, TomlConfig::default());
    assert_eq!(source, ConfigSource::Missing(missing));
}

#[test]
#[serial]
fn test_load_config_reads_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("moodtunes.toml");
    std::fs::write(
        &path,
        r#"
        port = 7000
        song_limit = 3
        database_path = "/var/lib/moodtunes/log.db"

        [aliases]
        glad = "happy"
        "#,
    )
    .unwrap();

    let (config, source) = load_config(Some(&path)).unwrap();

    assert_eq!(source, ConfigSource::File(path));
    assert_eq!(config.port, 7000);
    assert_eq!(config.song_limit, 3);
    assert_eq!(
        config.database_path,
        PathBuf::from("/var/lib/moodtunes/log.db")
    );
    assert_eq!(config.alias_table().unwrap().normalize("Glad"), "happy");
}

#[test]
#[serial]
fn test_unparsable_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "port = [").unwrap();

    assert!(load_config(Some(&path)).is_err());
}
