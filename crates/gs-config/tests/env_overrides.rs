use figment::Jail;
use gs_config::GsConfig;

#[test]
fn env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("GSYNC_DATABASE__PATH", ":memory:");
        jail.set_env("GSYNC_SYNC__ENABLED", "false");

        let config = GsConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        assert!(!config.sync.enabled);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".gsync")?;
        jail.create_file(".gsync/config.toml", "[sync]\nmax_attempts = 2\n")?;
        jail.set_env("GSYNC_SYNC__MAX_ATTEMPTS", "9");

        let config = GsConfig::load().expect("config loads");
        assert_eq!(config.sync.max_attempts, 9);
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("GSYNC_SYNC__MAX_ATTEMPTS", "0");
        assert!(GsConfig::load().is_err());
        Ok(())
    });
}
