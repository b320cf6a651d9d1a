//! Configuration loading for the WAL: TOML file plus environment
//! overrides, following the precedence the teacher's (never-wired-up)
//! `config::Config::load` sketch described — compile-time defaults,
//! overridden by file, overridden by environment.

use std::path::Path;

use crate::errors::ConfigError;
use crate::wal::WalConfig;

/// Environment variable prefix for overrides, e.g. `ORDERWAL_MAX_FILES=4`.
/// `__` is the nested-key separator `config` uses to address *nested* struct
/// fields (as in the teacher's commented-out `BOG_METRICS__LOG_LEVEL` ->
/// `metrics.log_level` precedent) — `WalConfig` is flat, so every override
/// here only needs the single underscore between the prefix and the field
/// name; a double underscore would leave a stray leading `_` once the
/// prefix is stripped and fail to deserialize.
const ENV_PREFIX: &str = "ORDERWAL";

/// Load a [`WalConfig`] from an optional TOML file at `path`, with
/// `ORDERWAL_`-prefixed environment variables taking precedence over the
/// file, which in turn takes precedence over the struct's own defaults.
/// The file is optional — a missing path simply falls through to
/// defaults plus any environment overrides.
pub fn load(path: impl AsRef<Path>) -> Result<WalConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    let settings = builder.build()?;
    let wal_config: WalConfig = settings.try_deserialize()?;
    wal_config.validate()?;
    Ok(wal_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = load("does-not-exist.toml").unwrap();
        let default = WalConfig::default();
        assert_eq!(loaded.file_prefix, default.file_prefix);
        assert_eq!(loaded.max_file_size, default.max_file_size);
        assert_eq!(loaded.max_files, default.max_files);
        assert_eq!(loaded.sync_on_write, default.sync_on_write);
    }

    #[test]
    fn env_override_takes_precedence() {
        std::env::set_var("ORDERWAL_MAX_FILES", "3");
        let loaded = load("does-not-exist.toml").unwrap();
        assert_eq!(loaded.max_files, 3);
        std::env::remove_var("ORDERWAL_MAX_FILES");
    }

    #[test]
    fn zero_max_files_fails_validation() {
        std::env::set_var("ORDERWAL_MAX_FILES", "0");
        let result = load("does-not-exist.toml");
        assert!(result.is_err());
        std::env::remove_var("ORDERWAL_MAX_FILES");
    }
}
