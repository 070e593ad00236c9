//! Configuration management for bazelize
//!
//! Settings are loaded from environment variables with sensible defaults and
//! may then be overridden by command-line flags. An empty pattern variable
//! disables that filter.
//!
//! # Environment Variables
//!
//! - `BAZELIZE_SRC_WHITE_LIST`: regex a source file path must match - default: `src/`
//! - `BAZELIZE_SRC_BLACK_LIST`: regex excluding directories - default: `/test|/integration-test|/target`
//! - `BAZELIZE_DEP_BLACK_LIST`: regex excluding dependencies by derived name - default: `^jdk_tools`
//! - `BAZELIZE_DEFAULT_SERVER`: repository id used when none is recorded - default: `central`
//! - `BAZELIZE_RES_MAIN`: main resources directory - default: `src/main/resources`
//! - `BAZELIZE_SRC_TEST`: test sources directory - default: `src/test/java`
//! - `BAZELIZE_RES_TEST`: test resources directory - default: `src/test/resources`
//! - `BAZELIZE_SETTINGS`: Maven settings file - default: `~/.m2/settings.xml`
//! - `BAZELIZE_LOCAL_REPOSITORY`: Maven local repository - default: `~/.m2/repository`
//! - `BAZELIZE_TEMPLATE_DIR`: directory with `<name>.template` overrides
//! - `BAZELIZE_ADD_SCOPE` / `BAZELIZE_ADD_HASH` / `BAZELIZE_ADD_SERVER`: enrichment flags
//! - `BAZELIZE_LOG_LEVEL`: logging level - default: `info`
//!
//! # Example
//!
//! ```no_run
//! use bazelize::BazelizeConfig;
//!
//! let config = BazelizeConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::util::logging::is_valid_level;
use regex::Regex;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SRC_WHITE_LIST: &str = "src/";
const DEFAULT_SRC_BLACK_LIST: &str = "/test|/integration-test|/target";
const DEFAULT_DEP_BLACK_LIST: &str = "^jdk_tools";
const DEFAULT_SERVER: &str = "central";
const DEFAULT_RES_MAIN: &str = "src/main/resources";
const DEFAULT_SRC_TEST: &str = "src/test/java";
const DEFAULT_RES_TEST: &str = "src/test/resources";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {field} pattern '{pattern}': {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for bazelize
#[derive(Debug, Clone)]
pub struct BazelizeConfig {
    pub src_white_list: Option<String>,
    pub src_black_list: Option<String>,
    pub dep_black_list: Option<String>,

    /// Repository id assumed when `_remote.repositories` records none
    pub default_server: String,

    pub res_main: String,
    pub src_test: String,
    pub res_test: String,

    pub settings_file: PathBuf,
    pub local_repository: PathBuf,
    pub template_dir: Option<PathBuf>,

    pub add_scope: bool,
    pub add_hash: bool,
    pub add_server: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn pattern_var(key: &str, default: &str) -> Option<String> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn bool_var(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default)
}

fn m2_path(file: &str) -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".m2").join(file))
        .unwrap_or_else(|| PathBuf::from(".m2").join(file))
}

impl Default for BazelizeConfig {
    /// Loads `BAZELIZE_*` environment variables, falling back to defaults
    fn default() -> Self {
        Self {
            src_white_list: pattern_var("BAZELIZE_SRC_WHITE_LIST", DEFAULT_SRC_WHITE_LIST),
            src_black_list: pattern_var("BAZELIZE_SRC_BLACK_LIST", DEFAULT_SRC_BLACK_LIST),
            dep_black_list: pattern_var("BAZELIZE_DEP_BLACK_LIST", DEFAULT_DEP_BLACK_LIST),
            default_server: env::var("BAZELIZE_DEFAULT_SERVER")
                .unwrap_or_else(|_| DEFAULT_SERVER.to_string()),
            res_main: env::var("BAZELIZE_RES_MAIN").unwrap_or_else(|_| DEFAULT_RES_MAIN.to_string()),
            src_test: env::var("BAZELIZE_SRC_TEST").unwrap_or_else(|_| DEFAULT_SRC_TEST.to_string()),
            res_test: env::var("BAZELIZE_RES_TEST").unwrap_or_else(|_| DEFAULT_RES_TEST.to_string()),
            settings_file: env::var("BAZELIZE_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| m2_path("settings.xml")),
            local_repository: env::var("BAZELIZE_LOCAL_REPOSITORY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| m2_path("repository")),
            template_dir: env::var("BAZELIZE_TEMPLATE_DIR").ok().map(PathBuf::from),
            add_scope: bool_var("BAZELIZE_ADD_SCOPE", true),
            add_hash: bool_var("BAZELIZE_ADD_HASH", false),
            add_server: bool_var("BAZELIZE_ADD_SERVER", false),
            log_level: env::var("BAZELIZE_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        }
    }
}

impl BazelizeConfig {
    /// Checks that every pattern compiles and the log level is known
    pub fn validate(&self) -> Result<(), ConfigError> {
        let patterns = [
            ("source whitelist", &self.src_white_list),
            ("source blacklist", &self.src_black_list),
            ("dependency blacklist", &self.dep_black_list),
        ];
        for (field, pattern) in patterns {
            if let Some(pattern) = pattern {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    field,
                    pattern: pattern.clone(),
                    source,
                })?;
            }
        }

        if self.default_server.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Default server must not be empty".to_string(),
            ));
        }

        if !is_valid_level(&self.log_level) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

impl fmt::Display for BazelizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |p: &Option<String>| p.clone().unwrap_or_else(|| "<none>".to_string());
        writeln!(f, "Bazelize Configuration:")?;
        writeln!(f, "  Source Whitelist: {}", show(&self.src_white_list))?;
        writeln!(f, "  Source Blacklist: {}", show(&self.src_black_list))?;
        writeln!(f, "  Dependency Blacklist: {}", show(&self.dep_black_list))?;
        writeln!(f, "  Default Server: {}", self.default_server)?;
        writeln!(f, "  Settings: {}", self.settings_file.display())?;
        writeln!(f, "  Local Repository: {}", self.local_repository.display())?;
        writeln!(
            f,
            "  Enrichment: scope={} hash={} server={}",
            self.add_scope, self.add_hash, self.add_server
        )?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("BAZELIZE_SRC_WHITE_LIST"),
            EnvGuard::unset("BAZELIZE_SRC_BLACK_LIST"),
            EnvGuard::unset("BAZELIZE_DEP_BLACK_LIST"),
            EnvGuard::unset("BAZELIZE_DEFAULT_SERVER"),
            EnvGuard::unset("BAZELIZE_ADD_SCOPE"),
            EnvGuard::unset("BAZELIZE_ADD_HASH"),
            EnvGuard::unset("BAZELIZE_LOG_LEVEL"),
        ];

        let config = BazelizeConfig::default();

        assert_eq!(config.src_white_list.as_deref(), Some(DEFAULT_SRC_WHITE_LIST));
        assert_eq!(config.src_black_list.as_deref(), Some(DEFAULT_SRC_BLACK_LIST));
        assert_eq!(config.dep_black_list.as_deref(), Some(DEFAULT_DEP_BLACK_LIST));
        assert_eq!(config.default_server, "central");
        assert!(config.add_scope);
        assert!(!config.add_hash);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.settings_file.ends_with(".m2/settings.xml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("BAZELIZE_SRC_WHITE_LIST", ""),
            EnvGuard::set("BAZELIZE_DEP_BLACK_LIST", "^com_internal"),
            EnvGuard::set("BAZELIZE_ADD_HASH", "true"),
            EnvGuard::set("BAZELIZE_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("BAZELIZE_TEMPLATE_DIR", "/opt/templates"),
        ];

        let config = BazelizeConfig::default();

        assert_eq!(config.src_white_list, None);
        assert_eq!(config.dep_black_list.as_deref(), Some("^com_internal"));
        assert!(config.add_hash);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.template_dir, Some(PathBuf::from("/opt/templates")));
    }

    #[test]
    #[serial]
    fn test_validation_rejects_bad_pattern() {
        let mut config = BazelizeConfig::default();
        config.src_black_list = Some("(unclosed".to_string());

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern {
                field: "source blacklist",
                ..
            }
        ));
    }

    #[test]
    #[serial]
    fn test_validation_rejects_log_level() {
        let mut config = BazelizeConfig::default();
        config.log_level = "loud".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_config_display() {
        let config = BazelizeConfig::default();
        let display = format!("{}", config);
        assert!(display.contains("Bazelize Configuration:"));
        assert!(display.contains("Default Server:"));
    }
}
