//! Ledger configuration via `magnit.toml`
//!
//! On first open a default `magnit.toml` is written next to the caller's
//! data. To change settings, edit the file and reopen.

use serde::{Deserialize, Serialize};
use std::path::Path;

use magnit_core::{MagnitError, MagnitResult, NumericParsing, StatusPolicy};

use super::transactions::RetryConfig;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "magnit.toml";

/// Default restricted collection for model records
pub const DEFAULT_MODEL_COLLECTION: &str = "collectionModel";

/// Ledger configuration loaded from `magnit.toml`.
///
/// # Example
///
/// ```toml
/// model_collection = "collectionModel"
/// numeric_parsing = "strict"
/// status_policy = "free_form"
/// log_level = "info"
///
/// [retry]
/// max_retries = 10
/// base_delay_ms = 2
/// max_delay_ms = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagnitConfig {
    /// Restricted collection that holds model records
    #[serde(default = "default_model_collection")]
    pub model_collection: String,
    /// How stored quota and usage strings are parsed
    #[serde(default)]
    pub numeric_parsing: NumericParsing,
    /// Whether agreement status follows a checked lifecycle
    #[serde(default)]
    pub status_policy: StatusPolicy,
    /// Maximum tracing level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Conflict retry behaviour
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_model_collection() -> String {
    DEFAULT_MODEL_COLLECTION.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for MagnitConfig {
    fn default() -> Self {
        Self {
            model_collection: default_model_collection(),
            numeric_parsing: NumericParsing::default(),
            status_policy: StatusPolicy::default(),
            log_level: default_log_level(),
            retry: RetryConfig::default(),
        }
    }
}

impl MagnitConfig {
    /// Check every field for usable values.
    ///
    /// # Errors
    ///
    /// InvalidArgument naming the first bad field.
    pub fn validate(&self) -> MagnitResult<()> {
        if self.model_collection.trim().is_empty() {
            return Err(MagnitError::invalid_argument(
                "model_collection must not be empty",
            ));
        }
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| {
                MagnitError::invalid_argument(format!(
                    "invalid log_level '{}'. Expected trace, debug, info, warn or error.",
                    self.log_level
                ))
            })?;
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(MagnitError::invalid_argument(format!(
                "retry.max_delay_ms ({}) is below retry.base_delay_ms ({})",
                self.retry.max_delay_ms, self.retry.base_delay_ms
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Magnit ledger configuration
#
# Restricted collection that holds model records.
model_collection = "collectionModel"

# Parsing of quotaLimit / usageCount strings:
#   "strict"  = malformed numbers are rejected as invalid arguments
#   "lenient" = malformed numbers are logged and read as 0
numeric_parsing = "strict"

# Agreement status handling:
#   "free_form" = any non-empty label, any change
#   "lifecycle" = ISSUED -> APPROVED | REJECTED, APPROVED -> REVOKED
status_policy = "free_form"

# Maximum log level: trace, debug, info, warn, error
log_level = "info"

# Retry on optimistic-concurrency conflicts (exponential backoff).
[retry]
max_retries = 10
base_delay_ms = 2
max_delay_ms = 50
"#
    }

    /// Parse config from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> MagnitResult<Self> {
        let config: MagnitConfig = toml::from_str(content).map_err(|e| {
            MagnitError::invalid_argument(format!("failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> MagnitResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MagnitError::storage(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            MagnitError::InvalidArgument { reason } => MagnitError::invalid_argument(format!(
                "{} (in '{}')",
                reason,
                path.display()
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> MagnitResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                MagnitError::storage(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> MagnitResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MagnitError::serialization(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            MagnitError::storage(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_toml_matches_default() {
        let parsed = MagnitConfig::from_toml_str(MagnitConfig::default_toml()).unwrap();
        assert_eq!(parsed, MagnitConfig::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed = MagnitConfig::from_toml_str("").unwrap();
        assert_eq!(parsed.model_collection, "collectionModel");
        assert_eq!(parsed.numeric_parsing, NumericParsing::Strict);
    }

    #[test]
    fn test_partial_retry_table() {
        let parsed = MagnitConfig::from_toml_str("[retry]\nmax_retries = 40\n").unwrap();
        assert_eq!(parsed.retry.max_retries, 40);
        assert_eq!(parsed.retry.base_delay_ms, RetryConfig::default().base_delay_ms);
    }

    #[test]
    fn test_policies_parse() {
        let parsed = MagnitConfig::from_toml_str(
            "numeric_parsing = \"lenient\"\nstatus_policy = \"lifecycle\"\n",
        )
        .unwrap();
        assert_eq!(parsed.numeric_parsing, NumericParsing::Lenient);
        assert_eq!(parsed.status_policy, StatusPolicy::Lifecycle);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(MagnitConfig::from_toml_str("numeric_parsing = \"loose\"").is_err());
        assert!(MagnitConfig::from_toml_str("log_level = \"chatty\"").is_err());
        assert!(MagnitConfig::from_toml_str("model_collection = \"\"").is_err());
        assert!(MagnitConfig::from_toml_str(
            "[retry]\nbase_delay_ms = 100\nmax_delay_ms = 10\n"
        )
        .is_err());
    }

    #[test]
    fn test_write_default_if_missing_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        MagnitConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());
        let config = MagnitConfig::from_file(&path).unwrap();
        assert_eq!(config, MagnitConfig::default());
    }

    #[test]
    fn test_write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "model_collection = \"custom\"\n").unwrap();
        MagnitConfig::write_default_if_missing(&path).unwrap();
        assert_eq!(
            MagnitConfig::from_file(&path).unwrap().model_collection,
            "custom"
        );
    }

    #[test]
    fn test_write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = MagnitConfig {
            status_policy: StatusPolicy::Lifecycle,
            retry: RetryConfig::default().with_max_retries(3),
            ..MagnitConfig::default()
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(MagnitConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let err = MagnitConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MagnitError::Storage { .. }));
    }
}
