//! Executor configuration.
//!
//! Test suites keep their fan-out settings in TOML next to the rest of the
//! environment description; configuration is validated at load time with
//! clear error messages. A zero worker count in a *file* is a configuration
//! error; only the runtime `execute` argument gets the clamp-to-one
//! leniency.

use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, Result};

/// Fan-out settings for an executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Number of concurrent workers to fan tasks out over.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Whether the first task error cancels not-yet-started tasks.
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
}

fn default_concurrency() -> usize {
    1
}

fn default_fail_fast() -> bool {
    true
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fail_fast: default_fail_fast(),
        }
    }
}

impl ExecutorConfig {
    /// Creates a configuration with the given worker count.
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Self::default()
        }
    }

    /// Disables fail-fast, so every task runs to completion and every
    /// error is collected.
    #[must_use]
    pub const fn without_fail_fast(mut self) -> Self {
        self.fail_fast = false;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ExecutorError::config("concurrency must be at least 1"));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed configuration fails validation.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ExecutorError::config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ExecutorError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.concurrency, 1);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_builder() {
        let config = ExecutorConfig::new(8).without_fail_fast();
        assert_eq!(config.concurrency, 8);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = ExecutorConfig::new(0);
        let err = config.validate().expect_err("must fail");
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "concurrency = 16\nfail_fast = false").expect("write");

        let config = ExecutorConfig::load(file.path()).expect("load");
        assert_eq!(config.concurrency, 16);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "concurrency = 4").expect("write");

        let config = ExecutorConfig::load(file.path()).expect("load");
        assert_eq!(config.concurrency, 4);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "concurrency = \"many\"").expect("write");

        let err = ExecutorConfig::load(file.path()).expect_err("must fail");
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn test_load_rejects_zero_concurrency() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "concurrency = 0").expect("write");

        assert!(ExecutorConfig::load(file.path()).is_err());
    }
}
