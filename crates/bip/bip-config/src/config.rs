use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PipeConfig {
    /// Slots in the buffer (bytes, for the pipe).
    #[serde(default = "defaults::capacity")]
    pub capacity: usize,
    /// Upper bound on a single reservation.
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// Map slots from this file instead of the heap.
    #[serde(default)]
    pub backing_file: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

mod defaults {
    pub fn capacity() -> usize {
        1 << 16 // 65536
    }

    pub fn chunk_size() -> usize {
        4096
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::capacity(),
            chunk_size: defaults::chunk_size(),
            log_level: defaults::log_level(),
            backing_file: None,
        }
    }
}

impl PipeConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&toml_to_str)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let pipe_config: PipeConfig = toml::from_str(s)?;
        pipe_config.validate()?;
        Ok(pipe_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be > 0".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = PipeConfig::from_toml("").unwrap();
        assert_eq!(cfg, PipeConfig::default());
        assert_eq!(cfg.capacity, 65536);
        assert_eq!(cfg.chunk_size, 4096);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.backing_file.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = PipeConfig::from_toml(
            r#"
            capacity = 1024
            chunk_size = 128
            log_level = "trace"
            backing_file = "/tmp/bip_slots"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.capacity, 1024);
        assert_eq!(cfg.chunk_size, 128);
        assert_eq!(cfg.log_level, "trace");
        assert_eq!(cfg.backing_file.as_deref(), Some("/tmp/bip_slots"));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = PipeConfig::from_toml("capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = PipeConfig::from_toml("capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = PipeConfig::load("/nonexistent/bippipe.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
