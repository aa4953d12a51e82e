mod config;

pub use config::{ConfigError, PipeConfig};
