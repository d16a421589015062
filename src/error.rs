use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value {value} for {field}: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Anything that stops us before the first frame.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("texture {0} does not exist")]
    MissingTexture(PathBuf),
}
