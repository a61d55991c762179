//! Error types for loading and validating battle configuration.

use std::fmt;

/// An error raised while reading, parsing, or validating a config.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub kind: ConfigErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
}

impl ConfigError {
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ConfigErrorKind::Io,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ConfigErrorKind::Parse,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ConfigErrorKind::Invalid,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(err.to_string())
    }
}
