//! Error types.
//!
//! Only configuration and collaborator-shape problems are errors. Missing tab
//! config, zero-sized layout before the first pass and canceled intents are
//! normal control flow and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabBarError {
    #[error("wrong preset provided: expected one of [{expected}], but found \"{found}\"")]
    UnknownPreset { found: String, expected: String },

    #[error("preset \"{0}\" is already registered")]
    DuplicatePreset(String),

    #[error("navigation state has no routes")]
    NoRoutes,

    #[error("navigation index {index} is out of bounds for {len} routes")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid color \"{value}\" for {field}")]
    InvalidColor { field: String, value: String },

    #[error("failed to parse tab bar config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("layout pass failed: {0}")]
    Layout(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, TabBarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preset_lists_options() {
        let err = TabBarError::UnknownPreset {
            found: "material".into(),
            expected: "bubble, flashy".into(),
        };
        assert_eq!(
            err.to_string(),
            "wrong preset provided: expected one of [bubble, flashy], but found \"material\""
        );
    }
}
