//! Error types for rendering and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`RenderError`], handy for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    MalformedInput,
}

/// Failures while turning one search batch (or one tweet in it) into markup.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unparseable timestamp {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Parse { .. } => ErrorKind::Parse,
            RenderError::MalformedInput(_) => ErrorKind::MalformedInput,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_malformed_input() {
        let err = RenderError::MalformedInput("results is not an array".to_string());
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "malformed input: results is not an array");
    }

    #[test]
    fn test_kind_of_parse_error() {
        let source = chrono::DateTime::parse_from_rfc2822("nope").unwrap_err();
        let err = RenderError::Parse {
            value: "nope".to_string(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("unparseable timestamp \"nope\""));
    }
}
