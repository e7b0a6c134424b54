//! Error types for the tracegraph-slicer crate
//!
//! One error type for the whole crate, categorized by kind:
//! - Construction: a code unit cannot be turned into a CFG (fatal)
//! - Trace: the tracer handed over an inconsistent trace (fatal)
//! - Usage: the caller asked for something the trace cannot answer
//! - Config: invalid slicing configuration
//!
//! Unresolved dependencies are NOT errors; they are recorded on the slice.

use crate::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed code unit (CFG construction)
    Construction,
    /// Inconsistent trace handed over by the tracer
    Trace,
    /// Caller error (criterion never executed, unknown ids)
    Usage,
    /// Configuration errors
    Config,
    /// Internal errors (bugs)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Construction => "construction",
            ErrorKind::Trace => "trace",
            ErrorKind::Usage => "usage",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct SlicerError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SlicerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Construction, message)
    }

    pub fn trace(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Trace, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<ConfigError> for SlicerError {
    fn from(err: ConfigError) -> Self {
        SlicerError::config(err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SlicerError>;
