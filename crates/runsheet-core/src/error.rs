//! Error types for runsheet-core.
//!
//! This module defines the error types used throughout the library,
//! with specific error categories for parsing, field validation,
//! date-range problems, storage lookups, and document rendering.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single rule violation attached to the form field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the block form (`title`, `start_time`, ...).
    pub field: &'static str,
    /// Human-readable description of the violated rule.
    pub message: String,
}

/// All field-level violations collected while validating one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages reported against `field`, in the order they were found.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// The main error type for runsheet operations.
#[derive(Debug, Error)]
pub enum RunsheetError {
    /// A timestamp or date string could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A block draft violated one or more field rules.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// An event date range or hour window is unusable.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// The storage collaborator has no block with this id.
    #[error("Block not found: {0}")]
    NotFound(String),

    /// Document rendering failed.
    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for runsheet operations.
pub type Result<T> = std::result::Result<T, RunsheetError>;
