//! Error types for phaseline operations.
//!
//! Graph queries and segmentation never fail; errors come from configuration
//! and from the collaborators that load documents and write reports.

use std::{io, ops::Range};

use thiserror::Error;

use crate::config::ConfigError;

/// The main error type for phaseline operations.
///
/// # Diagnostic Variants
///
/// The `Document` variant keeps the offending source text and, when known,
/// the byte range of the problem so callers can render a source snippet.
#[derive(Debug, Error)]
pub enum PhaselineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid process document: {message}")]
    Document {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },
}

impl PhaselineError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Document {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
