// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Plakat.

use thiserror::Error;

/// Top-level error type for all Plakat operations.
#[derive(Debug, Error)]
pub enum PlakatError {
    // -- Configuration errors (detected before any image I/O) --
    #[error("invalid configuration: {0}")]
    Configuration(String),

    // -- Image errors --
    #[error("invalid or corrupt source image: {0}")]
    InvalidImage(String),

    #[error("image encoding failed: {0}")]
    Encoding(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- I/O / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PlakatError>;
