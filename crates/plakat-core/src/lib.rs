// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plakat — Core types, validated configuration, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod progress;
pub mod types;

pub use config::{JobConfig, PdfOptions};
pub use error::PlakatError;
pub use progress::{NoopObserver, ProgressObserver};
pub use types::*;
