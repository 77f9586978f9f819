// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolbridge — Core types, error definitions, and the response envelope
// shared across all crates.

pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod records;
pub mod types;
pub mod wide;

pub use commands::JobCommand;
pub use config::BridgeConfig;
pub use envelope::{EmptyResponse, Envelope};
pub use error::{SpoolError, Step};
pub use types::*;
