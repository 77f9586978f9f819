// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolbridge Print — printer and job queries/commands against the native
// spooler, and their rendering into JSON response envelopes. This crate
// bridges between the core types in `spoolbridge-core` and the spooler seam
// in `spoolbridge-native`.

pub mod operations;
pub mod respond;

pub use operations::RawPrintRequest;
pub use respond::JsonResponder;
