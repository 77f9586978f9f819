// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Spoolbridge — Native print spooler abstraction.
//!
//! Defines the [`traits::Spooler`] seam that the query/command layer talks
//! to, and selects the backend for the target: winspool on Windows, a stub
//! that reports `ERROR_NOT_SUPPORTED` everywhere else.

pub mod buffer;
pub mod traits;

#[cfg(windows)]
pub mod windows;

#[cfg(not(windows))]
pub mod stub;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use traits::{EnumScope, NativeResult, OsCode, PrinterSession, Spooler};

/// Retrieves the spooler implementation for the target operating system.
pub fn platform_spooler() -> Box<dyn Spooler> {
    #[cfg(windows)]
    {
        Box::new(windows::WinSpooler::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(stub::StubSpooler)
    }
}
