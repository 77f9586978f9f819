// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spoolbridge.
//
// Every failure carries enough to fill an envelope: the native error code
// and the step (native call or validation stage) that produced it.

use std::fmt;

use thiserror::Error;

/// The stage of an operation that failed.
///
/// Native steps are named after the winspool call so a caller can tell
/// which call in a multi-call sequence went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    OpenPrinter,
    EnumPrinters,
    GetDefaultPrinter,
    GetPrinter,
    GetJob,
    SetJob,
    EnumPrintProcessors,
    EnumPrintProcessorDatatypes,
    StartDocPrinter,
    StartPagePrinter,
    WritePrinter,
    /// Job-command keyword validation.
    Lookup,
    /// Boundary argument validation (null pointers, bad UTF-8).
    Arguments,
    /// Internal fault caught at the boundary.
    TryCatch,
}

impl Step {
    /// Wire name written to `err_step`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenPrinter => "OpenPrinterW",
            Self::EnumPrinters => "EnumPrintersW",
            Self::GetDefaultPrinter => "GetDefaultPrinterW",
            Self::GetPrinter => "GetPrinterW",
            Self::GetJob => "GetJobW",
            Self::SetJob => "SetJobW",
            Self::EnumPrintProcessors => "EnumPrintProcessorsW",
            Self::EnumPrintProcessorDatatypes => "EnumPrintProcessorDatatypesW",
            Self::StartDocPrinter => "StartDocPrinterW",
            Self::StartPagePrinter => "StartPagePrinter",
            Self::WritePrinter => "WritePrinter",
            Self::Lookup => "lookup",
            Self::Arguments => "arguments",
            Self::TryCatch => "TryCatch",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for all Spoolbridge operations.
#[derive(Debug, Error)]
pub enum SpoolError {
    // -- Native spooler failures --
    #[error("{step} failed with OS error {code}")]
    Native { step: Step, code: u32 },

    /// An enumeration produced nothing. `code` is whatever the OS last
    /// error was at that point, which may be stale.
    #[error("{step} returned no entries (last OS error {code})")]
    Empty { step: Step, code: u32 },

    #[error("short write: {written} of {requested} bytes accepted")]
    ShortWrite {
        requested: usize,
        written: u32,
        code: u32,
    },

    // -- Caller errors --
    #[error("Invalid job command")]
    UnknownCommand(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    // -- Internal --
    #[error("{0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpoolError {
    /// Shorthand for a failed native call.
    pub fn native(step: Step, code: u32) -> Self {
        Self::Native { step, code }
    }

    /// Native error code reported in `err_code` (0 for caller/internal errors).
    pub fn code(&self) -> u32 {
        match self {
            Self::Native { code, .. }
            | Self::Empty { code, .. }
            | Self::ShortWrite { code, .. } => *code,
            _ => 0,
        }
    }

    /// Step reported in `err_step`.
    pub fn step(&self) -> Step {
        match self {
            Self::Native { step, .. } | Self::Empty { step, .. } => *step,
            Self::ShortWrite { .. } => Step::WritePrinter,
            Self::UnknownCommand(_) => Step::Lookup,
            Self::InvalidArgument(_) => Step::Arguments,
            Self::Internal(_) | Self::Config(_) | Self::Serialization(_) => Step::TryCatch,
        }
    }

    /// Whether `err_msg` should come from the OS message table rather than
    /// from this error's own text.
    pub fn is_os_error(&self) -> bool {
        matches!(
            self,
            Self::Native { .. } | Self::Empty { .. } | Self::ShortWrite { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_reports_lookup_with_zero_code() {
        let err = SpoolError::UnknownCommand("FOO".into());
        assert_eq!(err.code(), 0);
        assert_eq!(err.step(), Step::Lookup);
        assert_eq!(err.step().as_str(), "lookup");
        assert_eq!(err.to_string(), "Invalid job command");
        assert!(!err.is_os_error());
    }

    #[test]
    fn short_write_is_attributed_to_write_printer() {
        let err = SpoolError::ShortWrite {
            requested: 10,
            written: 4,
            code: 31,
        };
        assert_eq!(err.step(), Step::WritePrinter);
        assert_eq!(err.code(), 31);
        assert!(err.is_os_error());
    }

    #[test]
    fn native_error_carries_code_and_step() {
        let err = SpoolError::native(Step::OpenPrinter, 1801);
        assert_eq!(err.code(), 1801);
        assert_eq!(err.step().as_str(), "OpenPrinterW");
    }
}
