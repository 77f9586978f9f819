// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic view of the print spooler.
//
// Every variable-length query is split into its two native phases: a probe
// that reports the required capacity, and a fetch that fills a buffer of
// exactly that capacity. Failures are the raw OS error code; the caller
// attaches the step name.

use spoolbridge_core::Capacity;
use spoolbridge_core::records::{JobRecord, PrinterRecord};

/// Raw OS error code (`GetLastError`).
pub type OsCode = u32;

/// Result of a single native call.
pub type NativeResult<T> = std::result::Result<T, OsCode>;

/// Which printers `EnumPrintersW` should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumScope {
    pub local: bool,
    pub connections: bool,
}

impl Default for EnumScope {
    fn default() -> Self {
        Self {
            local: true,
            connections: true,
        }
    }
}

/// Machine-wide spooler calls, plus opening a printer.
pub trait Spooler: Send + Sync {
    /// Human-readable backend name (e.g. "winspool").
    fn platform_name(&self) -> &str;

    /// The calling thread's last OS error.
    fn last_error(&self) -> OsCode;

    /// The OS message text for `code`, if it has one. May contain line breaks.
    fn error_text(&self, code: OsCode) -> Option<String>;

    /// Open a printer by name. The returned session closes the native
    /// handle when dropped.
    fn open_printer(&self, name: &str) -> NativeResult<Box<dyn PrinterSession + '_>>;

    /// Probe `EnumPrintersW`. Never fails: a failed probe reports zero.
    fn probe_printers(&self, scope: EnumScope) -> Capacity;

    /// Fetch `EnumPrintersW` into a buffer of `capacity.required` bytes.
    fn fetch_printers(
        &self,
        scope: EnumScope,
        capacity: Capacity,
    ) -> NativeResult<Vec<PrinterRecord>>;

    /// Probe `GetDefaultPrinterW` (capacity in UTF-16 units). Never fails.
    fn probe_default_printer(&self) -> Capacity;

    /// Fetch the default printer name.
    fn fetch_default_printer(&self, capacity: Capacity) -> NativeResult<Vec<u16>>;

    /// Probe `EnumPrintProcessorsW`.
    fn probe_print_processors(&self) -> NativeResult<Capacity>;

    /// Fetch the names of the installed print processors.
    fn fetch_print_processors(&self, capacity: Capacity) -> NativeResult<Vec<Vec<u16>>>;

    /// Probe `EnumPrintProcessorDatatypesW` for one processor. Never fails.
    fn probe_datatypes(&self, processor: &[u16]) -> Capacity;

    /// Fetch the data types one processor accepts.
    fn fetch_datatypes(&self, processor: &[u16], capacity: Capacity) -> NativeResult<Vec<Vec<u16>>>;
}

/// Calls made through an open printer handle.
pub trait PrinterSession {
    /// Probe `GetPrinterW` (level 2).
    fn probe_printer(&self) -> NativeResult<Capacity>;

    /// Fetch `GetPrinterW` (level 2).
    fn fetch_printer(&self, capacity: Capacity) -> NativeResult<PrinterRecord>;

    /// Probe `GetJobW` (level 2).
    fn probe_job(&self, job_id: u32) -> NativeResult<Capacity>;

    /// Fetch `GetJobW` (level 2).
    fn fetch_job(&self, job_id: u32, capacity: Capacity) -> NativeResult<JobRecord>;

    /// `SetJobW` with a `JOB_CONTROL_*` command and no job record.
    fn control_job(&self, job_id: u32, command: u32) -> NativeResult<()>;

    /// `StartDocPrinterW`; returns the spooler job id.
    fn start_doc(&self, doc_name: &str, datatype: &str) -> NativeResult<u32>;

    /// `StartPagePrinter`.
    fn start_page(&self) -> NativeResult<()>;

    /// `WritePrinter`; returns the number of bytes the spooler accepted.
    fn write(&self, data: &[u8]) -> NativeResult<u32>;

    /// `EndPagePrinter`.
    fn end_page(&self) -> NativeResult<()>;

    /// `EndDocPrinter`.
    fn end_doc(&self) -> NativeResult<()>;
}
