// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted in-memory spooler for tests.
//
// Holds a fixed set of printers, jobs, and print processors, records every
// native call it receives (including handle release), and can be told to
// fail any call with a chosen OS error code.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use spoolbridge_core::Capacity;
use spoolbridge_core::records::{JobRecord, PrinterRecord};
use spoolbridge_core::wide::from_wide;

use crate::traits::*;

/// `ERROR_INVALID_PRINTER_NAME`.
pub const ERROR_INVALID_PRINTER_NAME: OsCode = 1801;

/// `ERROR_INVALID_PARAMETER`.
pub const ERROR_INVALID_PARAMETER: OsCode = 87;

/// Nominal byte size of one fake record, used for probe capacities.
const RECORD_BYTES: u32 = 136;

#[derive(Default)]
struct FakeState {
    printers: Vec<PrinterRecord>,
    jobs: HashMap<(String, u32), JobRecord>,
    default_printer: Option<String>,
    processors: Vec<(String, Vec<String>)>,
    failures: HashMap<String, OsCode>,
    last_error: OsCode,
    short_write: Option<u32>,
    printer_capacity: Option<Capacity>,
    next_job_id: u32,
    calls: Vec<String>,
}

/// Test double for [`Spooler`].
#[derive(Default)]
pub struct FakeSpooler {
    state: Mutex<FakeState>,
}

fn wide(text: &str) -> Option<Vec<u16>> {
    Some(text.encode_utf16().collect())
}

fn named(record: &PrinterRecord, name: &str) -> bool {
    record.printer_name.as_deref().map(from_wide).as_deref() == Some(name)
}

impl FakeSpooler {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Install a printer with the given name and otherwise empty fields.
    pub fn with_printer(self, name: &str) -> Self {
        self.with_printer_record(PrinterRecord {
            printer_name: wide(name),
            ..Default::default()
        })
    }

    pub fn with_printer_record(self, record: PrinterRecord) -> Self {
        self.state().printers.push(record);
        self
    }

    pub fn with_job(self, printer: &str, job_id: u32, document: &str) -> Self {
        let record = JobRecord {
            job_id,
            document: wide(document),
            user_name: wide("alice"),
            size: 2048,
            pages_printed: 1,
            ..Default::default()
        };
        self.state().jobs.insert((printer.to_string(), job_id), record);
        self
    }

    pub fn with_default_printer(self, name: &str) -> Self {
        self.state().default_printer = Some(name.to_string());
        self
    }

    pub fn with_processor(self, name: &str, datatypes: &[&str]) -> Self {
        let datatypes = datatypes.iter().map(|d| d.to_string()).collect();
        self.state().processors.push((name.to_string(), datatypes));
        self
    }

    /// Make every call logged as `call` fail with `code`.
    ///
    /// Probe calls are logged as `"<Name> probe"`; per-processor data type
    /// calls as `"EnumPrintProcessorDatatypesW <processor>"`.
    pub fn failing(self, call: &str, code: OsCode) -> Self {
        self.state().failures.insert(call.to_string(), code);
        self
    }

    /// Value returned by `last_error` when no call has failed.
    pub fn with_last_error(self, code: OsCode) -> Self {
        self.state().last_error = code;
        self
    }

    /// Make `WritePrinter` report success but accept only `bytes`.
    pub fn with_short_write(self, bytes: u32) -> Self {
        self.state().short_write = Some(bytes);
        self
    }

    /// Make the `EnumPrintersW` probe report `capacity` regardless of the
    /// installed printers, as when the printer set changes between calls.
    pub fn with_printer_capacity(self, capacity: Capacity) -> Self {
        self.state().printer_capacity = Some(capacity);
        self
    }

    /// Every native call received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn call(&self, name: &str) -> NativeResult<()> {
        let mut state = self.state();
        state.calls.push(name.to_string());
        match state.failures.get(name).copied() {
            Some(code) => {
                state.last_error = code;
                Err(code)
            }
            None => Ok(()),
        }
    }
}

impl Spooler for FakeSpooler {
    fn platform_name(&self) -> &str {
        "fake"
    }

    fn last_error(&self) -> OsCode {
        self.state().last_error
    }

    fn error_text(&self, code: OsCode) -> Option<String> {
        match code {
            ERROR_INVALID_PRINTER_NAME => Some("The printer name is invalid.\r\n".into()),
            ERROR_INVALID_PARAMETER => Some("The parameter is incorrect.\r\n".into()),
            _ => None,
        }
    }

    fn open_printer(&self, name: &str) -> NativeResult<Box<dyn PrinterSession + '_>> {
        self.call("OpenPrinterW")?;
        let known = self
            .state()
            .printers
            .iter()
            .any(|p| named(p, name));
        if !known {
            self.state().last_error = ERROR_INVALID_PRINTER_NAME;
            return Err(ERROR_INVALID_PRINTER_NAME);
        }
        Ok(Box::new(FakeSession {
            spooler: self,
            printer: name.to_string(),
        }))
    }

    fn probe_printers(&self, _scope: EnumScope) -> Capacity {
        if self.call("EnumPrintersW probe").is_err() {
            return Capacity::default();
        }
        let state = self.state();
        if let Some(capacity) = state.printer_capacity {
            return capacity;
        }
        let count = state.printers.len() as u32;
        Capacity::new(count * RECORD_BYTES, count)
    }

    fn fetch_printers(
        &self,
        _scope: EnumScope,
        _capacity: Capacity,
    ) -> NativeResult<Vec<PrinterRecord>> {
        self.call("EnumPrintersW")?;
        Ok(self.state().printers.clone())
    }

    fn probe_default_printer(&self) -> Capacity {
        if self.call("GetDefaultPrinterW probe").is_err() {
            return Capacity::default();
        }
        match &self.state().default_printer {
            Some(name) => Capacity::new(name.encode_utf16().count() as u32 + 1, 1),
            None => Capacity::default(),
        }
    }

    fn fetch_default_printer(&self, _capacity: Capacity) -> NativeResult<Vec<u16>> {
        self.call("GetDefaultPrinterW")?;
        let name = self.state().default_printer.clone().unwrap_or_default();
        Ok(name.encode_utf16().collect())
    }

    fn probe_print_processors(&self) -> NativeResult<Capacity> {
        self.call("EnumPrintProcessorsW probe")?;
        let count = self.state().processors.len() as u32;
        Ok(Capacity::new(count * RECORD_BYTES, count))
    }

    fn fetch_print_processors(&self, _capacity: Capacity) -> NativeResult<Vec<Vec<u16>>> {
        self.call("EnumPrintProcessorsW")?;
        let names = self
            .state()
            .processors
            .iter()
            .map(|(name, _)| name.encode_utf16().collect())
            .collect();
        Ok(names)
    }

    fn probe_datatypes(&self, processor: &[u16]) -> Capacity {
        let processor = from_wide(processor);
        let probe = format!("EnumPrintProcessorDatatypesW probe {processor}");
        if self.call(&probe).is_err() {
            return Capacity::default();
        }
        let count = self
            .state()
            .processors
            .iter()
            .find(|(name, _)| *name == processor)
            .map_or(0, |(_, types)| types.len() as u32);
        Capacity::new(count * RECORD_BYTES, count)
    }

    fn fetch_datatypes(
        &self,
        processor: &[u16],
        _capacity: Capacity,
    ) -> NativeResult<Vec<Vec<u16>>> {
        let processor = from_wide(processor);
        self.call(&format!("EnumPrintProcessorDatatypesW {processor}"))?;
        let types = self
            .state()
            .processors
            .iter()
            .find(|(name, _)| *name == processor)
            .map(|(_, types)| {
                types
                    .iter()
                    .map(|t| t.encode_utf16().collect())
                    .collect()
            })
            .unwrap_or_default();
        Ok(types)
    }
}

/// Session handed out by [`FakeSpooler::open_printer`]; logs its release.
struct FakeSession<'a> {
    spooler: &'a FakeSpooler,
    printer: String,
}

impl Drop for FakeSession<'_> {
    fn drop(&mut self) {
        self.spooler.state().calls.push("ClosePrinter".into());
    }
}

impl PrinterSession for FakeSession<'_> {
    fn probe_printer(&self) -> NativeResult<Capacity> {
        self.spooler.call("GetPrinterW probe")?;
        Ok(Capacity::new(RECORD_BYTES, 1))
    }

    fn fetch_printer(&self, _capacity: Capacity) -> NativeResult<PrinterRecord> {
        self.spooler.call("GetPrinterW")?;
        let state = self.spooler.state();
        let record = state
            .printers
            .iter()
            .find(|p| named(p, &self.printer))
            .cloned()
            .unwrap_or_default();
        Ok(record)
    }

    fn probe_job(&self, job_id: u32) -> NativeResult<Capacity> {
        self.spooler.call("GetJobW probe")?;
        if !self.spooler.state().jobs.contains_key(&(self.printer.clone(), job_id)) {
            self.spooler.state().last_error = ERROR_INVALID_PARAMETER;
            return Err(ERROR_INVALID_PARAMETER);
        }
        Ok(Capacity::new(RECORD_BYTES, 1))
    }

    fn fetch_job(&self, job_id: u32, _capacity: Capacity) -> NativeResult<JobRecord> {
        self.spooler.call("GetJobW")?;
        let state = self.spooler.state();
        state
            .jobs
            .get(&(self.printer.clone(), job_id))
            .cloned()
            .ok_or(ERROR_INVALID_PARAMETER)
    }

    fn control_job(&self, job_id: u32, command: u32) -> NativeResult<()> {
        self.spooler.call(&format!("SetJobW {job_id} {command}"))?;
        self.spooler.call("SetJobW")
    }

    fn start_doc(&self, doc_name: &str, datatype: &str) -> NativeResult<u32> {
        self.spooler.call(&format!("StartDocPrinterW {doc_name} {datatype}"))?;
        self.spooler.call("StartDocPrinterW")?;
        let mut state = self.spooler.state();
        state.next_job_id += 1;
        Ok(state.next_job_id)
    }

    fn start_page(&self) -> NativeResult<()> {
        self.spooler.call("StartPagePrinter")
    }

    fn write(&self, data: &[u8]) -> NativeResult<u32> {
        self.spooler.call("WritePrinter")?;
        let short = self.spooler.state().short_write;
        Ok(short.unwrap_or(data.len() as u32))
    }

    fn end_page(&self) -> NativeResult<()> {
        self.spooler.call("EndPagePrinter")
    }

    fn end_doc(&self) -> NativeResult<()> {
        self.spooler.call("EndDocPrinter")
    }
}
