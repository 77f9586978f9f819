// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped printer handle.
//
// `OpenPrinterW` in `open`, `ClosePrinter` in `Drop`. A `PrinterHandle`
// only exists for a successfully opened printer, so every early return in
// an operation (the `?` after any failed call) releases it.

use std::ptr::null_mut;

use windows_sys::Win32::Foundation::ERROR_INSUFFICIENT_BUFFER;
use windows_sys::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, GetJobW, GetPrinterW,
    JOB_INFO_2W, OpenPrinterW, PRINTER_HANDLE, PRINTER_INFO_2W, SetJobW, StartDocPrinterW,
    StartPagePrinter, WritePrinter,
};

use spoolbridge_core::Capacity;
use spoolbridge_core::records::{JobRecord, PrinterRecord};
use spoolbridge_core::wide::to_wide;

use super::{INFO_LEVEL_2, copy_wide, last_os_error, printer_record, probe_outcome};
use crate::buffer::ProbeBuffer;
use crate::traits::{NativeResult, PrinterSession};

/// An open winspool printer handle, closed on drop.
pub struct PrinterHandle {
    raw: PRINTER_HANDLE,
    name: String,
}

impl PrinterHandle {
    /// Open `name` with default access. Fails with the OS error code.
    pub fn open(name: &str) -> NativeResult<Self> {
        let mut wide = to_wide(name);
        // SAFETY: zero is the "no handle" value for PRINTER_HANDLE.
        let mut raw: PRINTER_HANDLE = unsafe { std::mem::zeroed() };
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let ok = unsafe { OpenPrinterW(wide.as_mut_ptr(), &mut raw, null_mut()) };
        if ok == 0 {
            let code = last_os_error();
            tracing::debug!(printer = name, code, "OpenPrinterW failed");
            return Err(code);
        }
        tracing::trace!(printer = name, "printer handle opened");
        Ok(Self {
            raw,
            name: name.to_string(),
        })
    }

    fn check(&self, ok: i32) -> NativeResult<()> {
        if ok == 0 {
            Err(last_os_error())
        } else {
            Ok(())
        }
    }
}

impl Drop for PrinterHandle {
    fn drop(&mut self) {
        // SAFETY: `raw` came from a successful OpenPrinterW and is closed
        // exactly once, here.
        let ok = unsafe { ClosePrinter(self.raw) };
        if ok == 0 {
            tracing::warn!(printer = %self.name, code = last_os_error(), "ClosePrinter failed");
        }
    }
}

impl PrinterSession for PrinterHandle {
    fn probe_printer(&self) -> NativeResult<Capacity> {
        let mut needed = 0u32;
        // SAFETY: a null buffer with size 0 only asks for the required size.
        let ok = unsafe { GetPrinterW(self.raw, INFO_LEVEL_2, null_mut(), 0, &mut needed) };
        probe_outcome(ok, needed, 1)
    }

    fn fetch_printer(&self, capacity: Capacity) -> NativeResult<PrinterRecord> {
        let mut buf = ProbeBuffer::new(capacity.required);
        let mut needed = 0u32;
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let ok = unsafe {
            GetPrinterW(
                self.raw,
                INFO_LEVEL_2,
                buf.as_mut_ptr(),
                buf.len(),
                &mut needed,
            )
        };
        self.check(ok)?;
        // SAFETY: one PRINTER_INFO_2W heads the buffer on success.
        let info = unsafe { buf.first::<PRINTER_INFO_2W>() }
            .ok_or(ERROR_INSUFFICIENT_BUFFER)?;
        // SAFETY: its strings point into `buf`, which is still alive.
        Ok(unsafe { printer_record(info) })
    }

    fn probe_job(&self, job_id: u32) -> NativeResult<Capacity> {
        let mut needed = 0u32;
        // SAFETY: a null buffer with size 0 only asks for the required size.
        let ok = unsafe { GetJobW(self.raw, job_id, INFO_LEVEL_2, null_mut(), 0, &mut needed) };
        probe_outcome(ok, needed, 1)
    }

    fn fetch_job(&self, job_id: u32, capacity: Capacity) -> NativeResult<JobRecord> {
        let mut buf = ProbeBuffer::new(capacity.required);
        let mut needed = 0u32;
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let ok = unsafe {
            GetJobW(
                self.raw,
                job_id,
                INFO_LEVEL_2,
                buf.as_mut_ptr(),
                buf.len(),
                &mut needed,
            )
        };
        self.check(ok)?;
        // SAFETY: one JOB_INFO_2W heads the buffer on success.
        let info = unsafe { buf.first::<JOB_INFO_2W>() }
            .ok_or(ERROR_INSUFFICIENT_BUFFER)?;
        // SAFETY: its strings point into `buf`, which is still alive.
        let record = unsafe {
            JobRecord {
                job_id: info.JobId,
                document: copy_wide(info.pDocument),
                user_name: copy_wide(info.pUserName),
                status: info.Status,
                size: info.Size,
                pages_printed: info.PagesPrinted,
            }
        };
        Ok(record)
    }

    fn control_job(&self, job_id: u32, command: u32) -> NativeResult<()> {
        // SAFETY: level 0 with a null record only issues `command`.
        let ok = unsafe { SetJobW(self.raw, job_id, 0, null_mut(), command) };
        self.check(ok)
    }

    fn start_doc(&self, doc_name: &str, datatype: &str) -> NativeResult<u32> {
        let mut doc_name = to_wide(doc_name);
        let mut datatype = to_wide(datatype);
        let doc_info = DOC_INFO_1W {
            pDocName: doc_name.as_mut_ptr(),
            pOutputFile: null_mut(),
            pDatatype: datatype.as_mut_ptr(),
        };
        // SAFETY: `doc_info` and the strings it points to outlive the call.
        let job_id = unsafe {
            StartDocPrinterW(self.raw, 1, (&doc_info as *const DOC_INFO_1W).cast())
        };
        if job_id == 0 {
            return Err(last_os_error());
        }
        Ok(job_id)
    }

    fn start_page(&self) -> NativeResult<()> {
        // SAFETY: `raw` is an open printer handle.
        let ok = unsafe { StartPagePrinter(self.raw) };
        self.check(ok)
    }

    fn write(&self, data: &[u8]) -> NativeResult<u32> {
        let mut written = 0u32;
        // SAFETY: `data` is readable for `data.len()` bytes; callers keep
        // payloads below 4 GiB.
        let ok = unsafe {
            WritePrinter(
                self.raw,
                data.as_ptr().cast(),
                data.len() as u32,
                &mut written,
            )
        };
        self.check(ok)?;
        Ok(written)
    }

    fn end_page(&self) -> NativeResult<()> {
        // SAFETY: `raw` is an open printer handle.
        let ok = unsafe { EndPagePrinter(self.raw) };
        self.check(ok)
    }

    fn end_doc(&self) -> NativeResult<()> {
        // SAFETY: `raw` is an open printer handle.
        let ok = unsafe { EndDocPrinter(self.raw) };
        self.check(ok)
    }
}
