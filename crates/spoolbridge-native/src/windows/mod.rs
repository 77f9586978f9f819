// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows spooler backend via winspool (`windows-sys`).
//
// ## Probe-then-fetch on winspool
//
// Every variable-length winspool query is called twice. The probe passes a
// null buffer and is expected to return FALSE with ERROR_INSUFFICIENT_BUFFER
// while writing the required size; that combination counts as a successful
// probe. The fetch then passes a `ProbeBuffer` of exactly that size.
//
// Records in the fetched buffer point into the same buffer, so every string
// is copied out (`PrinterRecord`, `JobRecord`, plain wide vectors) before the
// buffer is dropped.

#![cfg(windows)]

mod handle;

use std::ptr::{null, null_mut};

use windows_sys::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, GetLastError};
use windows_sys::Win32::Graphics::Printing::{
    DATATYPES_INFO_1W, EnumPrintProcessorDatatypesW, EnumPrintProcessorsW, EnumPrintersW,
    GetDefaultPrinterW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_2W,
    PRINTPROCESSOR_INFO_1W,
};
use windows_sys::Win32::System::Diagnostics::Debug::{
    FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS, FormatMessageW,
};

use spoolbridge_core::Capacity;
use spoolbridge_core::records::PrinterRecord;
use spoolbridge_core::wide::{from_wide, to_wide, wide_units_from_ptr};

use crate::buffer::ProbeBuffer;
use crate::traits::*;

pub use handle::PrinterHandle;

/// Record level used for printer and job queries.
const INFO_LEVEL_2: u32 = 2;

/// Record level used for print processor and data type enumeration.
const INFO_LEVEL_1: u32 = 1;

/// Capacity of the stack buffer used for system error messages.
const MESSAGE_CAPACITY: usize = 512;

/// Read the calling thread's last OS error.
pub(crate) fn last_os_error() -> OsCode {
    // SAFETY: GetLastError has no preconditions.
    unsafe { GetLastError() }
}

/// Interpret the outcome of a probe call.
///
/// A probe "fails" the winspool way (FALSE + ERROR_INSUFFICIENT_BUFFER) when
/// it succeeds at reporting a size, so only other errors are failures.
pub(crate) fn probe_outcome(ok: i32, needed: u32, count: u32) -> NativeResult<Capacity> {
    if ok != 0 {
        return Ok(Capacity::new(needed, count));
    }
    match last_os_error() {
        ERROR_INSUFFICIENT_BUFFER => Ok(Capacity::new(needed, count)),
        code => Err(code),
    }
}

/// Copy a spooler-owned wide string out of a record buffer.
///
/// # Safety
///
/// `ptr` must be null or a NUL-terminated string inside a live buffer.
pub(crate) unsafe fn copy_wide(ptr: *const u16) -> Option<Vec<u16>> {
    // SAFETY: forwarded to the caller.
    unsafe { wide_units_from_ptr(ptr) }
}

/// Copy the fields of a `PRINTER_INFO_2W` that Spoolbridge reports.
///
/// # Safety
///
/// `info` must come from a buffer filled by winspool that is still alive.
pub(crate) unsafe fn printer_record(info: &PRINTER_INFO_2W) -> PrinterRecord {
    // SAFETY: string pointers point into the same live buffer as `info`.
    unsafe {
        PrinterRecord {
            printer_name: copy_wide(info.pPrinterName),
            server_name: copy_wide(info.pServerName),
            share_name: copy_wide(info.pShareName),
            port_name: copy_wide(info.pPortName),
            driver_name: copy_wide(info.pDriverName),
            comment: copy_wide(info.pComment),
            location: copy_wide(info.pLocation),
            status: info.Status,
            attributes: info.Attributes,
            jobs: info.cJobs,
        }
    }
}

fn enum_flags(scope: EnumScope) -> u32 {
    let mut flags = 0;
    if scope.local {
        flags |= PRINTER_ENUM_LOCAL;
    }
    if scope.connections {
        flags |= PRINTER_ENUM_CONNECTIONS;
    }
    flags
}

/// Winspool-backed spooler. Stateless; every call goes straight to the OS.
pub struct WinSpooler;

impl WinSpooler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WinSpooler {
    fn default() -> Self {
        Self::new()
    }
}

impl Spooler for WinSpooler {
    fn platform_name(&self) -> &str {
        "winspool"
    }

    fn last_error(&self) -> OsCode {
        last_os_error()
    }

    fn error_text(&self, code: OsCode) -> Option<String> {
        let mut buf = [0u16; MESSAGE_CAPACITY];
        // SAFETY: the buffer is writable for MESSAGE_CAPACITY units and no
        // insert arguments are consumed.
        let len = unsafe {
            FormatMessageW(
                FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
                null(),
                code,
                0,
                buf.as_mut_ptr(),
                MESSAGE_CAPACITY as u32,
                null(),
            )
        };
        if len == 0 {
            return None;
        }
        Some(from_wide(&buf[..len as usize]))
    }

    fn open_printer(&self, name: &str) -> NativeResult<Box<dyn PrinterSession + '_>> {
        let handle = PrinterHandle::open(name)?;
        Ok(Box::new(handle))
    }

    fn probe_printers(&self, scope: EnumScope) -> Capacity {
        let (mut needed, mut count) = (0u32, 0u32);
        // Return value unchecked: a failed probe leaves `needed` at zero,
        // which the caller reports as an empty enumeration.
        // SAFETY: a null buffer with size 0 only asks for the required size.
        unsafe {
            EnumPrintersW(
                enum_flags(scope),
                null_mut(),
                INFO_LEVEL_2,
                null_mut(),
                0,
                &mut needed,
                &mut count,
            )
        };
        tracing::debug!(needed, count, "EnumPrintersW probe");
        Capacity::new(needed, count)
    }

    fn fetch_printers(
        &self,
        scope: EnumScope,
        capacity: Capacity,
    ) -> NativeResult<Vec<PrinterRecord>> {
        let mut buf = ProbeBuffer::new(capacity.required);
        let (mut needed, mut count) = (0u32, 0u32);
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let ok = unsafe {
            EnumPrintersW(
                enum_flags(scope),
                null_mut(),
                INFO_LEVEL_2,
                buf.as_mut_ptr(),
                buf.len(),
                &mut needed,
                &mut count,
            )
        };
        if ok == 0 {
            return Err(last_os_error());
        }
        // SAFETY: winspool wrote `count` PRINTER_INFO_2W records at the head
        // of `buf`, and their strings live in the tail of `buf`.
        let records = unsafe { buf.records::<PRINTER_INFO_2W>(count) }
            .iter()
            .map(|info| unsafe { printer_record(info) })
            .collect();
        Ok(records)
    }

    fn probe_default_printer(&self) -> Capacity {
        let mut needed = 0u32;
        // SAFETY: a null buffer only asks for the required length.
        unsafe { GetDefaultPrinterW(null_mut(), &mut needed) };
        Capacity::new(needed, 1)
    }

    fn fetch_default_printer(&self, capacity: Capacity) -> NativeResult<Vec<u16>> {
        let mut name = vec![0u16; capacity.required as usize];
        let mut size = capacity.required;
        // SAFETY: `name` is writable for `size` UTF-16 units.
        let ok = unsafe { GetDefaultPrinterW(name.as_mut_ptr(), &mut size) };
        if ok == 0 {
            return Err(last_os_error());
        }
        let end = name.iter().position(|&u| u == 0).unwrap_or(name.len());
        name.truncate(end);
        Ok(name)
    }

    fn probe_print_processors(&self) -> NativeResult<Capacity> {
        let (mut needed, mut count) = (0u32, 0u32);
        // SAFETY: a null buffer only asks for the required size.
        let ok = unsafe {
            EnumPrintProcessorsW(
                null_mut(),
                null_mut(),
                INFO_LEVEL_1,
                null_mut(),
                0,
                &mut needed,
                &mut count,
            )
        };
        probe_outcome(ok, needed, count)
    }

    fn fetch_print_processors(&self, capacity: Capacity) -> NativeResult<Vec<Vec<u16>>> {
        let mut buf = ProbeBuffer::new(capacity.required);
        let (mut needed, mut count) = (0u32, 0u32);
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let ok = unsafe {
            EnumPrintProcessorsW(
                null_mut(),
                null_mut(),
                INFO_LEVEL_1,
                buf.as_mut_ptr(),
                buf.len(),
                &mut needed,
                &mut count,
            )
        };
        if ok == 0 {
            return Err(last_os_error());
        }
        // SAFETY: `count` PRINTPROCESSOR_INFO_1W records head the buffer.
        let names = unsafe { buf.records::<PRINTPROCESSOR_INFO_1W>(count) }
            .iter()
            .filter_map(|info| unsafe { copy_wide(info.pName) })
            .collect();
        Ok(names)
    }

    fn probe_datatypes(&self, processor: &[u16]) -> Capacity {
        let mut name = to_wide(&from_wide(processor));
        let (mut needed, mut count) = (0u32, 0u32);
        // SAFETY: `name` is NUL-terminated; a null buffer only asks for size.
        unsafe {
            EnumPrintProcessorDatatypesW(
                null_mut(),
                name.as_mut_ptr(),
                INFO_LEVEL_1,
                null_mut(),
                0,
                &mut needed,
                &mut count,
            )
        };
        Capacity::new(needed, count)
    }

    fn fetch_datatypes(
        &self,
        processor: &[u16],
        capacity: Capacity,
    ) -> NativeResult<Vec<Vec<u16>>> {
        let mut name = to_wide(&from_wide(processor));
        let mut buf = ProbeBuffer::new(capacity.required);
        let (mut needed, mut count) = (0u32, 0u32);
        // SAFETY: `name` is NUL-terminated; `buf` is writable for its length.
        let ok = unsafe {
            EnumPrintProcessorDatatypesW(
                null_mut(),
                name.as_mut_ptr(),
                INFO_LEVEL_1,
                buf.as_mut_ptr(),
                buf.len(),
                &mut needed,
                &mut count,
            )
        };
        if ok == 0 {
            return Err(last_os_error());
        }
        // SAFETY: `count` DATATYPES_INFO_1W records head the buffer.
        let names = unsafe { buf.records::<DATATYPES_INFO_1W>(count) }
            .iter()
            .filter_map(|info| unsafe { copy_wide(info.pName) })
            .collect();
        Ok(names)
    }
}
