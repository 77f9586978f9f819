// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Spoolbridge C ABI.
//!
//! Every query export returns a heap-allocated, NUL-terminated UTF-8 JSON
//! envelope:
//!
//! ```json
//! {"status":0,"err_msg":"","err_step":"","err_code":0,"response":...}
//! ```
//!
//! The caller owns each returned buffer and must release it exactly once
//! with [`FreeString`]. No export returns null.
//!
//! Wide-string arguments are NUL-terminated UTF-16 (`wchar_t*` on Windows).
//! A null where a string is required yields a failure envelope with
//! `err_step` set to `"arguments"`.

#![allow(non_snake_case)]

mod logging;

use std::ffi::{CStr, CString, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use spoolbridge_core::envelope::FALLBACK_ENVELOPE;
use spoolbridge_core::wide::from_wide_ptr;
use spoolbridge_core::{BridgeConfig, EmptyResponse, Envelope, SpoolError};
use spoolbridge_native::{Spooler, platform_spooler};
use spoolbridge_print::JsonResponder;
use spoolbridge_print::respond::panic_text;
use tracing::{error, info};

/// Process-wide state, built on first use and read-only afterwards.
struct Runtime {
    spooler: Box<dyn Spooler>,
    config: BridgeConfig,
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        let config = BridgeConfig::load();
        logging::init(&config);
        let spooler = platform_spooler();
        info!(platform = spooler.platform_name(), "spoolbridge loaded");
        Runtime { spooler, config }
    })
}

/// Run one export body and hand the resulting JSON to the caller.
fn export<F>(context: &'static str, empty: EmptyResponse, body: F) -> *mut c_char
where
    F: FnOnce(&JsonResponder<'_>) -> String,
{
    let json = contain(context, empty, || {
        let rt = runtime();
        let responder = JsonResponder::new(rt.spooler.as_ref(), &rt.config);
        body(&responder)
    });
    into_c_string(json)
}

/// Run `body`, turning a panic into a `TryCatch` failure envelope whose
/// `response` is `empty`.
///
/// Covers what the responder cannot: argument decoding and runtime setup.
/// Unwinding never crosses the C boundary.
fn contain<F>(context: &'static str, empty: EmptyResponse, body: F) -> String
where
    F: FnOnce() -> String,
{
    catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        error!(context, panic = panic_text(payload.as_ref()), "export aborted");
        let err = SpoolError::Internal(format!("Error {context}"));
        Envelope::<()>::failure(&err, &err.to_string(), empty).to_json()
    })
}

fn into_c_string(json: String) -> *mut c_char {
    CString::new(json)
        .or_else(|_| CString::new(FALLBACK_ENVELOPE))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Decode a required wide-string argument.
///
/// # Safety
///
/// `ptr` must be null or a valid NUL-terminated UTF-16 string.
unsafe fn required_wide(ptr: *const u16, what: &'static str) -> Result<String, SpoolError> {
    // SAFETY: forwarded to the caller.
    unsafe { from_wide_ptr(ptr) }.ok_or(SpoolError::InvalidArgument(what))
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// All printers visible to the current user (local and connected).
#[unsafe(no_mangle)]
pub extern "C" fn GetPrintersJson() -> *mut c_char {
    export("GetPrintersJson", EmptyResponse::Array, |r| r.printers())
}

/// Name of the user's default printer.
#[unsafe(no_mangle)]
pub extern "C" fn GetDefaultPrinterNameJson() -> *mut c_char {
    export(
        "GetDefaultPrinterNameJson",
        EmptyResponse::Null,
        |r| r.default_printer_name(),
    )
}

/// Details of one printer.
///
/// # Safety
///
/// `printer_name` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GetPrinterJson(printer_name: *const u16) -> *mut c_char {
    export("GetPrinterJson", EmptyResponse::Object, |r| {
        // SAFETY: guaranteed by the caller.
        match unsafe { required_wide(printer_name, "printer name is null") } {
            Ok(name) => r.printer(&name),
            Err(err) => r.rejected(err, EmptyResponse::Object),
        }
    })
}

/// Details of one job in a printer's queue.
///
/// # Safety
///
/// `printer_name` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GetJobJson(printer_name: *const u16, job_id: u32) -> *mut c_char {
    export("GetJobJson", EmptyResponse::Object, |r| {
        // SAFETY: guaranteed by the caller.
        match unsafe { required_wide(printer_name, "printer name is null") } {
            Ok(name) => r.job(&name, job_id),
            Err(err) => r.rejected(err, EmptyResponse::Object),
        }
    })
}

/// Apply a control command (`"PAUSE"`, `"CANCEL"`, ...) to a job.
///
/// # Safety
///
/// `printer_name` must be null or a valid NUL-terminated UTF-16 string, and
/// `command` must be null or a valid NUL-terminated byte string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn SetJobJson(
    printer_name: *const u16,
    job_id: u32,
    command: *const c_char,
) -> *mut c_char {
    export("SetJobJson", EmptyResponse::Null, |r| {
        // SAFETY: guaranteed by the caller.
        let name = match unsafe { required_wide(printer_name, "printer name is null") } {
            Ok(name) => name,
            Err(err) => return r.rejected(err, EmptyResponse::Null),
        };
        if command.is_null() {
            let err = SpoolError::InvalidArgument("command is null");
            return r.rejected(err, EmptyResponse::Null);
        }
        // SAFETY: non-null and NUL-terminated per the caller's contract.
        match unsafe { CStr::from_ptr(command) }.to_str() {
            Ok(command) => r.set_job(&name, job_id, command),
            Err(_) => r.rejected(
                SpoolError::InvalidArgument("command is not valid UTF-8"),
                EmptyResponse::Null,
            ),
        }
    })
}

/// The job control keywords accepted by [`SetJobJson`].
#[unsafe(no_mangle)]
pub extern "C" fn GetSupportedJobCommandsJson() -> *mut c_char {
    export(
        "GetSupportedJobCommandsJson",
        EmptyResponse::Array,
        |r| r.supported_job_commands(),
    )
}

/// Data types accepted by the installed print processors.
#[unsafe(no_mangle)]
pub extern "C" fn GetSupportedPrintFormatsJson() -> *mut c_char {
    export(
        "GetSupportedPrintFormatsJson",
        EmptyResponse::Array,
        |r| r.supported_print_formats(),
    )
}

/// Submit `data` as one single-page document, bypassing rendering.
///
/// `document_name` and `data_type` may be null, in which case the configured
/// defaults apply. `data` may be null only when `data_len` is zero.
///
/// # Safety
///
/// `printer_name`, `document_name` and `data_type` must each be null or a
/// valid NUL-terminated UTF-16 string. `data` must be null or point to
/// `data_len` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn PrintDirectJson(
    printer_name: *const u16,
    data: *const u8,
    data_len: usize,
    document_name: *const u16,
    data_type: *const u16,
) -> *mut c_char {
    export("PrintDirectJson", EmptyResponse::Null, |r| {
        // SAFETY: guaranteed by the caller.
        let name = match unsafe { required_wide(printer_name, "printer name is null") } {
            Ok(name) => name,
            Err(err) => return r.rejected(err, EmptyResponse::Null),
        };
        let payload: &[u8] = if data.is_null() {
            if data_len != 0 {
                let err = SpoolError::InvalidArgument("data is null");
                return r.rejected(err, EmptyResponse::Null);
            }
            &[]
        } else {
            // SAFETY: the caller guarantees `data_len` readable bytes.
            unsafe { std::slice::from_raw_parts(data, data_len) }
        };
        // SAFETY: guaranteed by the caller.
        let document_name = unsafe { from_wide_ptr(document_name) };
        let data_type = unsafe { from_wide_ptr(data_type) };
        r.print_raw(&name, payload, document_name.as_deref(), data_type.as_deref())
    })
}

/// Release a buffer returned by any export. Null is ignored.
///
/// # Safety
///
/// `json` must be null or a pointer previously returned by this library and
/// not yet freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FreeString(json: *mut c_char) {
    if json.is_null() {
        return;
    }
    // SAFETY: allocated by `CString::into_raw` in `into_c_string`.
    drop(unsafe { CString::from_raw(json) });
}
