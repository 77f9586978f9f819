// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exercises the exported C ABI end to end: argument decoding, envelope
// shape, and buffer ownership.

use std::ffi::{CStr, c_char};

use serde_json::Value;
use spoolbridge::*;

/// Copy out, free, and parse one returned buffer.
fn take(ptr: *mut c_char) -> Value {
    assert!(!ptr.is_null(), "exports never return null");
    let text = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .expect("envelope is UTF-8")
        .to_owned();
    unsafe { FreeString(ptr) };
    serde_json::from_str(&text).expect("envelope is valid JSON")
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn assert_envelope_shape(env: &Value) {
    let keys: Vec<&str> = env
        .as_object()
        .expect("envelope is an object")
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["status", "err_msg", "err_step", "err_code", "response"] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

#[test]
fn job_commands_are_the_fixed_keyword_set() {
    let env = take(GetSupportedJobCommandsJson());
    assert_envelope_shape(&env);
    assert_eq!(env["status"], 0);
    assert_eq!(
        env["response"],
        serde_json::json!([
            "CANCEL",
            "DELETE",
            "LAST-PAGE-EJECTED",
            "PAUSE",
            "RESTART",
            "RESUME",
            "SENT-TO-PRINTER"
        ])
    );
}

#[test]
fn job_commands_are_stable_across_calls() {
    let first = take(GetSupportedJobCommandsJson());
    let second = take(GetSupportedJobCommandsJson());
    assert_eq!(first, second);
}

#[test]
fn free_string_ignores_null() {
    unsafe { FreeString(std::ptr::null_mut()) };
}

#[test]
fn unknown_job_command_fails_before_touching_the_spooler() {
    let printer = wide("Office");
    let env = take(unsafe { SetJobJson(printer.as_ptr(), 7, c"FOO".as_ptr()) });
    assert_envelope_shape(&env);
    assert_eq!(env["status"], 1);
    assert_eq!(env["err_step"], "lookup");
    assert_eq!(env["err_code"], 0);
    assert_eq!(env["err_msg"], "Invalid job command");
    assert_eq!(env["response"], Value::Null);
}

#[test]
fn null_printer_name_is_rejected() {
    let env = take(unsafe { GetPrinterJson(std::ptr::null()) });
    assert_eq!(env["status"], 1);
    assert_eq!(env["err_step"], "arguments");
    assert_eq!(env["err_code"], 0);
    assert_eq!(env["response"], serde_json::json!({}));

    let env = take(unsafe { GetJobJson(std::ptr::null(), 1) });
    assert_eq!(env["err_step"], "arguments");
    assert_eq!(env["response"], serde_json::json!({}));
}

#[test]
fn null_or_malformed_command_is_rejected() {
    let printer = wide("Office");
    let env = take(unsafe { SetJobJson(printer.as_ptr(), 1, std::ptr::null()) });
    assert_eq!(env["err_step"], "arguments");
    assert_eq!(env["response"], Value::Null);

    let bad = [0xffu8 as c_char, 0xfe_u8 as c_char, 0];
    let env = take(unsafe { SetJobJson(printer.as_ptr(), 1, bad.as_ptr()) });
    assert_eq!(env["err_step"], "arguments");
}

#[test]
fn raw_print_rejects_null_data_with_length() {
    let printer = wide("Zebra");
    let env = take(unsafe {
        PrintDirectJson(
            printer.as_ptr(),
            std::ptr::null(),
            16,
            std::ptr::null(),
            std::ptr::null(),
        )
    });
    assert_eq!(env["status"], 1);
    assert_eq!(env["err_step"], "arguments");
    assert_eq!(env["response"], Value::Null);
}

#[cfg(not(windows))]
mod unsupported_platform {
    use super::*;

    const ERROR_NOT_SUPPORTED: u64 = 50;

    #[test]
    fn printer_lookup_fails_at_open() {
        let printer = wide("Office");
        let env = take(unsafe { GetPrinterJson(printer.as_ptr()) });
        assert_eq!(env["status"], 1);
        assert_eq!(env["err_step"], "OpenPrinterW");
        assert_eq!(env["err_code"], ERROR_NOT_SUPPORTED);
        assert_eq!(env["err_msg"], "The request is not supported.");
        assert_eq!(env["response"], serde_json::json!({}));
    }

    #[test]
    fn printer_listing_fails_with_empty_array() {
        let env = take(GetPrintersJson());
        assert_eq!(env["status"], 1);
        assert_eq!(env["err_step"], "EnumPrintersW");
        assert_eq!(env["response"], serde_json::json!([]));
    }

    #[test]
    fn default_printer_is_null() {
        let env = take(GetDefaultPrinterNameJson());
        assert_eq!(env["status"], 1);
        assert_eq!(env["err_step"], "GetDefaultPrinterW");
        assert_eq!(env["response"], Value::Null);
    }

    #[test]
    fn print_formats_fail_at_processor_enumeration() {
        let env = take(GetSupportedPrintFormatsJson());
        assert_eq!(env["status"], 1);
        assert_eq!(env["err_step"], "EnumPrintProcessorsW");
        assert_eq!(env["response"], serde_json::json!([]));
    }

    #[test]
    fn empty_raw_print_fails_at_open() {
        let printer = wide("Zebra");
        let doc = wide("label");
        let env = take(unsafe {
            PrintDirectJson(
                printer.as_ptr(),
                std::ptr::null(),
                0,
                doc.as_ptr(),
                std::ptr::null(),
            )
        });
        assert_eq!(env["status"], 1);
        assert_eq!(env["err_step"], "OpenPrinterW");
        assert_eq!(env["response"], Value::Null);
    }
}
