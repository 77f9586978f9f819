// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON serialization layer: runs one operation and renders its outcome as a
// response envelope string.
//
// Each method here is the whole story of one exported call. A panic inside
// the operation or during serialization is caught and reported as a
// `TryCatch` failure envelope, so a caller always gets well-formed JSON.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use spoolbridge_core::envelope::sanitize_message;
use spoolbridge_core::error::{Result, SpoolError};
use spoolbridge_core::{BridgeConfig, EmptyResponse, Envelope};
use spoolbridge_native::{EnumScope, Spooler};
use tracing::{error, warn};

use crate::operations::{self, RawPrintRequest};

/// Renders every operation against one spooler and configuration.
pub struct JsonResponder<'a> {
    spooler: &'a dyn Spooler,
    config: &'a BridgeConfig,
}

impl<'a> JsonResponder<'a> {
    pub fn new(spooler: &'a dyn Spooler, config: &'a BridgeConfig) -> Self {
        Self { spooler, config }
    }

    /// `GetPrintersJson`: array of printers, `[]` on failure.
    pub fn printers(&self) -> String {
        let scope = EnumScope {
            local: true,
            connections: self.config.enumerate_connections,
        };
        self.respond("listing printers", EmptyResponse::Array, || {
            operations::list_printers(self.spooler, scope)
        })
    }

    /// `GetDefaultPrinterNameJson`: a string, `null` on failure.
    pub fn default_printer_name(&self) -> String {
        self.respond("getting the default printer", EmptyResponse::Null, || {
            operations::default_printer_name(self.spooler)
        })
    }

    /// `GetPrinterJson`: a printer object, `{}` on failure.
    pub fn printer(&self, name: &str) -> String {
        self.respond("getting printer", EmptyResponse::Object, || {
            operations::printer(self.spooler, name)
        })
    }

    /// `GetJobJson`: a job object, `{}` on failure.
    pub fn job(&self, printer: &str, job_id: u32) -> String {
        self.respond("getting job", EmptyResponse::Object, || {
            operations::job(self.spooler, printer, job_id)
        })
    }

    /// `SetJobJson`: `true`, `null` on failure.
    pub fn set_job(&self, printer: &str, job_id: u32, command: &str) -> String {
        self.respond("setting job command", EmptyResponse::Null, || {
            operations::set_job(self.spooler, printer, job_id, command)
        })
    }

    /// `GetSupportedJobCommandsJson`: array of keywords.
    pub fn supported_job_commands(&self) -> String {
        self.respond("getting supported job commands", EmptyResponse::Array, || {
            Ok(operations::supported_job_commands())
        })
    }

    /// `GetSupportedPrintFormatsJson`: array of data type names, `[]` on failure.
    pub fn supported_print_formats(&self) -> String {
        self.respond("getting supported print formats", EmptyResponse::Array, || {
            operations::supported_print_formats(self.spooler)
        })
    }

    /// `PrintDirectJson`: the job id, `null` on failure. Empty or missing
    /// document name and data type fall back to the configured defaults.
    pub fn print_raw(
        &self,
        printer: &str,
        data: &[u8],
        document_name: Option<&str>,
        datatype: Option<&str>,
    ) -> String {
        let document_name =
            non_empty(document_name).unwrap_or(self.config.default_document_name.as_str());
        let datatype = non_empty(datatype).unwrap_or(self.config.default_datatype.as_str());
        let request = RawPrintRequest {
            printer,
            data,
            document_name,
            datatype,
        };
        self.respond("printing raw data", EmptyResponse::Null, || {
            operations::print_raw(self.spooler, request)
        })
    }

    /// Failure envelope for a caller error detected before any operation
    /// runs (e.g. a null argument at the boundary).
    pub fn rejected(&self, err: SpoolError, empty: EmptyResponse) -> String {
        warn!(error = %err, "request rejected");
        Envelope::<()>::failure(&err, &err.to_string(), empty).to_json()
    }

    /// Formatted, newline-free OS message for `code`; empty if the OS has none.
    pub fn os_message(&self, code: u32) -> String {
        self.spooler
            .error_text(code)
            .map(|text| sanitize_message(text.trim_end()))
            .unwrap_or_default()
    }

    fn respond<T, F>(&self, context: &str, empty: EmptyResponse, op: F) -> String
    where
        T: Serialize,
        F: FnOnce() -> Result<T>,
    {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let result = op();
            if let Err(err) = &result {
                warn!(
                    context,
                    step = %err.step(),
                    code = err.code(),
                    error = %err,
                    "operation failed"
                );
            }
            Envelope::from_result(result, empty, |code| self.os_message(code)).to_json()
        }));
        match outcome {
            Ok(json) => json,
            Err(payload) => {
                error!(
                    context,
                    panic = panic_text(payload.as_ref()),
                    "internal fault contained"
                );
                let err = SpoolError::Internal(format!("Error {context}"));
                Envelope::<()>::failure(&err, &err.to_string(), empty).to_json()
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Best-effort text of a panic payload.
pub fn panic_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
