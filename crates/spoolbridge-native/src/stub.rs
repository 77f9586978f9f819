// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub spooler for non-Windows builds.
//
// Every native call fails with ERROR_NOT_SUPPORTED so the exported functions
// still return well-formed failure envelopes on CI and developer machines.

use spoolbridge_core::Capacity;
use spoolbridge_core::records::PrinterRecord;

use crate::traits::*;

/// `ERROR_NOT_SUPPORTED`.
pub const ERROR_NOT_SUPPORTED: OsCode = 50;

/// No-op spooler returned on platforms without winspool.
pub struct StubSpooler;

impl Spooler for StubSpooler {
    fn platform_name(&self) -> &str {
        "unsupported (stub)"
    }

    fn last_error(&self) -> OsCode {
        ERROR_NOT_SUPPORTED
    }

    fn error_text(&self, code: OsCode) -> Option<String> {
        (code == ERROR_NOT_SUPPORTED).then(|| "The request is not supported.\r\n".to_string())
    }

    fn open_printer(&self, name: &str) -> NativeResult<Box<dyn PrinterSession + '_>> {
        tracing::warn!(printer = name, "Spooler::open_printer called on stub spooler");
        Err(ERROR_NOT_SUPPORTED)
    }

    fn probe_printers(&self, _scope: EnumScope) -> Capacity {
        tracing::warn!("Spooler::probe_printers called on stub spooler");
        Capacity::default()
    }

    fn fetch_printers(
        &self,
        _scope: EnumScope,
        _capacity: Capacity,
    ) -> NativeResult<Vec<PrinterRecord>> {
        Err(ERROR_NOT_SUPPORTED)
    }

    fn probe_default_printer(&self) -> Capacity {
        tracing::warn!("Spooler::probe_default_printer called on stub spooler");
        Capacity::default()
    }

    fn fetch_default_printer(&self, _capacity: Capacity) -> NativeResult<Vec<u16>> {
        Err(ERROR_NOT_SUPPORTED)
    }

    fn probe_print_processors(&self) -> NativeResult<Capacity> {
        tracing::warn!("Spooler::probe_print_processors called on stub spooler");
        Err(ERROR_NOT_SUPPORTED)
    }

    fn fetch_print_processors(&self, _capacity: Capacity) -> NativeResult<Vec<Vec<u16>>> {
        Err(ERROR_NOT_SUPPORTED)
    }

    fn probe_datatypes(&self, _processor: &[u16]) -> Capacity {
        Capacity::default()
    }

    fn fetch_datatypes(
        &self,
        _processor: &[u16],
        _capacity: Capacity,
    ) -> NativeResult<Vec<Vec<u16>>> {
        Err(ERROR_NOT_SUPPORTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_printer_call_is_unsupported() {
        let stub = StubSpooler;
        assert_eq!(stub.open_printer("Any").err(), Some(ERROR_NOT_SUPPORTED));
        assert!(stub.probe_printers(EnumScope::default()).is_empty());
        assert_eq!(stub.probe_print_processors(), Err(ERROR_NOT_SUPPORTED));
        assert_eq!(stub.last_error(), ERROR_NOT_SUPPORTED);
    }

    #[test]
    fn only_not_supported_has_a_message() {
        let stub = StubSpooler;
        assert!(stub.error_text(ERROR_NOT_SUPPORTED).is_some());
        assert!(stub.error_text(5).is_none());
    }
}
