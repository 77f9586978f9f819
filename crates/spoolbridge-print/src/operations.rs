// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The eight spooler queries and commands.
//
// Each operation either yields a fully populated value or fails with the
// native error code and the step (winspool call) that failed. Nothing is
// retried and nothing partial is returned. Printer handles are opened per
// call and released when the session goes out of scope, on every path.
//
// Known limitation, kept deliberately: an enumeration that produces nothing
// (no printers, no default printer, no data types) is reported as a failure
// carrying the OS last-error code, even though that code may be stale.
// Callers rely on status 1 for "nothing there".

use spoolbridge_core::error::{Result, SpoolError, Step};
use spoolbridge_core::wide::from_wide;
use spoolbridge_core::{JobCommand, JobInfo, PrinterInfo};
use spoolbridge_native::{EnumScope, PrinterSession, Spooler};
use tracing::{debug, info, warn};

/// Arguments for [`print_raw`].
#[derive(Debug, Clone, Copy)]
pub struct RawPrintRequest<'a> {
    pub printer: &'a str,
    pub data: &'a [u8],
    pub document_name: &'a str,
    pub datatype: &'a str,
}

/// Open `name`, attributing failure to `OpenPrinterW`.
fn open<'s>(spooler: &'s dyn Spooler, name: &str) -> Result<Box<dyn PrinterSession + 's>> {
    spooler.open_printer(name).map_err(|code| {
        debug!(printer = name, code, "OpenPrinterW failed");
        SpoolError::native(Step::OpenPrinter, code)
    })
}

/// Enumerate local and connected printers.
pub fn list_printers(spooler: &dyn Spooler, scope: EnumScope) -> Result<Vec<PrinterInfo>> {
    let capacity = spooler.probe_printers(scope);
    debug!(
        required = capacity.required,
        count = capacity.count,
        "printer enumeration probed"
    );

    let mut printers = Vec::new();
    if !capacity.is_empty() {
        let records = spooler
            .fetch_printers(scope, capacity)
            .map_err(|code| SpoolError::native(Step::EnumPrinters, code))?;
        printers = records.iter().map(PrinterInfo::from).collect();
    }

    if printers.is_empty() {
        return Err(SpoolError::Empty {
            step: Step::EnumPrinters,
            code: spooler.last_error(),
        });
    }
    Ok(printers)
}

/// Name of the user's default printer.
pub fn default_printer_name(spooler: &dyn Spooler) -> Result<String> {
    let capacity = spooler.probe_default_printer();

    let mut name = String::new();
    if !capacity.is_empty() {
        let units = spooler
            .fetch_default_printer(capacity)
            .map_err(|code| SpoolError::native(Step::GetDefaultPrinter, code))?;
        name = from_wide(&units);
    }

    if name.is_empty() {
        return Err(SpoolError::Empty {
            step: Step::GetDefaultPrinter,
            code: spooler.last_error(),
        });
    }
    Ok(name)
}

/// Snapshot of one printer.
pub fn printer(spooler: &dyn Spooler, name: &str) -> Result<PrinterInfo> {
    let session = open(spooler, name)?;
    let capacity = session
        .probe_printer()
        .map_err(|code| SpoolError::native(Step::GetPrinter, code))?;
    let record = session
        .fetch_printer(capacity)
        .map_err(|code| SpoolError::native(Step::GetPrinter, code))?;
    Ok(PrinterInfo::from(&record))
}

/// Snapshot of one job on one printer.
pub fn job(spooler: &dyn Spooler, printer: &str, job_id: u32) -> Result<JobInfo> {
    let session = open(spooler, printer)?;
    let capacity = session
        .probe_job(job_id)
        .map_err(|code| SpoolError::native(Step::GetJob, code))?;
    let record = session
        .fetch_job(job_id, capacity)
        .map_err(|code| SpoolError::native(Step::GetJob, code))?;
    Ok(JobInfo::from(&record))
}

/// Issue a job-control command. The keyword is validated before any
/// native call is made.
pub fn set_job(
    spooler: &dyn Spooler,
    printer: &str,
    job_id: u32,
    keyword: &str,
) -> Result<bool> {
    let command: JobCommand = keyword.parse()?;
    let session = open(spooler, printer)?;
    session
        .control_job(job_id, command.native_code())
        .map_err(|code| SpoolError::native(Step::SetJob, code))?;
    info!(printer, job_id, %command, "job command issued");
    Ok(true)
}

/// The job-command keywords `set_job` accepts.
pub fn supported_job_commands() -> Vec<&'static str> {
    JobCommand::keywords().collect()
}

/// Every data type accepted by every installed print processor.
///
/// A processor reporting no data types is skipped. Failing to fetch any
/// processor's data types discards everything gathered so far.
pub fn supported_print_formats(spooler: &dyn Spooler) -> Result<Vec<String>> {
    let capacity = spooler
        .probe_print_processors()
        .map_err(|code| SpoolError::native(Step::EnumPrintProcessors, code))?;

    let mut formats = Vec::new();
    if !capacity.is_empty() {
        let processors = spooler
            .fetch_print_processors(capacity)
            .map_err(|code| SpoolError::native(Step::EnumPrintProcessors, code))?;

        for processor in &processors {
            let inner = spooler.probe_datatypes(processor);
            if inner.is_empty() {
                debug!(processor = %from_wide(processor), "print processor reports no data types");
                continue;
            }
            let datatypes = spooler
                .fetch_datatypes(processor, inner)
                .map_err(|code| SpoolError::native(Step::EnumPrintProcessorDatatypes, code))?;
            formats.extend(datatypes.iter().map(|d| from_wide(d)));
        }
    }

    if formats.is_empty() {
        return Err(SpoolError::Empty {
            step: Step::EnumPrintProcessors,
            code: spooler.last_error(),
        });
    }
    Ok(formats)
}

/// Send `request.data` to the printer as one document of one page.
///
/// On failure every stage already opened (page, then document) is closed
/// before the error is returned. Returns the spooler job id.
pub fn print_raw(spooler: &dyn Spooler, request: RawPrintRequest<'_>) -> Result<u32> {
    if u32::try_from(request.data.len()).is_err() {
        return Err(SpoolError::InvalidArgument("data exceeds 4 GiB"));
    }

    let session = open(spooler, request.printer)?;

    let job_id = session
        .start_doc(request.document_name, request.datatype)
        .map_err(|code| SpoolError::native(Step::StartDocPrinter, code))?;

    if let Err(code) = session.start_page() {
        close_stages(&*session, false);
        return Err(SpoolError::native(Step::StartPagePrinter, code));
    }

    match session.write(request.data) {
        Ok(written) if written as usize == request.data.len() => {}
        Ok(written) => {
            let code = spooler.last_error();
            close_stages(&*session, true);
            warn!(
                printer = request.printer,
                written,
                requested = request.data.len(),
                "short write"
            );
            return Err(SpoolError::ShortWrite {
                requested: request.data.len(),
                written,
                code,
            });
        }
        Err(code) => {
            close_stages(&*session, true);
            return Err(SpoolError::native(Step::WritePrinter, code));
        }
    }

    close_stages(&*session, true);
    info!(
        printer = request.printer,
        job_id,
        bytes = request.data.len(),
        datatype = request.datatype,
        "raw document spooled"
    );
    Ok(job_id)
}

/// End the page (if one was started) and the document. Failures here are
/// logged, never reported: the outcome of the job is already decided.
fn close_stages(session: &dyn PrinterSession, page_open: bool) {
    if page_open {
        if let Err(code) = session.end_page() {
            warn!(code, "EndPagePrinter failed");
        }
    }
    if let Err(code) = session.end_doc() {
        warn!(code, "EndDocPrinter failed");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use spoolbridge_core::Capacity;
    use spoolbridge_core::records::PrinterRecord;
    use spoolbridge_native::fake::{ERROR_INVALID_PRINTER_NAME, FakeSpooler};

    use super::*;

    /// Byte size reported for one record by the nonzero-probe tests.
    const RECORD_BYTES: u32 = 136;

    fn wide(s: &str) -> Option<Vec<u16>> {
        Some(s.encode_utf16().collect())
    }

    fn request<'a>(printer: &'a str, data: &'a [u8]) -> RawPrintRequest<'a> {
        RawPrintRequest {
            printer,
            data,
            document_name: "label",
            datatype: "RAW",
        }
    }

    // -- list_printers --

    #[test]
    fn lists_every_printer() {
        let spooler = FakeSpooler::new()
            .with_printer_record(PrinterRecord {
                printer_name: wide("Office"),
                port_name: wide("USB001"),
                jobs: 3,
                ..Default::default()
            })
            .with_printer("Microsoft Print to PDF");

        let printers = list_printers(&spooler, EnumScope::default()).expect("printers");
        assert_eq!(printers.len(), 2);
        assert_eq!(printers[0].name, "Office");
        assert_eq!(printers[0].port_name, "USB001");
        assert_eq!(printers[0].jobs, 3);
        assert_eq!(printers[1].name, "Microsoft Print to PDF");
    }

    #[test]
    fn no_printers_is_a_failure_with_last_error() {
        let spooler = FakeSpooler::new().with_last_error(0);
        let err = list_printers(&spooler, EnumScope::default()).unwrap_err();
        assert_eq!(err.step(), Step::EnumPrinters);
        assert!(matches!(err, SpoolError::Empty { code: 0, .. }));
        // Zero capacity: the fetch is never attempted.
        assert_eq!(spooler.calls(), vec!["EnumPrintersW probe"]);
    }

    #[test]
    fn empty_fetch_after_nonzero_probe_is_a_failure() {
        let spooler = FakeSpooler::new()
            .with_printer_capacity(Capacity::new(RECORD_BYTES, 1))
            .with_last_error(1722);
        let err = list_printers(&spooler, EnumScope::default()).unwrap_err();
        assert!(matches!(
            err,
            SpoolError::Empty {
                step: Step::EnumPrinters,
                code: 1722,
            }
        ));
        assert_eq!(spooler.calls(), vec!["EnumPrintersW probe", "EnumPrintersW"]);
    }

    #[test]
    fn failed_printer_fetch_names_enumeration() {
        let spooler = FakeSpooler::new()
            .with_printer("Office")
            .failing("EnumPrintersW", 5);
        let err = list_printers(&spooler, EnumScope::default()).unwrap_err();
        assert_eq!(err.step(), Step::EnumPrinters);
        assert_eq!(err.code(), 5);
    }

    // -- default_printer_name --

    #[test]
    fn default_printer_is_returned() {
        let spooler = FakeSpooler::new().with_default_printer("Office");
        assert_eq!(default_printer_name(&spooler).expect("name"), "Office");
    }

    #[test]
    fn missing_default_printer_fails_at_get_default() {
        let spooler = FakeSpooler::new().with_last_error(1722);
        let err = default_printer_name(&spooler).unwrap_err();
        assert_eq!(err.step(), Step::GetDefaultPrinter);
        assert_eq!(err.code(), 1722);
    }

    // -- printer --

    #[test]
    fn printer_snapshot_and_handle_released() {
        let spooler = FakeSpooler::new().with_printer_record(PrinterRecord {
            printer_name: wide("Office"),
            location: wide("Hall"),
            status: 0x80,
            ..Default::default()
        });

        let info = printer(&spooler, "Office").expect("printer");
        assert_eq!(info.location, "Hall");
        assert_eq!(info.status, 0x80);
        assert_eq!(
            spooler.calls(),
            vec!["OpenPrinterW", "GetPrinterW probe", "GetPrinterW", "ClosePrinter"]
        );
    }

    #[test]
    fn unknown_printer_fails_at_open() {
        let spooler = FakeSpooler::new();
        let err = printer(&spooler, "Nope").unwrap_err();
        assert_eq!(err.step(), Step::OpenPrinter);
        assert_eq!(err.code(), ERROR_INVALID_PRINTER_NAME);
        assert!(!spooler.calls().contains(&"ClosePrinter".to_string()));
    }

    #[test]
    fn failed_probe_still_releases_handle() {
        let spooler = FakeSpooler::new()
            .with_printer("Office")
            .failing("GetPrinterW probe", 6);
        let err = printer(&spooler, "Office").unwrap_err();
        assert_eq!(err.step(), Step::GetPrinter);
        assert_eq!(err.code(), 6);
        assert_eq!(spooler.calls().last().map(String::as_str), Some("ClosePrinter"));
    }

    // -- job --

    #[test]
    fn job_snapshot_is_mapped() {
        let spooler = FakeSpooler::new()
            .with_printer("Office")
            .with_job("Office", 9, "report.ps");
        let info = job(&spooler, "Office", 9).expect("job");
        assert_eq!(info.id, 9);
        assert_eq!(info.document, "report.ps");
        assert_eq!(info.user_name, "alice");
        assert_eq!(info.size, 2048);
    }

    #[test]
    fn unknown_job_fails_at_get_job() {
        let spooler = FakeSpooler::new().with_printer("Office");
        let err = job(&spooler, "Office", 404).unwrap_err();
        assert_eq!(err.step(), Step::GetJob);
        assert_ne!(err.code(), 0);
        assert_eq!(spooler.calls().last().map(String::as_str), Some("ClosePrinter"));
    }

    // -- set_job --

    #[test]
    fn cancel_sends_job_control_code() {
        let spooler = FakeSpooler::new()
            .with_printer("Office")
            .with_job("Office", 4, "a");
        assert!(set_job(&spooler, "Office", 4, "CANCEL").expect("cancel"));
        assert!(spooler.calls().contains(&"SetJobW 4 3".to_string()));
    }

    #[test]
    fn unknown_keyword_makes_no_native_call() {
        let spooler = FakeSpooler::new().with_printer("Office");
        let err = set_job(&spooler, "Office", 4, "FOO").unwrap_err();
        assert_eq!(err.step(), Step::Lookup);
        assert_eq!(err.code(), 0);
        assert!(spooler.calls().is_empty());
    }

    #[test]
    fn rejected_command_names_set_job() {
        let spooler = FakeSpooler::new()
            .with_printer("Office")
            .failing("SetJobW", 87);
        let err = set_job(&spooler, "Office", 4, "PAUSE").unwrap_err();
        assert_eq!(err.step(), Step::SetJob);
        assert_eq!(err.code(), 87);
    }

    // -- supported_job_commands --

    #[test]
    fn job_command_listing_is_stable() {
        let first: HashSet<_> = supported_job_commands().into_iter().collect();
        let second: HashSet<_> = supported_job_commands().into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
        assert!(first.contains("SENT-TO-PRINTER"));
    }

    // -- supported_print_formats --

    #[test]
    fn formats_span_all_processors_and_skip_empty_ones() {
        let spooler = FakeSpooler::new()
            .with_processor("winprint", &["RAW", "NT EMF 1.008", "TEXT"])
            .with_processor("empty", &[])
            .with_processor("vendor", &["RAW [FF appended]"]);

        let formats = supported_print_formats(&spooler).expect("formats");
        assert_eq!(formats, vec!["RAW", "NT EMF 1.008", "TEXT", "RAW [FF appended]"]);
        let calls = spooler.calls();
        assert!(!calls.contains(&"EnumPrintProcessorDatatypesW empty".to_string()));
    }

    #[test]
    fn only_empty_processors_is_a_failure_with_last_error() {
        let spooler = FakeSpooler::new()
            .with_processor("empty", &[])
            .with_last_error(1168);

        let err = supported_print_formats(&spooler).unwrap_err();
        assert!(matches!(
            err,
            SpoolError::Empty {
                step: Step::EnumPrintProcessors,
                code: 1168,
            }
        ));
        let calls = spooler.calls();
        assert!(calls.contains(&"EnumPrintProcessorDatatypesW probe empty".to_string()));
        assert!(!calls.contains(&"EnumPrintProcessorDatatypesW empty".to_string()));
    }

    #[test]
    fn inner_failure_discards_partial_results() {
        let spooler = FakeSpooler::new()
            .with_processor("winprint", &["RAW"])
            .with_processor("vendor", &["XPS"])
            .failing("EnumPrintProcessorDatatypesW vendor", 1784);

        let err = supported_print_formats(&spooler).unwrap_err();
        assert_eq!(err.step(), Step::EnumPrintProcessorDatatypes);
        assert_eq!(err.code(), 1784);
    }

    #[test]
    fn processor_probe_failure_names_outer_call() {
        let spooler = FakeSpooler::new()
            .failing("EnumPrintProcessorsW probe", 1804);
        let err = supported_print_formats(&spooler).unwrap_err();
        assert_eq!(err.step(), Step::EnumPrintProcessors);
        assert_eq!(err.code(), 1804);
    }

    // -- print_raw --

    #[test]
    fn raw_print_runs_every_stage_in_order() {
        let spooler = FakeSpooler::new().with_printer("Zebra");
        let job_id =
            print_raw(&spooler, request("Zebra", b"^XA^FDhello^FS^XZ")).expect("print");
        assert_eq!(job_id, 1);
        assert_eq!(
            spooler.calls(),
            vec![
                "OpenPrinterW",
                "StartDocPrinterW label RAW",
                "StartDocPrinterW",
                "StartPagePrinter",
                "WritePrinter",
                "EndPagePrinter",
                "EndDocPrinter",
                "ClosePrinter",
            ]
        );
    }

    #[test]
    fn empty_payload_is_not_a_short_write() {
        let spooler = FakeSpooler::new().with_printer("Zebra");
        assert!(print_raw(&spooler, request("Zebra", b"")).is_ok());
    }

    #[test]
    fn short_write_closes_page_and_document() {
        let spooler = FakeSpooler::new()
            .with_printer("Zebra")
            .with_short_write(2)
            .with_last_error(0);
        let err = print_raw(&spooler, request("Zebra", b"abcdef")).unwrap_err();
        assert_eq!(err.step(), Step::WritePrinter);
        assert!(matches!(
            err,
            SpoolError::ShortWrite {
                requested: 6,
                written: 2,
                ..
            }
        ));
        let calls = spooler.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            ["EndPagePrinter", "EndDocPrinter", "ClosePrinter"]
        );
    }

    #[test]
    fn write_failure_closes_page_and_document() {
        let spooler = FakeSpooler::new()
            .with_printer("Zebra")
            .failing("WritePrinter", 63);
        let err = print_raw(&spooler, request("Zebra", b"data")).unwrap_err();
        assert_eq!(err.step(), Step::WritePrinter);
        assert_eq!(err.code(), 63);
        let calls = spooler.calls();
        assert!(calls.contains(&"EndPagePrinter".to_string()));
        assert!(calls.contains(&"EndDocPrinter".to_string()));
    }

    #[test]
    fn page_failure_closes_only_the_document() {
        let spooler = FakeSpooler::new()
            .with_printer("Zebra")
            .failing("StartPagePrinter", 1804);
        let err = print_raw(&spooler, request("Zebra", b"data")).unwrap_err();
        assert_eq!(err.step(), Step::StartPagePrinter);
        let calls = spooler.calls();
        assert!(!calls.contains(&"EndPagePrinter".to_string()));
        assert!(calls.contains(&"EndDocPrinter".to_string()));
        assert!(!calls.contains(&"WritePrinter".to_string()));
    }

    #[test]
    fn doc_failure_opens_no_stage() {
        let spooler = FakeSpooler::new()
            .with_printer("Zebra")
            .failing("StartDocPrinterW", 1804);
        let err = print_raw(&spooler, request("Zebra", b"data")).unwrap_err();
        assert_eq!(err.step(), Step::StartDocPrinter);
        let calls = spooler.calls();
        assert!(!calls.contains(&"EndDocPrinter".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("ClosePrinter"));
    }
}
