// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned copies of the native spooler records, and the mappers that turn
// them into `PrinterInfo` / `JobInfo`.
//
// The spooler packs its records and their strings into one caller-owned
// buffer. Implementations copy what we need out of that buffer into these
// structs before releasing it; `None` stands for a null string pointer.

use crate::types::{JobInfo, PrinterInfo};
use crate::wide::from_wide;

/// Wide text as it came out of the spooler, without terminator.
pub type WideText = Option<Vec<u16>>;

/// The subset of `PRINTER_INFO_2W` that Spoolbridge reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterRecord {
    pub printer_name: WideText,
    pub server_name: WideText,
    pub share_name: WideText,
    pub port_name: WideText,
    pub driver_name: WideText,
    pub comment: WideText,
    pub location: WideText,
    pub status: u32,
    pub attributes: u32,
    pub jobs: u32,
}

/// The subset of `JOB_INFO_2W` that Spoolbridge reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRecord {
    pub job_id: u32,
    pub document: WideText,
    pub user_name: WideText,
    pub status: u32,
    pub size: u32,
    pub pages_printed: u32,
}

fn text(field: &WideText) -> String {
    field.as_deref().map(from_wide).unwrap_or_default()
}

impl From<&PrinterRecord> for PrinterInfo {
    fn from(record: &PrinterRecord) -> Self {
        Self {
            name: text(&record.printer_name),
            server_name: text(&record.server_name),
            share_name: text(&record.share_name),
            port_name: text(&record.port_name),
            driver_name: text(&record.driver_name),
            comment: text(&record.comment),
            location: text(&record.location),
            status: record.status,
            attributes: record.attributes,
            jobs: record.jobs,
        }
    }
}

impl From<&JobRecord> for JobInfo {
    fn from(record: &JobRecord) -> Self {
        Self {
            id: record.job_id,
            document: text(&record.document),
            user_name: text(&record.user_name),
            status: record.status,
            size: record.size,
            pages_printed: record.pages_printed,
        }
    }
}
