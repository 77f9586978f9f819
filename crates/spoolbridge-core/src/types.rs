// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Spoolbridge spooler layer.
//
// Every value here is a point-in-time snapshot built for one call and
// consumed by serialization; nothing is cached between calls.

use serde::Serialize;

/// Snapshot of one printer (from `PRINTER_INFO_2`).
///
/// Field declaration order is the wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub server_name: String,
    pub share_name: String,
    pub port_name: String,
    pub driver_name: String,
    pub comment: String,
    pub location: String,
    /// `PRINTER_STATUS_*` bitmask.
    pub status: u32,
    /// `PRINTER_ATTRIBUTE_*` bitmask.
    pub attributes: u32,
    /// Number of queued jobs.
    pub jobs: u32,
}

/// Snapshot of one print job (from `JOB_INFO_2`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub id: u32,
    pub document: String,
    pub user_name: String,
    /// `JOB_STATUS_*` bitmask.
    pub status: u32,
    /// Job size in bytes.
    pub size: u32,
    pub pages_printed: u32,
}

/// Result of the first ("probe") half of a probe-then-fetch call.
///
/// `required` is the buffer size the spooler asked for (bytes for record
/// buffers, UTF-16 units for name buffers). `count` is the number of items
/// reported alongside it, when the call reports one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capacity {
    pub required: u32,
    pub count: u32,
}

impl Capacity {
    pub fn new(required: u32, count: u32) -> Self {
        Self { required, count }
    }

    /// A zero-capacity probe is a defined empty result, not an error.
    pub fn is_empty(&self) -> bool {
        self.required == 0
    }
}
