// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Library configuration.
//
// Loaded once per process. A JSON file named by `SPOOLBRIDGE_CONFIG` may
// override any subset of the defaults; `SPOOLBRIDGE_LOG` overrides the log
// filter on top of that.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpoolError};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "SPOOLBRIDGE_CONFIG";

/// Environment variable carrying a `tracing` filter directive.
pub const LOG_ENV: &str = "SPOOLBRIDGE_LOG";

/// Process-wide settings, read-only after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// `tracing` filter directive (e.g. "warn", "spoolbridge_print=debug").
    pub log_filter: String,
    /// Include connected network printers when listing printers.
    pub enumerate_connections: bool,
    /// Data type used by raw printing when the caller passes none.
    pub default_datatype: String,
    /// Document name used by raw printing when the caller passes none.
    pub default_document_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".into(),
            enumerate_connections: true,
            default_datatype: "RAW".into(),
            default_document_name: "Spoolbridge Document".into(),
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SpoolError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| SpoolError::Config(format!("{}: {e}", path.display())))
    }

    /// Defaults, then `SPOOLBRIDGE_CONFIG`, then `SPOOLBRIDGE_LOG`.
    ///
    /// A config file that cannot be read or parsed is reported and ignored.
    pub fn load() -> Self {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unreadable config file");
                Self::default()
            }),
            None => Self::default(),
        };
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        config
    }
}
