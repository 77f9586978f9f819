// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagnostics for the loaded library. Output goes to stderr only; the JSON
// envelopes are the sole channel back to the caller.

use std::sync::Once;

use spoolbridge_core::BridgeConfig;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the stderr subscriber once per process.
///
/// If the host application already installed a global subscriber, ours is
/// skipped and events flow to theirs.
pub fn init(config: &BridgeConfig) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(filter = %config.log_filter, "spoolbridge logging initialised");
        }
    });
}
