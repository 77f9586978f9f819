// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job-control vocabulary: the keywords a caller may pass to `SetJobJson`
// and the `JOB_CONTROL_*` codes they stand for.

use std::fmt;
use std::str::FromStr;

use crate::error::SpoolError;

/// A control instruction applicable to a queued or in-flight print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCommand {
    Cancel,
    Delete,
    LastPageEjected,
    Pause,
    Restart,
    Resume,
    SentToPrinter,
}

impl JobCommand {
    /// Every supported command, in keyword order.
    pub const ALL: [JobCommand; 7] = [
        Self::Cancel,
        Self::Delete,
        Self::LastPageEjected,
        Self::Pause,
        Self::Restart,
        Self::Resume,
        Self::SentToPrinter,
    ];

    /// Case-sensitive wire keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Cancel => "CANCEL",
            Self::Delete => "DELETE",
            Self::LastPageEjected => "LAST-PAGE-EJECTED",
            Self::Pause => "PAUSE",
            Self::Restart => "RESTART",
            Self::Resume => "RESUME",
            Self::SentToPrinter => "SENT-TO-PRINTER",
        }
    }

    /// `JOB_CONTROL_*` value passed to `SetJobW`.
    pub fn native_code(&self) -> u32 {
        match self {
            Self::Pause => 1,
            Self::Resume => 2,
            Self::Cancel => 3,
            Self::Restart => 4,
            Self::Delete => 5,
            Self::SentToPrinter => 6,
            Self::LastPageEjected => 7,
        }
    }

    /// Look a keyword up in the vocabulary.
    pub fn lookup(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.keyword() == keyword)
    }

    /// All keywords, in the order `ALL` lists them.
    pub fn keywords() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(JobCommand::keyword)
    }
}

impl FromStr for JobCommand {
    type Err = SpoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| SpoolError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
