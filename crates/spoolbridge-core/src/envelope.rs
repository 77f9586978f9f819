// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The response envelope returned by every exported call.
//
// Wire shape (field order is fixed):
//
//   {"status":0|1,"err_msg":"..","err_step":"..","err_code":N,"response":..}
//
// `status == 0` iff the operation succeeded, in which case `err_msg` and
// `err_step` are empty and `err_code` is 0. `response` is always present:
// the payload on success, the operation's natural empty value on failure.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Result, SpoolError};

/// Emitted if the envelope itself cannot be serialized.
pub const FALLBACK_ENVELOPE: &str = r#"{"status":1,"err_msg":"failed to serialize response","err_step":"TryCatch","err_code":0,"response":null}"#;

/// The value `response` takes when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResponse {
    /// `null`
    Null,
    /// `[]`
    Array,
    /// `{}`
    Object,
}

impl Serialize for EmptyResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Array => serializer.serialize_seq(Some(0))?.end(),
            Self::Object => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Response<T> {
    Payload(T),
    Empty(EmptyResponse),
}

/// Uniform status/error/payload wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    status: u8,
    err_msg: String,
    err_step: &'static str,
    err_code: u32,
    response: Response<T>,
}

/// Remove every CR and LF; the envelope never carries raw line breaks.
pub fn sanitize_message(message: &str) -> String {
    message.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

impl<T: Serialize> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: 0,
            err_msg: String::new(),
            err_step: "",
            err_code: 0,
            response: Response::Payload(payload),
        }
    }

    /// Failure envelope for `err`. `message` is sanitized here.
    pub fn failure(err: &SpoolError, message: &str, empty: EmptyResponse) -> Self {
        Self {
            status: 1,
            err_msg: sanitize_message(message),
            err_step: err.step().as_str(),
            err_code: err.code(),
            response: Response::Empty(empty),
        }
    }

    /// Wrap an operation result. `os_message` resolves native error codes
    /// to text; errors that did not come from the OS use their own text.
    pub fn from_result<F>(result: Result<T>, empty: EmptyResponse, os_message: F) -> Self
    where
        F: FnOnce(u32) -> String,
    {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => {
                let message = if err.is_os_error() {
                    os_message(err.code())
                } else {
                    err.to_string()
                };
                Self::failure(&err, &message, empty)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Serialize to the wire format. Never fails; a serialization error
    /// yields [`FALLBACK_ENVELOPE`].
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "envelope serialization failed");
                FALLBACK_ENVELOPE.to_string()
            }
        }
    }
}
