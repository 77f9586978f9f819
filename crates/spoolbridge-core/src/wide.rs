// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversions between the spooler's UTF-16 text and UTF-8.
//
// Stateless. Unpaired surrogates are replaced with U+FFFD rather than
// rejected, so a malformed printer name never turns into a failed call.

/// Decode UTF-16 text up to (not including) the first NUL.
pub fn from_wide(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Encode text as NUL-terminated UTF-16 for passing to the spooler.
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Copy a NUL-terminated UTF-16 string out of foreign memory, without the
/// terminator. Returns `None` for a null pointer.
///
/// # Safety
///
/// `ptr` must be null or point to a readable, NUL-terminated sequence of
/// `u16` that stays valid for the duration of the call.
pub unsafe fn wide_units_from_ptr(ptr: *const u16) -> Option<Vec<u16>> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0usize;
    // SAFETY: the caller guarantees a NUL terminator is reachable.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        Some(std::slice::from_raw_parts(ptr, len).to_vec())
    }
}

/// Decode a NUL-terminated UTF-16 string from foreign memory.
///
/// # Safety
///
/// Same contract as [`wide_units_from_ptr`].
pub unsafe fn from_wide_ptr(ptr: *const u16) -> Option<String> {
    // SAFETY: forwarded to the caller.
    unsafe { wide_units_from_ptr(ptr) }.map(|units| from_wide(&units))
}
