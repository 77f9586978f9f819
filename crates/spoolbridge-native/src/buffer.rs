// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Buffer for the fetch half of a probe-then-fetch call.

/// Zeroed buffer of exactly the probed byte length, aligned to 8 bytes.
///
/// Spooler record buffers start with an array of structs holding pointers,
/// so the storage must be pointer-aligned before it is reinterpreted.
/// Backing it with `u64` gives that alignment; `len` is what the spooler
/// is told the buffer holds.
pub struct ProbeBuffer {
    storage: Vec<u64>,
    len: usize,
}

impl ProbeBuffer {
    pub fn new(len: u32) -> Self {
        let len = len as usize;
        Self {
            storage: vec![0u64; len.div_ceil(8)],
            len,
        }
    }

    /// Byte length passed to the spooler as the buffer size.
    pub fn len(&self) -> u32 {
        self.len as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.storage.as_mut_ptr().cast()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.storage.as_ptr().cast()
    }

    /// View the head of the buffer as `count` records of type `T`.
    ///
    /// `count` is clamped to the number of whole records the buffer holds.
    ///
    /// # Safety
    ///
    /// The spooler must have written at least `count` valid `T` values at
    /// the start of the buffer, and `T` must need no more than 8-byte
    /// alignment.
    pub unsafe fn records<T>(&self, count: u32) -> &[T] {
        debug_assert!(std::mem::align_of::<T>() <= std::mem::align_of::<u64>());
        let fits = self.len / std::mem::size_of::<T>().max(1);
        let count = (count as usize).min(fits);
        if count == 0 {
            return &[];
        }
        // SAFETY: alignment is guaranteed by the u64 backing; length and
        // initialization by the caller.
        unsafe { std::slice::from_raw_parts(self.as_ptr().cast::<T>(), count) }
    }

    /// The single record at the head of the buffer, or `None` if the
    /// buffer is too small to hold one.
    ///
    /// # Safety
    ///
    /// Same contract as [`ProbeBuffer::records`] with a count of one.
    pub unsafe fn first<T>(&self) -> Option<&T> {
        // SAFETY: forwarded to the caller.
        unsafe { self.records::<T>(1) }.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_exact_requested_length() {
        let buf = ProbeBuffer::new(13);
        assert_eq!(buf.len(), 13);
        assert!(!buf.is_empty());
        assert!(buf.storage.len() * 8 >= 13);
    }

    #[test]
    fn storage_is_pointer_aligned() {
        let buf = ProbeBuffer::new(64);
        assert_eq!(buf.as_ptr() as usize % std::mem::align_of::<usize>(), 0);
    }

    #[test]
    fn zero_records_view_is_empty() {
        let buf = ProbeBuffer::new(0);
        assert!(buf.is_empty());
        let view: &[u64] = unsafe { buf.records(0) };
        assert!(view.is_empty());
    }

    #[test]
    fn records_view_is_clamped_to_buffer_length() {
        let buf = ProbeBuffer::new(12);
        let view: &[u32] = unsafe { buf.records(10) };
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn first_record_needs_a_whole_record() {
        let short = ProbeBuffer::new(4);
        assert!(unsafe { short.first::<u64>() }.is_none());

        let empty = ProbeBuffer::new(0);
        assert!(unsafe { empty.first::<u32>() }.is_none());

        let mut buf = ProbeBuffer::new(8);
        unsafe { buf.as_mut_ptr().cast::<u64>().write(42) };
        assert_eq!(unsafe { buf.first::<u64>() }, Some(&42));
    }

    #[test]
    fn records_view_reads_written_values() {
        let mut buf = ProbeBuffer::new(16);
        unsafe {
            let ptr = buf.as_mut_ptr().cast::<u32>();
            ptr.write(7);
            ptr.add(1).write(9);
        }
        let view: &[u32] = unsafe { buf.records(2) };
        assert_eq!(view, &[7, 9]);
    }
}
