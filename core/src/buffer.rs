//! Growable byte buffer
//!
//! `GrowBuffer` is the scratch space behind lexemes and input lines. It keeps
//! its own capacity so growth is exactly geometric: start at
//! [`INITIAL_CAPACITY`] and double until the pending append fits. Clearing
//! keeps the allocation, which is what makes per-lexeme reuse cheap.

use tracing::debug;

use crate::error::{EmlError, Result};

/// Capacity of a freshly created buffer, in bytes.
pub const INITIAL_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
pub struct GrowBuffer {
    storage: Vec<u8>,
    length: usize,
}

impl GrowBuffer {
    /// Create an empty buffer with [`INITIAL_CAPACITY`] bytes reserved.
    pub fn new() -> Result<Self> {
        let mut storage = Vec::new();
        storage.try_reserve_exact(INITIAL_CAPACITY)?;
        storage.resize(INITIAL_CAPACITY, 0);
        Ok(GrowBuffer { storage, length: 0 })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The bytes appended so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    /// Append raw bytes, doubling the capacity as many times as needed.
    ///
    /// On failure the buffer is left exactly as it was.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let needed = self
            .length
            .checked_add(bytes.len())
            .ok_or(EmlError::CapacityOverflow {
                requested: usize::MAX,
                unit: "bytes",
            })?;
        self.grow(needed)?;
        self.storage[self.length..needed].copy_from_slice(bytes);
        self.length = needed;
        Ok(())
    }

    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.append(&[byte])
    }

    /// Append `text` followed by a terminating null byte. The terminator
    /// counts toward [`len`](Self::len).
    pub fn append_text(&mut self, text: &str) -> Result<()> {
        self.append(text.as_bytes())?;
        self.push(0)
    }

    /// Forget the contents but keep the allocation.
    pub fn clear(&mut self) {
        self.length = 0;
    }

    /// The contents up to (not including) the first null byte, decoded as
    /// UTF-8 with invalid sequences replaced.
    pub fn text(&self) -> String {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }

    fn grow(&mut self, needed: usize) -> Result<()> {
        let mut capacity = self.capacity();
        if needed <= capacity {
            return Ok(());
        }

        while capacity < needed {
            capacity = capacity
                .checked_mul(2)
                .ok_or(EmlError::CapacityOverflow {
                    requested: needed,
                    unit: "bytes",
                })?;
        }

        // Build the new storage completely before swapping it in.
        let mut storage = Vec::new();
        storage.try_reserve_exact(capacity)?;
        storage.extend_from_slice(self.as_bytes());
        storage.resize(capacity, 0);

        debug!(from = self.capacity(), to = capacity, "buffer grown");
        self.storage = storage;
        Ok(())
    }
}

impl AsRef<[u8]> for GrowBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = GrowBuffer::new().unwrap();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn test_append_within_capacity() {
        let mut buf = GrowBuffer::new().unwrap();
        buf.append(b"hello").unwrap();
        assert_eq!(buf.as_bytes(), b"hello");
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn test_growth_doubles_until_it_fits() {
        let mut buf = GrowBuffer::new().unwrap();
        buf.append(&[7u8; 129]).unwrap();
        assert_eq!(buf.capacity(), 256);

        buf.append(&[9u8; 600]).unwrap();
        assert_eq!(buf.len(), 729);
        assert_eq!(buf.capacity(), 1024);
        assert!(buf.as_bytes()[..129].iter().all(|&b| b == 7));
        assert!(buf.as_bytes()[129..].iter().all(|&b| b == 9));
    }

    #[test]
    fn test_append_text_includes_terminator() {
        let mut buf = GrowBuffer::new().unwrap();
        buf.append_text("abc").unwrap();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.as_bytes(), b"abc\0");
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf = GrowBuffer::new().unwrap();
        buf.append(&[1u8; 300]).unwrap();
        let capacity = buf.capacity();
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), capacity);

        buf.append(b"x").unwrap();
        assert_eq!(buf.as_bytes(), b"x");
    }
}
