//! Big-endian bit reader over error-corrected QR codewords

use crate::error::{Result, ScanError};

/// Width of the QR mode indicator that precedes every data segment
pub const MODE_INDICATOR_BITS: usize = 4;

/// Stateful MSB-first reader over an owned codeword buffer.
///
/// The cursor starts just past the 4-bit mode indicator, which is where the
/// character-count field of a byte-mode segment begins.
#[derive(Debug, Clone)]
pub struct BitCursor {
    bytes: Vec<u8>,
    offset: usize,
}

impl BitCursor {
    /// Create a cursor positioned after the mode indicator
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self::with_offset(bytes, MODE_INDICATOR_BITS)
    }

    /// Create a cursor at an arbitrary starting bit
    pub fn with_offset(bytes: impl Into<Vec<u8>>, offset: usize) -> Self {
        Self {
            bytes: bytes.into(),
            offset,
        }
    }

    /// Current bit offset from the start of the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total number of bits in the buffer
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Bits left to read
    pub fn remaining(&self) -> usize {
        self.bit_len().saturating_sub(self.offset)
    }

    /// Read `bits` bits MSB-first and advance.
    ///
    /// Reads wider than 32 bits keep only the last 32 bits read. The offset
    /// is left untouched when the stream is too short.
    pub fn next(&mut self, bits: usize) -> Result<u32> {
        let end = self.offset.checked_add(bits);
        if end.is_none_or(|end| end > self.bit_len()) {
            return Err(ScanError::InsufficientBits {
                requested: bits,
                offset: self.offset,
                available: self.bit_len(),
            });
        }

        let mut val = 0u32;
        for pos in self.offset..self.offset + bits {
            val = (val << 1) | self.bit(pos) as u32;
        }
        self.offset += bits;
        Ok(val)
    }

    fn bit(&self, position: usize) -> u8 {
        let byte = self.bytes[position / 8];
        (byte >> (7 - position % 8)) & 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_after_mode_indicator() {
        let mut cursor = BitCursor::new(vec![0b0100_0011]);
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.next(4).unwrap(), 0b0011);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_crosses_byte_boundary() {
        // 0100 | 0000_0011 | 0100_0001 ...
        let mut cursor = BitCursor::new(vec![0x40, 0x34, 0x10]);
        assert_eq!(cursor.next(8).unwrap(), 3);
        assert_eq!(cursor.next(8).unwrap(), 0x41);
        assert_eq!(cursor.offset(), 20);
    }

    #[test]
    fn test_underflow_is_error_not_panic() {
        let mut cursor = BitCursor::new(vec![0xFF]);
        let err = cursor.next(8).unwrap_err();
        assert_eq!(
            err,
            ScanError::InsufficientBits {
                requested: 8,
                offset: 4,
                available: 8
            }
        );
        // failed read must not move the cursor
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.next(4).unwrap(), 0xF);
    }

    #[test]
    fn test_empty_buffer() {
        let mut cursor = BitCursor::with_offset(Vec::new(), 0);
        assert_eq!(cursor.next(0).unwrap(), 0);
        assert!(cursor.next(1).is_err());
    }

    #[test]
    fn test_split_reads_compose() {
        let bytes = vec![0xA5, 0x3C, 0xF0, 0x0F];
        let mut whole = BitCursor::with_offset(bytes.clone(), 3);
        let joined = whole.next(19).unwrap();

        let mut parts = BitCursor::with_offset(bytes, 3);
        let hi = parts.next(7).unwrap();
        let lo = parts.next(12).unwrap();
        assert_eq!((hi << 12) | lo, joined);
        assert_eq!(whole.offset(), parts.offset());
    }
}
