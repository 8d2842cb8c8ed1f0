//! Byte-mode payload extraction from error-corrected codewords

use crate::decoder::bitstream::{BitCursor, MODE_INDICATOR_BITS};
use crate::decoder::version::SymbolClassifier;
use crate::error::{Result, ScanError};

/// Mode indicator for 8-bit byte segments
pub const BYTE_MODE: u32 = 0b0100;

/// Decodes the raw payload of a byte-mode QR symbol
pub struct PayloadExtractor;

impl PayloadExtractor {
    /// Decode `bytes` (error-corrected data codewords) for a symbol of
    /// `symbol_version` into the bytes carried by its byte-mode segment.
    ///
    /// Nothing is returned on failure; a truncated stream never yields a
    /// partial payload.
    pub fn decode(bytes: &[u8], symbol_version: i32) -> Result<Vec<u8>> {
        let width = SymbolClassifier::width_for(symbol_version)?;

        let mode = BitCursor::with_offset(bytes, 0).next(MODE_INDICATOR_BITS)?;
        if mode != BYTE_MODE {
            return Err(ScanError::UnrecognizedFormat(format!(
                "{} segment, only byte mode is supported",
                mode_name(mode)
            )));
        }

        let mut cursor = BitCursor::new(bytes);
        let count = cursor.next(width)? as usize;

        // Every byte needs 8 bits; reject impossible counts before allocating.
        let needed = count * 8;
        if needed > cursor.remaining() {
            return Err(ScanError::InsufficientBits {
                requested: needed,
                offset: cursor.offset(),
                available: cursor.bit_len(),
            });
        }

        let mut payload = Vec::with_capacity(count);
        for _ in 0..count {
            payload.push(cursor.next(8)? as u8);
        }

        Ok(payload)
    }
}

fn mode_name(mode: u32) -> &'static str {
    match mode {
        0b0000 => "terminator",
        0b0001 => "numeric",
        0b0010 => "alphanumeric",
        0b0011 => "structured append",
        0b0101 => "FNC1 (first position)",
        0b0111 => "ECI",
        0b1000 => "kanji",
        0b1001 => "FNC1 (second position)",
        _ => "unknown mode",
    }
}
