//! QR byte-mode payload decoding
//!
//! This module turns the error-corrected data codewords handed over by a
//! barcode reader into the raw bytes of a byte-mode segment:
//! - MSB-first bit reading over the codeword stream
//! - Character count width per symbol version
//! - Byte-mode segment extraction

/// MSB-first bit cursor over data codewords
pub mod bitstream;
/// Byte-mode segment extraction
pub mod payload;
/// Symbol version classes and count field widths
pub mod version;

pub use bitstream::BitCursor;
pub use payload::PayloadExtractor;
pub use version::{SymbolClass, SymbolClassifier};
