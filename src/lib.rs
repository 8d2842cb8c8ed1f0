//! qr_ingest - QR payload ingestion for hardware-wallet imports
//!
//! Takes what a platform barcode reader hands over (error-corrected codewords
//! plus a symbol version, or an already decoded string) and turns it into
//! complete logical messages:
//! - byte-mode payload extraction from the codeword stream
//! - per-session scan gating (Once, Manual, OncePerCode, Continuous)
//! - multi-part (BBQr) reassembly with progress reporting
//!
//! ```
//! use std::time::Instant;
//! use qr_ingest::{Detection, ScanConfig, ScanMode, ScanSession, SessionEvent};
//!
//! let mut session = ScanSession::new(ScanConfig::new(ScanMode::OncePerCode));
//! let now = Instant::now();
//! assert!(session.push(Detection::text("B$HP0200DEAD", now)).is_progress());
//! match session.push(Detection::text("B$HP0201BEEF", now)) {
//!     SessionEvent::Complete(done) => assert_eq!(done.payload.as_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Session configuration and environment overrides
pub mod config;
/// Byte-mode decoding (bit cursor, version classes, extraction)
pub mod decoder;
/// Error types
pub mod error;
/// Session output events
pub mod events;
/// Core data structures (Detection, ScanPayload, Fingerprint, etc.)
pub mod models;
/// Multi-part reassembly and fragment schemes
pub mod multipart;
/// Scan gating and session orchestration
pub mod scanner;

pub use config::{ScanConfig, ScanMode};
pub use error::{ErrorKind, Result, ScanError};
pub use events::{Completion, IgnoreReason, Progress, SessionEvent};
pub use models::{ContentType, Detection, Fingerprint, RawDetection, ScanPayload};
pub use multipart::{MultiPartPhase, MultiPartSession};
pub use scanner::{ScanGate, ScanSession, decode_batch};

/// Extract the byte-mode payload from error-corrected data codewords
///
/// # Arguments
/// * `codewords` - Data codewords, mode indicator first
/// * `symbol_version` - Declared symbol version (1-40)
///
/// # Returns
/// The segment bytes, or the reason they could not be read
pub fn decode(codewords: &[u8], symbol_version: i32) -> Result<Vec<u8>> {
    decoder::PayloadExtractor::decode(codewords, symbol_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entry_point() {
        // byte mode, count 1, "A"
        assert_eq!(decode(&[0x40, 0x14, 0x10], 1).unwrap(), b"A");
        assert!(decode(&[0x40, 0x14, 0x10], 41).is_err());
    }
}
