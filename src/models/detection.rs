use std::time::Instant;

use crate::decoder::payload::PayloadExtractor;
use crate::error::Result;

use super::ScanPayload;

/// Error-corrected codewords of one located QR code, as handed over by the
/// platform barcode reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDetection {
    /// Error-corrected data codewords
    pub bytes: Vec<u8>,
    /// Declared symbol version (1-40 for valid symbols)
    pub symbol_version: i32,
    /// Frame timestamp
    pub at: Instant,
}

impl RawDetection {
    /// Create a raw detection
    pub fn new(bytes: Vec<u8>, symbol_version: i32, at: Instant) -> Self {
        Self {
            bytes,
            symbol_version,
            at,
        }
    }
}

/// One detection delivered to a scan session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Codewords still to be decoded
    Raw(RawDetection),
    /// The platform already decoded the symbol to a string
    Text {
        /// Decoded string
        text: String,
        /// Frame timestamp
        at: Instant,
    },
}

impl Detection {
    /// Detection carrying raw codewords
    pub fn raw(bytes: Vec<u8>, symbol_version: i32, at: Instant) -> Self {
        Detection::Raw(RawDetection::new(bytes, symbol_version, at))
    }

    /// Detection carrying a ready-made string
    pub fn text(text: impl Into<String>, at: Instant) -> Self {
        Detection::Text {
            text: text.into(),
            at,
        }
    }

    /// Frame timestamp
    pub fn at(&self) -> Instant {
        match self {
            Detection::Raw(raw) => raw.at,
            Detection::Text { at, .. } => *at,
        }
    }

    /// Turn the detection into a payload, running the byte-mode extractor
    /// for raw codewords
    pub fn decode(&self) -> Result<ScanPayload> {
        match self {
            Detection::Raw(raw) => {
                PayloadExtractor::decode(&raw.bytes, raw.symbol_version).map(ScanPayload::Binary)
            }
            Detection::Text { text, .. } => Ok(ScanPayload::Text(text.clone())),
        }
    }
}
