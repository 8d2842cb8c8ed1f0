//! Error taxonomy for the ingestion pipeline
//!
//! Per-detection errors (bad symbol version, truncated codewords, unsupported
//! content) reject one frame and scanning carries on. Fragment mismatches and
//! assembly failures end the active multi-part session.

use thiserror::Error;

/// Coarse error category, stable across message wording changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Symbol version outside 1..=40
    UnsupportedSymbolVersion,
    /// Codeword stream ended before the requested bits
    InsufficientBits,
    /// Fragments disagree on total, identity, or index range
    FragmentFormatMismatch,
    /// Payload is neither a supported single code nor a fragment
    UnrecognizedFormat,
    /// All fragments arrived but the declared encoding could not be undone
    AssemblyFailed,
}

/// Errors surfaced by decoding, gating, and reassembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The platform reported a version no QR symbol can have
    #[error("unsupported QR symbol version {version} (expected 1..=40)")]
    UnsupportedSymbolVersion {
        /// Version as reported by the barcode reader
        version: i32,
    },

    /// Reading past the end of the codeword stream
    #[error("codeword stream truncated: wanted {requested} bits at offset {offset}, only {available} in stream")]
    InsufficientBits {
        /// Bits the reader asked for
        requested: usize,
        /// Bit offset the read started at
        offset: usize,
        /// Total bits in the stream
        available: usize,
    },

    /// A fragment contradicts the sequence being collected
    #[error("fragment format mismatch: {0}")]
    FragmentFormatMismatch(String),

    /// Not a code this pipeline understands
    #[error("not a supported code: {0}")]
    UnrecognizedFormat(String),

    /// Joined fragments failed their final decoding step
    #[error("failed to assemble multi-part payload: {0}")]
    AssemblyFailed(String),
}

impl ScanError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::UnsupportedSymbolVersion { .. } => ErrorKind::UnsupportedSymbolVersion,
            ScanError::InsufficientBits { .. } => ErrorKind::InsufficientBits,
            ScanError::FragmentFormatMismatch(_) => ErrorKind::FragmentFormatMismatch,
            ScanError::UnrecognizedFormat(_) => ErrorKind::UnrecognizedFormat,
            ScanError::AssemblyFailed(_) => ErrorKind::AssemblyFailed,
        }
    }

    /// Whether the error ends the current multi-part session.
    ///
    /// The UI dismisses the scan screen for fatal errors and shows a
    /// retryable message for everything else.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::FragmentFormatMismatch | ErrorKind::AssemblyFailed
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScanError>;
