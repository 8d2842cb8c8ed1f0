//! Events produced by a scan session, one per processed detection

use crate::error::ScanError;
use crate::models::{ContentType, ScanPayload};

/// Outcome of pushing one detection into a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A multi-part message advanced
    Progress(Progress),
    /// A logical message is ready for import
    Complete(Completion),
    /// The detection was rejected; see [`ScanError::is_session_fatal`]
    Error(ScanError),
    /// The detection was dropped by policy
    Ignored(IgnoreReason),
}

impl SessionEvent {
    /// Whether this is a completion
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionEvent::Complete(_))
    }

    /// Whether this is a progress update
    pub fn is_progress(&self) -> bool {
        matches!(self, SessionEvent::Progress(_))
    }
}

/// Why a detection produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The session was cancelled
    Cancelled,
    /// Scanning is paused
    Paused,
    /// Once/Manual already delivered its payload
    SessionFinished,
    /// Manual mode without an open capture window
    OutsideCaptureWindow,
    /// OncePerCode already delivered this payload
    AlreadySeen,
    /// Continuous mode inside the scan interval
    RateLimited,
    /// Payload is in the ContinuousExcept ignore set
    Excluded,
    /// Fragment index was already collected
    DuplicateFragment,
    /// The multi-part message already completed; reset to scan another
    MultiPartComplete,
    /// The multi-part message was aborted; reset to retry
    MultiPartAborted,
}

/// Multi-part collection status for the scan overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Declared number of parts
    pub total: usize,
    /// Distinct parts collected
    pub parts_scanned: usize,
    /// Parts still missing
    pub parts_remaining: usize,
}

impl Progress {
    /// Headline text, e.g. "Scanned 3 of 10"
    pub fn display_text(&self) -> String {
        format!("Scanned {} of {}", self.parts_scanned, self.total)
    }

    /// Detail text, e.g. "7 parts left"
    pub fn detail_text(&self) -> String {
        match self.parts_remaining {
            1 => "1 part left".to_string(),
            n => format!("{} parts left", n),
        }
    }
}

/// A finished logical message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Message content
    pub payload: ScanPayload,
    /// Declared content kind, when the container carries one
    pub content_type: Option<ContentType>,
    /// Number of QR codes the message spanned
    pub parts: usize,
}

impl Completion {
    /// Completion for content that fit in one QR code
    pub fn single(payload: ScanPayload) -> Self {
        Self {
            payload,
            content_type: None,
            parts: 1,
        }
    }
}
