//! Pluggable multi-part container formats
//!
//! A scheme recognises fragment-shaped payloads and knows how to turn the
//! complete, index-ordered set of fragment bodies back into the message.

use std::fmt;

use crate::error::Result;
use crate::models::{ContentType, ScanPayload};

/// Identity of one multi-part sequence, opaque outside its scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    /// Wrap a scheme-specific identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed header of one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentHeader {
    /// Which sequence the fragment belongs to
    pub sequence: SequenceId,
    /// Declared number of parts
    pub total: usize,
    /// Zero-based index of this part
    pub index: usize,
    /// Declared content kind
    pub content_type: Option<ContentType>,
}

/// One fragment: header plus the part of the message it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Parsed header
    pub header: FragmentHeader,
    /// Bytes the scheme keeps for assembly, still in the container's
    /// encoding
    pub body: Vec<u8>,
}

/// Final message produced by a scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    /// Decoded message
    pub payload: ScanPayload,
    /// Declared content kind
    pub content_type: Option<ContentType>,
}

/// A multi-part container format
pub trait FragmentScheme: Send {
    /// Short scheme name for logs
    fn name(&self) -> &'static str;

    /// Parse `payload` as a fragment. `None` means the payload is not
    /// fragment-shaped and should be treated as single-shot content.
    ///
    /// Header fields are not range checked here; the session validates
    /// `index < total` and consistency across fragments.
    fn parse(&self, payload: &ScanPayload) -> Option<Fragment>;

    /// Rebuild the message from every fragment body, ordered by index
    /// `0..total`. `max_len` caps the decoded size.
    fn assemble(
        &self,
        header: &FragmentHeader,
        parts: Vec<Vec<u8>>,
        max_len: usize,
    ) -> Result<Assembled>;
}
