/// Logical content of one QR code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanPayload {
    /// Platform (or assembly) produced a string
    Text(String),
    /// Raw bytes from a byte-mode segment
    Binary(Vec<u8>),
}

impl ScanPayload {
    /// Content as bytes, regardless of representation
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ScanPayload::Text(text) => text.as_bytes(),
            ScanPayload::Binary(bytes) => bytes,
        }
    }

    /// Content as text, if it is a string payload
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScanPayload::Text(text) => Some(text),
            ScanPayload::Binary(_) => None,
        }
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload carries no content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Equality key used by scan gating
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(self.clone())
    }

    /// Short description for log lines (never the full content)
    pub(crate) fn summary(&self) -> String {
        match self {
            ScanPayload::Text(text) => format!("text({} bytes)", text.len()),
            ScanPayload::Binary(bytes) => format!("binary({} bytes)", bytes.len()),
        }
    }
}

impl From<String> for ScanPayload {
    fn from(text: String) -> Self {
        ScanPayload::Text(text)
    }
}

impl From<&str> for ScanPayload {
    fn from(text: &str) -> Self {
        ScanPayload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ScanPayload {
    fn from(bytes: Vec<u8>) -> Self {
        ScanPayload::Binary(bytes)
    }
}

/// Exact-content equality key for a payload.
///
/// Text and binary payloads never compare equal, even when their bytes match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(ScanPayload);

impl Fingerprint {
    /// Payload this fingerprint was taken from
    pub fn payload(&self) -> &ScanPayload {
        &self.0
    }
}

impl From<ScanPayload> for Fingerprint {
    fn from(payload: ScanPayload) -> Self {
        Fingerprint(payload)
    }
}

/// Declared kind of an assembled multi-part message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Partially signed bitcoin transaction
    Psbt,
    /// Signed bitcoin transaction
    Transaction,
    /// JSON document
    Json,
    /// CBOR document
    Cbor,
    /// UTF-8 text
    UnicodeText,
}

impl ContentType {
    /// Whether the content is expected to be UTF-8 text
    pub fn is_textual(&self) -> bool {
        matches!(self, ContentType::Json | ContentType::UnicodeText)
    }
}
