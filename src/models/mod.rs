/// Detections handed over by the barcode reader
pub mod detection;
/// Decoded payloads, fingerprints and content kinds
pub mod payload;

pub use detection::{Detection, RawDetection};
pub use payload::{ContentType, Fingerprint, ScanPayload};
