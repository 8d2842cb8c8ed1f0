// ============== Parallel Decoding with Rayon ==============

use rayon::prelude::*;

use crate::error::Result;
use crate::models::{Detection, ScanPayload};

/// Decode a burst of detections in parallel.
///
/// Results keep the input order. Decoding is pure, so this gives the same
/// payloads as calling [`Detection::decode`] one by one.
pub fn decode_batch(detections: &[Detection]) -> Vec<Result<ScanPayload>> {
    detections.par_iter().map(Detection::decode).collect()
}
