//! Scan session: decode, gate, reassemble
//!
//! One detection in, one [`SessionEvent`] out. The pipeline for a single
//! detection is:
//!
//! 1. session cancelled or gate precheck fails -> `Ignored` (nothing decoded)
//! 2. decode codewords -> `Error` on failure, the session keeps running
//! 3. gate policy (mode, dedup, rate limit) -> `Ignored`
//! 4. multi-part reassembly -> `Progress`, `Complete`, `Error` or `Ignored`

use std::time::Instant;

use log::{debug, trace};

use super::batch::decode_batch;
use super::gate::ScanGate;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::events::{IgnoreReason, Progress, SessionEvent};
use crate::models::{Detection, ScanPayload};
use crate::multipart::bbqr::Bbqr;
use crate::multipart::scheme::FragmentScheme;
use crate::multipart::{MultiPartPhase, MultiPartSession};

/// A single scanning session, owned by one consumer
pub struct ScanSession {
    gate: ScanGate,
    multipart: MultiPartSession,
    cancelled: bool,
}

impl ScanSession {
    /// Session that recognises BBQr multi-part messages
    pub fn new(config: ScanConfig) -> Self {
        Self::with_scheme(config, Box::new(Bbqr))
    }

    /// Session with a custom fragment scheme
    pub fn with_scheme(config: ScanConfig, scheme: Box<dyn FragmentScheme>) -> Self {
        debug!(
            "session: start mode={:?} scheme={}",
            config.mode,
            scheme.name()
        );
        Self {
            gate: ScanGate::new(&config),
            multipart: MultiPartSession::new(scheme, config.max_assembled_bytes),
            cancelled: false,
        }
    }

    /// Process one detection
    pub fn push(&mut self, detection: Detection) -> SessionEvent {
        if let Some(reason) = self.precheck(detection.at()) {
            return SessionEvent::Ignored(reason);
        }
        let decoded = detection.decode();
        self.process(decoded, detection.at())
    }

    /// Process a payload decoded elsewhere, seen at `at`
    pub fn push_decoded(&mut self, payload: ScanPayload, at: Instant) -> SessionEvent {
        if let Some(reason) = self.precheck(at) {
            return SessionEvent::Ignored(reason);
        }
        self.process(Ok(payload), at)
    }

    /// Process a burst of detections. Decoding runs in parallel; gating and
    /// reassembly still see the detections in order.
    pub fn push_all(&mut self, detections: &[Detection]) -> Vec<SessionEvent> {
        let decoded = decode_batch(detections);
        detections
            .iter()
            .zip(decoded)
            .map(|(detection, result)| {
                let at = detection.at();
                match self.precheck(at) {
                    Some(reason) => SessionEvent::Ignored(reason),
                    None => self.process(result, at),
                }
            })
            .collect()
    }

    /// Open a Manual capture window at `now`. Returns false outside Manual
    /// mode or after cancellation.
    pub fn trigger_capture(&mut self, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        let opened = self.gate.trigger_capture(now);
        if opened {
            self.multipart.reset();
        }
        opened
    }

    /// Stop emitting; collected fragments are kept
    pub fn pause(&mut self) {
        self.gate.pause();
    }

    /// Resume after [`ScanSession::pause`]
    pub fn resume(&mut self) {
        self.gate.resume();
    }

    /// Start over: dedup set, finished flag and collected fragments are
    /// cleared. Pause and cancellation are left alone.
    pub fn reset(&mut self) {
        debug!("session: reset");
        self.gate.reset();
        self.multipart.reset();
    }

    /// Cancel the session. Every later detection is ignored.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            debug!("session: cancelled");
        }
        self.cancelled = true;
        self.multipart.reset();
    }

    /// Whether [`ScanSession::cancel`] was called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether the gate is paused
    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    /// Multi-part phase
    pub fn phase(&self) -> MultiPartPhase {
        self.multipart.phase()
    }

    /// Progress of the multi-part message being collected
    pub fn progress(&self) -> Option<Progress> {
        self.multipart.progress()
    }

    /// Gate state, for inspection
    pub fn gate(&self) -> &ScanGate {
        &self.gate
    }

    fn precheck(&self, at: Instant) -> Option<IgnoreReason> {
        if self.cancelled {
            return Some(IgnoreReason::Cancelled);
        }
        self.gate.precheck(at)
    }

    fn process(&mut self, decoded: Result<ScanPayload>, at: Instant) -> SessionEvent {
        let payload = match decoded {
            Ok(payload) => payload,
            Err(err) => {
                debug!("session: decode failed: {}", err);
                return SessionEvent::Error(err);
            }
        };

        if let Err(reason) = self.gate.check(&payload, at) {
            trace!("session: gated {} ({:?})", payload.summary(), reason);
            return SessionEvent::Ignored(reason);
        }

        self.multipart.accept(payload)
    }
}
