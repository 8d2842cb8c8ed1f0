//! Per-session scan policy: decides which decoded payloads go downstream
//!
//! The gate never looks at payload semantics. It only applies the scan
//! mode, the Continuous rate limit, and exact-content dedup.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::debug;

use crate::config::{ScanConfig, ScanMode};
use crate::events::IgnoreReason;
use crate::models::{Fingerprint, ScanPayload};

/// Per-session gating state
#[derive(Debug, Clone)]
pub struct ScanGate {
    mode: ScanMode,
    scan_interval: Duration,
    capture_window: Duration,
    seen: HashSet<Fingerprint>,
    last_accepted_at: Option<Instant>,
    capture_opened_at: Option<Instant>,
    finished: bool,
    paused: bool,
}

impl ScanGate {
    /// Gate for a fresh session
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            mode: config.mode.clone(),
            scan_interval: config.scan_interval,
            capture_window: config.capture_window,
            seen: HashSet::new(),
            last_accepted_at: None,
            capture_opened_at: None,
            finished: false,
            paused: false,
        }
    }

    /// Configured scan mode
    pub fn mode(&self) -> &ScanMode {
        &self.mode
    }

    /// Whether Once/Manual already delivered a payload
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether scanning is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time of the last emitted payload
    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    /// Stop emitting until [`ScanGate::resume`]
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`ScanGate::pause`]
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Forget everything seen so far (dedup set, finished flag, timing)
    pub fn reset(&mut self) {
        self.seen.clear();
        self.finished = false;
        self.last_accepted_at = None;
        self.capture_opened_at = None;
    }

    /// Open a Manual capture window at `now`.
    ///
    /// Resets the gate so the new trigger can deliver again. Returns false
    /// (and does nothing) outside Manual mode.
    pub fn trigger_capture(&mut self, now: Instant) -> bool {
        if !self.mode.is_manual() {
            return false;
        }
        self.reset();
        self.capture_opened_at = Some(now);
        true
    }

    /// Checks that depend only on session state and time.
    ///
    /// Used before decoding so frames that can never be emitted skip the
    /// decode step. Does not mutate the gate.
    pub fn precheck(&self, at: Instant) -> Option<IgnoreReason> {
        if self.paused {
            return Some(IgnoreReason::Paused);
        }

        match &self.mode {
            ScanMode::Once if self.finished => Some(IgnoreReason::SessionFinished),
            ScanMode::Manual if self.finished => Some(IgnoreReason::SessionFinished),
            ScanMode::Manual if !self.within_capture_window(at) => {
                Some(IgnoreReason::OutsideCaptureWindow)
            }
            ScanMode::Continuous | ScanMode::ContinuousExcept(_) if !self.past_interval(at) => {
                Some(IgnoreReason::RateLimited)
            }
            _ => None,
        }
    }

    /// Decide whether `payload`, seen at `at`, is emitted, and record it
    /// if so.
    pub fn check(&mut self, payload: &ScanPayload, at: Instant) -> Result<(), IgnoreReason> {
        if let Some(reason) = self.precheck(at) {
            return Err(reason);
        }

        match &self.mode {
            ScanMode::Once | ScanMode::Manual => {
                self.finished = true;
            }
            ScanMode::OncePerCode => {
                if !self.seen.insert(payload.fingerprint()) {
                    return Err(IgnoreReason::AlreadySeen);
                }
            }
            ScanMode::Continuous => {}
            ScanMode::ContinuousExcept(ignored) => {
                if ignored.contains(&payload.fingerprint()) {
                    return Err(IgnoreReason::Excluded);
                }
            }
        }

        debug!("gate: accepted {} in {} mode", payload.summary(), self.mode_name());
        self.last_accepted_at = Some(at);
        Ok(())
    }

    fn within_capture_window(&self, at: Instant) -> bool {
        self.capture_opened_at
            .and_then(|opened| at.checked_duration_since(opened))
            .is_some_and(|elapsed| elapsed <= self.capture_window)
    }

    fn past_interval(&self, at: Instant) -> bool {
        self.last_accepted_at
            .is_none_or(|last| at.saturating_duration_since(last) >= self.scan_interval)
    }

    fn mode_name(&self) -> &'static str {
        match self.mode {
            ScanMode::Once => "once",
            ScanMode::Manual => "manual",
            ScanMode::OncePerCode => "once-per-code",
            ScanMode::Continuous => "continuous",
            ScanMode::ContinuousExcept(_) => "continuous-except",
        }
    }
}
