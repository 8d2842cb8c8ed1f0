//! Scan session configuration
//!
//! Defaults can be overridden through environment variables, read once per
//! process:
//! - `QR_SCAN_INTERVAL_MS`: minimum gap between Continuous emissions (100)
//! - `QR_MANUAL_CAPTURE_WINDOW_MS`: Manual capture window, at most 500 (500)
//! - `QR_MAX_ASSEMBLED_BYTES`: cap on a reassembled message (4 MiB)

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use crate::models::Fingerprint;

/// Upper bound of the Manual capture window
pub const MAX_MANUAL_CAPTURE_WINDOW: Duration = Duration::from_millis(500);

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static SCAN_INTERVAL_MS: OnceLock<u64> = OnceLock::new();

pub(crate) fn scan_interval() -> Duration {
    Duration::from_millis(*SCAN_INTERVAL_MS.get_or_init(|| parse_env_u64("QR_SCAN_INTERVAL_MS", 100)))
}

static MANUAL_CAPTURE_WINDOW_MS: OnceLock<u64> = OnceLock::new();

pub(crate) fn manual_capture_window() -> Duration {
    let ms = *MANUAL_CAPTURE_WINDOW_MS
        .get_or_init(|| parse_env_u64("QR_MANUAL_CAPTURE_WINDOW_MS", 500).clamp(1, 500));
    Duration::from_millis(ms)
}

static MAX_ASSEMBLED_BYTES: OnceLock<usize> = OnceLock::new();

pub(crate) fn max_assembled_bytes() -> usize {
    *MAX_ASSEMBLED_BYTES
        .get_or_init(|| parse_env_usize("QR_MAX_ASSEMBLED_BYTES", 4 * 1024 * 1024).max(1024))
}

/// Gating policy for one scan session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMode {
    /// First payload only, then the session is finished
    Once,
    /// First payload inside the capture window opened by a user trigger
    Manual,
    /// Each distinct payload once
    OncePerCode,
    /// Anything, rate limited by the scan interval
    Continuous,
    /// Continuous, minus the given payloads
    ContinuousExcept(HashSet<Fingerprint>),
}

impl ScanMode {
    /// Whether the mode waits for explicit capture triggers
    pub fn is_manual(&self) -> bool {
        matches!(self, ScanMode::Manual)
    }
}

/// Settings for a [`crate::ScanSession`]
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Gating policy
    pub mode: ScanMode,
    /// Minimum gap between emissions in Continuous modes
    pub scan_interval: Duration,
    /// Manual mode capture window (clamped to 500ms)
    pub capture_window: Duration,
    /// Largest reassembled multi-part message accepted
    pub max_assembled_bytes: usize,
}

impl ScanConfig {
    /// Defaults (environment overrides applied) with the given mode
    pub fn new(mode: ScanMode) -> Self {
        Self {
            mode,
            scan_interval: scan_interval(),
            capture_window: manual_capture_window(),
            max_assembled_bytes: max_assembled_bytes(),
        }
    }

    /// Set the Continuous rate limit
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Set the Manual capture window; values above 500ms are clamped
    pub fn with_capture_window(mut self, window: Duration) -> Self {
        self.capture_window = window.min(MAX_MANUAL_CAPTURE_WINDOW);
        self
    }

    /// Set the reassembled message cap
    pub fn with_max_assembled_bytes(mut self, max: usize) -> Self {
        self.max_assembled_bytes = max;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(ScanMode::Once)
    }
}
