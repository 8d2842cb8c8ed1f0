//! Multi-part message reassembly
//!
//! A [`MultiPartSession`] collects fragments of one oversized message and
//! rebuilds it once every index has been seen. Payloads that are not
//! fragment-shaped pass straight through as single-shot content.
//!
//! States: `Empty -> Collecting -> Complete | Aborted`. Both terminal states
//! hold until [`MultiPartSession::reset`].

/// BBQr header parsing and final assembly
pub mod bbqr;
/// Fragment scheme trait and header types
pub mod scheme;

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{Result, ScanError};
use crate::events::{Completion, IgnoreReason, Progress, SessionEvent};
use crate::models::ScanPayload;
use scheme::{Fragment, FragmentHeader, FragmentScheme};

/// Fragments collected so far for one sequence
#[derive(Debug, Clone)]
pub struct ReassemblyState {
    header: FragmentHeader,
    parts: BTreeMap<usize, Vec<u8>>,
    reported_remaining: usize,
}

impl ReassemblyState {
    fn new(header: FragmentHeader) -> Self {
        let reported_remaining = header.total;
        Self {
            header,
            parts: BTreeMap::new(),
            reported_remaining,
        }
    }

    /// Declared number of parts
    pub fn total(&self) -> usize {
        self.header.total
    }

    /// Distinct indices received
    pub fn parts_scanned(&self) -> usize {
        self.parts.len()
    }

    /// Indices still missing, always derived from the collected map
    pub fn parts_remaining(&self) -> usize {
        self.header.total - self.parts.len()
    }

    /// Whether `index` has been collected
    pub fn has_part(&self, index: usize) -> bool {
        self.parts.contains_key(&index)
    }

    /// Snapshot for the scan overlay
    pub fn progress(&self) -> Progress {
        Progress {
            total: self.total(),
            parts_scanned: self.parts_scanned(),
            parts_remaining: self.parts_remaining(),
        }
    }

    /// Store a body at its index; re-observing an index keeps the first copy
    fn insert(&mut self, index: usize, body: Vec<u8>) {
        self.parts.entry(index).or_insert(body);
    }

    /// Bodies ordered by index `0..total`
    fn ordered_parts(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.parts).into_values().collect()
    }

    fn check_consistent(&self, header: &FragmentHeader) -> Result<()> {
        if header.sequence != self.header.sequence {
            return Err(ScanError::FragmentFormatMismatch(format!(
                "fragment from sequence {} while collecting {}",
                header.sequence, self.header.sequence
            )));
        }
        if header.total != self.header.total {
            return Err(ScanError::FragmentFormatMismatch(format!(
                "fragment declares {} parts, sequence has {}",
                header.total, self.header.total
            )));
        }
        check_index(header)
    }
}

fn check_index(header: &FragmentHeader) -> Result<()> {
    if header.total == 0 {
        return Err(ScanError::FragmentFormatMismatch(
            "fragment declares zero parts".to_string(),
        ));
    }
    if header.index >= header.total {
        return Err(ScanError::FragmentFormatMismatch(format!(
            "fragment index {} out of range for {} parts",
            header.index, header.total
        )));
    }
    Ok(())
}

/// Coarse state of a [`MultiPartSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPartPhase {
    /// No sequence in progress
    Empty,
    /// Fragments of one sequence are being collected
    Collecting,
    /// The sequence completed
    Complete,
    /// The sequence was abandoned after a fatal error
    Aborted,
}

#[derive(Debug)]
enum State {
    Empty,
    Collecting(ReassemblyState),
    Complete,
    Aborted,
}

/// Fragment accumulator for one scan session
pub struct MultiPartSession {
    scheme: Box<dyn FragmentScheme>,
    state: State,
    max_assembled_bytes: usize,
}

impl MultiPartSession {
    /// Session using `scheme` to recognise and assemble fragments
    pub fn new(scheme: Box<dyn FragmentScheme>, max_assembled_bytes: usize) -> Self {
        Self {
            scheme,
            state: State::Empty,
            max_assembled_bytes,
        }
    }

    /// Current phase
    pub fn phase(&self) -> MultiPartPhase {
        match self.state {
            State::Empty => MultiPartPhase::Empty,
            State::Collecting(_) => MultiPartPhase::Collecting,
            State::Complete => MultiPartPhase::Complete,
            State::Aborted => MultiPartPhase::Aborted,
        }
    }

    /// Collected fragments, while collecting
    pub fn reassembly(&self) -> Option<&ReassemblyState> {
        match &self.state {
            State::Collecting(reassembly) => Some(reassembly),
            _ => None,
        }
    }

    /// Progress of the sequence being collected
    pub fn progress(&self) -> Option<Progress> {
        self.reassembly().map(ReassemblyState::progress)
    }

    /// Drop any collected fragments and return to `Empty`
    pub fn reset(&mut self) {
        if !matches!(self.state, State::Empty) {
            debug!("multipart: reset from {:?}", self.phase());
        }
        self.state = State::Empty;
    }

    /// Feed one gated payload
    pub fn accept(&mut self, payload: ScanPayload) -> SessionEvent {
        match std::mem::replace(&mut self.state, State::Empty) {
            State::Empty => self.start(payload),
            State::Collecting(reassembly) => self.collect(reassembly, payload),
            State::Complete => {
                self.state = State::Complete;
                SessionEvent::Ignored(IgnoreReason::MultiPartComplete)
            }
            State::Aborted => {
                self.state = State::Aborted;
                SessionEvent::Ignored(IgnoreReason::MultiPartAborted)
            }
        }
    }

    fn start(&mut self, payload: ScanPayload) -> SessionEvent {
        let Some(fragment) = self.scheme.parse(&payload) else {
            return SessionEvent::Complete(Completion::single(payload));
        };

        if let Err(err) = check_index(&fragment.header) {
            return self.abort(err);
        }

        if fragment.header.total == 1 {
            let header = fragment.header.clone();
            return match self.finish(&header, vec![fragment.body]) {
                Ok(completion) => SessionEvent::Complete(completion),
                Err(err) => self.abort(err),
            };
        }

        debug!(
            "multipart: {} sequence {} started with {} parts",
            self.scheme.name(),
            fragment.header.sequence,
            fragment.header.total
        );
        let reassembly = ReassemblyState::new(fragment.header.clone());
        self.collect(reassembly, fragment)
    }

    fn collect(&mut self, mut reassembly: ReassemblyState, payload: impl Into<Incoming>) -> SessionEvent {
        let fragment = match payload.into() {
            Incoming::Fragment(fragment) => fragment,
            Incoming::Payload(payload) => match self.scheme.parse(&payload) {
                Some(fragment) => fragment,
                None => {
                    self.state = State::Collecting(reassembly);
                    return SessionEvent::Error(ScanError::UnrecognizedFormat(format!(
                        "expected a {} fragment, got {}",
                        self.scheme.name(),
                        payload.summary()
                    )));
                }
            },
        };

        if let Err(err) = reassembly.check_consistent(&fragment.header) {
            return self.abort(err);
        }

        reassembly.insert(fragment.header.index, fragment.body);
        let remaining = reassembly.parts_remaining();

        if remaining == 0 {
            let parts = reassembly.ordered_parts();
            return match self.finish(&reassembly.header, parts) {
                Ok(completion) => {
                    debug!("multipart: sequence {} complete", reassembly.header.sequence);
                    self.state = State::Complete;
                    SessionEvent::Complete(completion)
                }
                Err(err) => self.abort(err),
            };
        }

        let event = if remaining != reassembly.reported_remaining {
            reassembly.reported_remaining = remaining;
            SessionEvent::Progress(reassembly.progress())
        } else {
            SessionEvent::Ignored(IgnoreReason::DuplicateFragment)
        };
        self.state = State::Collecting(reassembly);
        event
    }

    fn finish(&self, header: &FragmentHeader, parts: Vec<Vec<u8>>) -> Result<Completion> {
        let assembled = self
            .scheme
            .assemble(header, parts, self.max_assembled_bytes)?;
        Ok(Completion {
            payload: assembled.payload,
            content_type: assembled.content_type,
            parts: header.total,
        })
    }

    fn abort(&mut self, err: ScanError) -> SessionEvent {
        warn!("multipart: aborting: {}", err);
        self.state = State::Aborted;
        SessionEvent::Error(err)
    }
}

enum Incoming {
    Fragment(Fragment),
    Payload(ScanPayload),
}

impl From<Fragment> for Incoming {
    fn from(fragment: Fragment) -> Self {
        Incoming::Fragment(fragment)
    }
}

impl From<ScanPayload> for Incoming {
    fn from(payload: ScanPayload) -> Self {
        Incoming::Payload(payload)
    }
}
