//! Capture Window - bounded candidate accumulation
//!
//! Quản lý observation sequence cho một negotiation attempt.
//! Candidates are appended in arrival order up to `max_candidates`; the
//! record is only reduced once the window is closed (or explicitly as a
//! provisional snapshot).

use std::time::{Duration, Instant};

use crate::logic::error::ExposureError;
use crate::logic::policy::CaptureSettings;
use crate::logic::signal::{parse_candidate, reduce, CandidateObservation, SignalRecord};
use super::types::{CaptureError, CloseReason, ClosedWindow};

#[derive(Debug)]
pub struct CaptureWindow {
    settings: CaptureSettings,
    started: Instant,
    observations: Vec<CandidateObservation>,
    rejected: usize,
}

impl CaptureWindow {
    /// Start a window now
    pub fn open(settings: CaptureSettings) -> Self {
        Self::open_at(settings, Instant::now())
    }

    pub fn open_at(settings: CaptureSettings, started: Instant) -> Self {
        Self {
            settings,
            started,
            observations: Vec::new(),
            rejected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[CandidateObservation] {
        &self.observations
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn deadline(&self) -> Instant {
        self.started + self.settings.window()
    }

    /// Time left before the window times out
    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    /// Append an observation; rejects once expired or full
    pub fn push(&mut self, observation: CandidateObservation) -> Result<(), CaptureError> {
        self.ensure_accepting()?;
        self.observations.push(observation);
        Ok(())
    }

    /// Parse and append a raw descriptor
    pub fn push_descriptor(&mut self, descriptor: &str) -> Result<&CandidateObservation, CaptureError> {
        self.ensure_accepting()?;

        let sequence = self.observations.len() as u32;
        match parse_candidate(descriptor, sequence, self.elapsed_ms()) {
            Ok(observation) => {
                self.observations.push(observation);
                Ok(&self.observations[self.observations.len() - 1])
            }
            Err(e) => {
                self.rejected += 1;
                log::warn!("Rejected candidate descriptor: {}", e);
                Err(e.into())
            }
        }
    }

    /// Parse and append a batch of raw descriptors; all or nothing
    ///
    /// Malformed lines are skipped and returned with their index. Nothing is
    /// appended when the window has expired or the well-formed lines would
    /// overflow `max_candidates`.
    pub fn push_descriptors<S: AsRef<str>>(
        &mut self,
        descriptors: &[S],
    ) -> Result<Vec<(usize, ExposureError)>, CaptureError> {
        if self.is_expired() {
            return Err(CaptureError::AlreadyClosed);
        }

        let elapsed_ms = self.elapsed_ms();
        let base = self.observations.len();
        let mut parsed = Vec::with_capacity(descriptors.len());
        let mut rejected = Vec::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let sequence = (base + parsed.len()) as u32;
            match parse_candidate(descriptor.as_ref(), sequence, elapsed_ms) {
                Ok(observation) => parsed.push(observation),
                Err(e) => {
                    log::warn!("Rejected candidate descriptor {}: {}", index, e);
                    rejected.push((index, e));
                }
            }
        }

        if base + parsed.len() > self.settings.max_candidates {
            return Err(self.capacity_exceeded());
        }

        self.rejected += rejected.len();
        self.observations.extend(parsed);
        Ok(rejected)
    }

    /// Provisional record of what has arrived so far
    pub fn snapshot(&self) -> SignalRecord {
        reduce(&self.observations)
    }

    /// Freeze the window and reduce it into the final record
    pub fn close(self, reason: CloseReason) -> ClosedWindow {
        let elapsed_ms = self.elapsed_ms();
        let record = reduce(&self.observations);

        log::info!(
            "Capture window closed ({:?}) after {} ms with {} candidates, {} rejected",
            reason,
            elapsed_ms,
            self.observations.len(),
            self.rejected
        );

        ClosedWindow {
            record,
            observations: self.observations,
            reason,
            elapsed_ms,
            rejected: self.rejected,
        }
    }

    fn ensure_accepting(&self) -> Result<(), CaptureError> {
        if self.is_expired() {
            return Err(CaptureError::AlreadyClosed);
        }
        if self.observations.len() >= self.settings.max_candidates {
            return Err(self.capacity_exceeded());
        }
        Ok(())
    }

    fn capacity_exceeded(&self) -> CaptureError {
        log::warn!(
            "Candidate cap reached ({}), rejecting further candidates",
            self.settings.max_candidates
        );
        ExposureError::CapacityExceeded {
            what: "candidate",
            limit: self.settings.max_candidates,
        }
        .into()
    }
}
