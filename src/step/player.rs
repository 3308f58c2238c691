//! Step player: paces a [`StepSequence`] out to a [`Renderer`]
//!
//! This is the only place where timing lives. Cores compute their whole
//! sequence synchronously; the player releases one step per interval from a
//! cooperative loop driven by its owner (the TUI event loop calls
//! [`StepPlayer::poll`] on every tick, headless callers use
//! [`StepPlayer::play`]).
//!
//! # Concurrency policy
//!
//! At most one sequence is in flight. Starting another while one is active is
//! rejected with [`VizError::Busy`]; nothing is queued. Cancelling drops the
//! remaining steps immediately and never touches a structure, because every
//! mutation already completed before playback began.

use super::{Step, StepSequence};
use crate::errors::{Result, VizError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default pause between two steps
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Smallest pause accepted from configuration
pub const MIN_INTERVAL_MS: u64 = 10;

/// Upper bound on one sleep of the blocking loop, so cancellation is noticed quickly
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    pub interval: Duration,
}

impl PlayerConfig {
    pub fn with_interval_ms(ms: u64) -> Self {
        PlayerConfig {
            interval: Duration::from_millis(ms.max(MIN_INTERVAL_MS)),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Consumer of played-back steps
pub trait Renderer {
    fn render(&mut self, step: &Step);

    /// Called once when a sequence ends, `completed` is false after a cancel
    fn finished(&mut self, _label: &str, _completed: bool) {}
}

/// Shared cancel flag; clones observe the same flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Summary of one finished or cancelled playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub label: String,
    pub emitted: usize,
    pub total: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
struct Playback {
    sequence: StepSequence,
    position: usize,
    next_due: Instant,
}

/// Drives playback of one step sequence at a time
#[derive(Debug)]
pub struct StepPlayer {
    config: PlayerConfig,
    active: Option<Playback>,
    token: CancelToken,
    last_report: Option<PlaybackReport>,
}

impl StepPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        StepPlayer {
            config,
            active: None,
            token: CancelToken::new(),
            last_report: None,
        }
    }

    pub fn config(&self) -> PlayerConfig {
        self.config
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.config.interval = interval.max(Duration::from_millis(MIN_INTERVAL_MS));
    }

    /// Token that cancels the current playback from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// `(label, emitted, total)` of the sequence in flight
    pub fn progress(&self) -> Option<(&str, usize, usize)> {
        self.active
            .as_ref()
            .map(|p| (p.sequence.label(), p.position, p.sequence.len()))
    }

    pub fn last_report(&self) -> Option<&PlaybackReport> {
        self.last_report.as_ref()
    }

    /// `Busy` while a sequence is in flight
    pub fn ensure_idle(&self) -> Result<()> {
        match &self.active {
            Some(current) => Err(VizError::Busy {
                label: current.sequence.label().to_string(),
                remaining: current.sequence.len() - current.position,
            }),
            None => Ok(()),
        }
    }

    /// Begin playing `sequence`; the first step is due immediately
    pub fn start(&mut self, sequence: StepSequence, now: Instant) -> Result<()> {
        if let Err(busy) = self.ensure_idle() {
            warn!(rejected = sequence.label(), %busy, "playback already active");
            return Err(busy);
        }

        self.token.reset();
        debug!(label = sequence.label(), steps = sequence.len(), "playback started");

        if sequence.is_empty() {
            self.last_report = Some(PlaybackReport {
                label: sequence.label().to_string(),
                emitted: 0,
                total: 0,
                cancelled: false,
            });
            return Ok(());
        }

        self.active = Some(Playback {
            sequence,
            position: 0,
            next_due: now,
        });
        Ok(())
    }

    /// Release the next step if it is due at `now`
    ///
    /// Returns at most one step per call. When the last step is released the
    /// playback ends and the player accepts a new sequence.
    pub fn poll(&mut self, now: Instant) -> Option<Step> {
        if self.token.is_cancelled() {
            self.cancel();
            return None;
        }

        let interval = self.config.interval;
        let playback = self.active.as_mut()?;
        if now < playback.next_due {
            return None;
        }

        let step = playback.sequence.get(playback.position).cloned();
        playback.position += 1;
        playback.next_due = now + interval;

        if playback.position >= playback.sequence.len() {
            self.finish(false);
        }
        step
    }

    /// Time left until the next step is due, `None` when idle
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.active
            .as_ref()
            .map(|p| p.next_due.saturating_duration_since(now))
    }

    /// Halt emission immediately; returns how many steps were dropped
    pub fn cancel(&mut self) -> usize {
        self.token.reset();
        match &self.active {
            Some(p) => {
                let dropped = p.sequence.len() - p.position;
                debug!(label = p.sequence.label(), dropped, "playback cancelled");
                self.finish(true);
                dropped
            }
            None => 0,
        }
    }

    fn finish(&mut self, cancelled: bool) {
        if let Some(p) = self.active.take() {
            self.last_report = Some(PlaybackReport {
                label: p.sequence.label().to_string(),
                emitted: p.position,
                total: p.sequence.len(),
                cancelled,
            });
        }
    }

    /// Play `sequence` to `renderer`, blocking the calling thread
    ///
    /// Sleeps in short slices between steps and stops as soon as the cancel
    /// token is raised.
    pub fn play<R: Renderer>(
        &mut self,
        sequence: StepSequence,
        renderer: &mut R,
    ) -> Result<PlaybackReport> {
        let label = sequence.label().to_string();
        self.start(sequence, Instant::now())?;

        loop {
            let now = Instant::now();
            if let Some(step) = self.poll(now) {
                renderer.render(&step);
                continue;
            }
            match self.time_until_next(now) {
                Some(wait) => thread::sleep(wait.min(SLEEP_SLICE)),
                None => break,
            }
        }

        let report = self.last_report.clone().unwrap_or(PlaybackReport {
            label,
            emitted: 0,
            total: 0,
            cancelled: false,
        });
        renderer.finished(&report.label, !report.cancelled);
        Ok(report)
    }
}

impl Default for StepPlayer {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{StepKind, StepRecorder};

    fn sequence(n: usize) -> StepSequence {
        let mut rec = StepRecorder::new();
        for i in 0..n {
            rec.record(Step::new(StepKind::Highlight).index(i));
        }
        rec.finish("test")
    }

    #[test]
    fn test_paces_one_step_per_interval() {
        let mut player = StepPlayer::new(PlayerConfig::with_interval_ms(100));
        let t0 = Instant::now();
        player.start(sequence(3), t0).unwrap();

        assert!(player.poll(t0).is_some());
        // Not due yet
        assert!(player.poll(t0 + Duration::from_millis(50)).is_none());
        assert!(player.poll(t0 + Duration::from_millis(100)).is_some());
        assert!(player.is_active());
        assert!(player.poll(t0 + Duration::from_millis(200)).is_some());
        assert!(!player.is_active());

        let report = player.last_report().unwrap();
        assert_eq!(report.emitted, 3);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_second_start_is_busy() {
        let mut player = StepPlayer::default();
        let t0 = Instant::now();
        player.start(sequence(2), t0).unwrap();
        player.poll(t0);

        let err = player.start(sequence(1), t0).unwrap_err();
        assert_eq!(
            err,
            VizError::Busy {
                label: "test".to_string(),
                remaining: 1
            }
        );
    }

    #[test]
    fn test_cancel_token_halts_emission() {
        let mut player = StepPlayer::default();
        let token = player.cancel_token();
        let t0 = Instant::now();
        player.start(sequence(5), t0).unwrap();
        player.poll(t0);

        token.cancel();
        assert!(player.poll(t0 + Duration::from_secs(10)).is_none());
        assert!(!player.is_active());
        assert!(player.last_report().unwrap().cancelled);

        // Player is reusable after a cancel
        player.start(sequence(1), t0).unwrap();
        assert!(player.poll(t0).is_some());
    }

    #[test]
    fn test_empty_sequence_finishes_immediately() {
        let mut player = StepPlayer::default();
        player.start(StepSequence::empty("noop"), Instant::now()).unwrap();
        assert!(!player.is_active());
        assert_eq!(player.last_report().unwrap().total, 0);
    }
}
