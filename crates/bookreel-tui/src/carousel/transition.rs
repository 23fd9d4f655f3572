//! L4 Atomic Layer: Timed transition resource
//!
//! A [`TimedTransition`] runs one linear, non-looping transition of a fixed
//! duration. It can be paused mid-flight and resumed from the held progress,
//! and once finished it holds the final position until restarted or cancelled.
//! [`ClockTransition`] implements it over a pluggable [`Clock`] so the frame
//! loop uses wall time while tests drive time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::timing;

/// Lifecycle phase of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Not started, or cancelled back to the rest position
    Idle,
    Running,
    Paused,
    /// Reached full progress; the final position is held
    Finished,
}

/// One-shot timed transition with pause/resume/cancel
pub trait TimedTransition {
    /// Begin a new transition from progress 0, discarding any previous one
    fn start(&mut self, duration: Duration);

    /// Begin the next transition where a finished one ended
    ///
    /// Time spent past the end of the previous transition counts towards the
    /// new one, so back-to-back transitions keep a constant cadence even when
    /// completion is observed late. Falls back to [`TimedTransition::start`].
    fn chain(&mut self, duration: Duration) {
        self.start(duration);
    }

    /// Freeze a running transition at its current progress
    fn pause(&mut self);

    /// Continue a paused transition from its held progress
    fn resume(&mut self);

    /// Abandon the transition and return to the rest position (progress 0)
    fn cancel(&mut self);

    /// Current progress in [0, 1]
    fn progress(&self) -> f64;

    fn phase(&self) -> TransitionPhase;
}

/// Time source for [`ClockTransition`]
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

#[derive(Debug, Clone, Copy)]
enum Run {
    Idle,
    /// `banked` is progress time accumulated before the latest resume
    Running { since: Instant, banked: Duration },
    Paused { banked: Duration },
}

/// [`TimedTransition`] measured against a [`Clock`]
#[derive(Debug, Clone)]
pub struct ClockTransition<C: Clock = SystemClock> {
    clock: C,
    duration: Duration,
    run: Run,
}

impl<C: Clock> ClockTransition<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            duration: Duration::ZERO,
            run: Run::Idle,
        }
    }

    /// Progress time consumed so far, capped at the duration
    pub fn elapsed(&self) -> Duration {
        let raw = match self.run {
            Run::Idle => Duration::ZERO,
            Run::Running { since, banked } => {
                banked + self.clock.now().saturating_duration_since(since)
            }
            Run::Paused { banked } => banked,
        };
        raw.min(self.duration)
    }

    /// Time still needed to finish
    pub fn remaining(&self) -> Duration {
        timing::remaining(self.elapsed(), self.duration)
    }
}

impl Default for ClockTransition<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> TimedTransition for ClockTransition<C> {
    fn start(&mut self, duration: Duration) {
        self.duration = duration;
        self.run = Run::Running {
            since: self.clock.now(),
            banked: Duration::ZERO,
        };
    }

    fn chain(&mut self, duration: Duration) {
        let Run::Running { since, banked } = self.run else {
            return self.start(duration);
        };
        let now = self.clock.now();
        let ended = since + self.duration.saturating_sub(banked);
        let overshoot = now.saturating_duration_since(ended);

        // A stall longer than a whole step restarts instead of catching up
        if now < ended || overshoot >= duration {
            return self.start(duration);
        }
        self.duration = duration;
        self.run = Run::Running {
            since: ended,
            banked: Duration::ZERO,
        };
    }

    fn pause(&mut self) {
        if let Run::Running { .. } = self.run {
            self.run = Run::Paused {
                banked: self.elapsed(),
            };
        }
    }

    fn resume(&mut self) {
        if let Run::Paused { banked } = self.run {
            self.run = Run::Running {
                since: self.clock.now(),
                banked,
            };
        }
    }

    fn cancel(&mut self) {
        self.run = Run::Idle;
    }

    fn progress(&self) -> f64 {
        match self.run {
            Run::Idle => 0.0,
            _ => timing::progress(self.elapsed(), self.duration),
        }
    }

    fn phase(&self) -> TransitionPhase {
        match self.run {
            Run::Idle => TransitionPhase::Idle,
            Run::Paused { .. } => TransitionPhase::Paused,
            Run::Running { .. } if self.elapsed() >= self.duration => TransitionPhase::Finished,
            Run::Running { .. } => TransitionPhase::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> (ManualClock, ClockTransition<ManualClock>) {
        let clock = ManualClock::new();
        (clock.clone(), ClockTransition::new(clock))
    }

    #[test]
    fn test_runs_linearly_to_finish() {
        let (clock, mut t) = transition();
        assert_eq!(t.phase(), TransitionPhase::Idle);

        t.start(Duration::from_millis(3000));
        assert_eq!(t.phase(), TransitionPhase::Running);

        clock.advance(Duration::from_millis(750));
        assert!((t.progress() - 0.25).abs() < 0.001);

        clock.advance(Duration::from_millis(2250));
        assert_eq!(t.phase(), TransitionPhase::Finished);
        assert!((t.progress() - 1.0).abs() < 0.001);

        // Fill-forward: final position holds
        clock.advance(Duration::from_millis(5000));
        assert!((t.progress() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pause_holds_progress() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(3000));
        clock.advance(Duration::from_millis(1200));
        t.pause();

        clock.advance(Duration::from_secs(60));
        assert_eq!(t.phase(), TransitionPhase::Paused);
        assert!((t.progress() - 0.4).abs() < 0.001);

        t.resume();
        assert_eq!(t.remaining(), Duration::from_millis(1800));
        clock.advance(Duration::from_millis(1799));
        assert_eq!(t.phase(), TransitionPhase::Running);
        clock.advance(Duration::from_millis(1));
        assert_eq!(t.phase(), TransitionPhase::Finished);
    }

    #[test]
    fn test_cancel_returns_to_rest() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(1000));
        clock.advance(Duration::from_millis(500));
        t.cancel();

        assert_eq!(t.phase(), TransitionPhase::Idle);
        assert_eq!(t.progress(), 0.0);
        clock.advance(Duration::from_millis(5000));
        assert_eq!(t.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_resume_without_pause_is_ignored() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(1000));
        clock.advance(Duration::from_millis(300));
        t.resume();
        assert!((t.progress() - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_chain_carries_overshoot() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(3000));
        clock.advance(Duration::from_millis(3040));
        assert_eq!(t.phase(), TransitionPhase::Finished);

        t.chain(Duration::from_millis(3000));
        assert_eq!(t.phase(), TransitionPhase::Running);
        assert_eq!(t.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn test_chain_after_long_stall_restarts() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(3000));
        clock.advance(Duration::from_millis(9000));

        t.chain(Duration::from_millis(3000));
        assert_eq!(t.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_chain_from_idle_starts() {
        let (clock, mut t) = transition();
        t.chain(Duration::from_millis(1000));
        clock.advance(Duration::from_millis(500));
        assert!((t.progress() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_chain_after_paused_finish_keeps_banked_time() {
        let (clock, mut t) = transition();
        t.start(Duration::from_millis(1000));
        clock.advance(Duration::from_millis(400));
        t.pause();
        clock.advance(Duration::from_secs(10));
        t.resume();
        clock.advance(Duration::from_millis(650));

        t.chain(Duration::from_millis(1000));
        assert_eq!(t.elapsed(), Duration::from_millis(50));
    }
}
