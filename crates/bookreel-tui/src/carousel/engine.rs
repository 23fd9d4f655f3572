//! L3 Molecular Layer: Scroll engine
//!
//! Drives one left translation of exactly one slot width per step over a
//! [`TimedTransition`]. Completion is reported through [`ScrollEngine::poll`]
//! at most once per step; `stop` disarms the pending completion before
//! cancelling the transition, so a late finish can never start another step.

use std::time::Duration;

use super::controller::AnimationState;
use super::timing::lerp_u16;
use super::transition::{TimedTransition, TransitionPhase};

/// Identifies one started step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepToken(u64);

#[derive(Debug)]
pub struct ScrollEngine<T: TimedTransition> {
    transition: T,
    duration: Duration,
    /// Columns travelled by one step
    distance: u16,
    /// Step whose completion is still wanted
    armed: Option<StepToken>,
    issued: u64,
}

impl<T: TimedTransition> ScrollEngine<T> {
    pub fn new(transition: T, duration: Duration) -> Self {
        Self {
            transition,
            duration,
            distance: 0,
            armed: None,
            issued: 0,
        }
    }

    pub fn set_distance(&mut self, distance: u16) {
        self.distance = distance;
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start one translation; ignored unless `state` is Playing
    pub fn step(&mut self, state: AnimationState) -> Option<StepToken> {
        if state != AnimationState::Playing {
            return None;
        }
        if self.armed.is_some() {
            tracing::warn!("Scroll step requested while another is in flight");
            return None;
        }

        self.issued += 1;
        let token = StepToken(self.issued);
        if self.transition.phase() == TransitionPhase::Finished {
            // Back-to-back step: keep the cadence of the previous one
            self.transition.chain(self.duration);
        } else {
            self.transition.start(self.duration);
        }
        self.armed = Some(token);
        Some(token)
    }

    /// Hold the in-flight translation at its current offset
    pub fn pause(&mut self) {
        self.transition.pause();
    }

    /// Continue from the held offset
    pub fn resume(&mut self) {
        self.transition.resume();
    }

    /// Drop the pending completion and jump back to the rest position
    pub fn stop(&mut self) {
        self.armed = None;
        self.transition.cancel();
    }

    /// Report a finished step, once
    pub fn poll(&mut self) -> Option<StepToken> {
        if self.transition.phase() == TransitionPhase::Finished {
            self.armed.take()
        } else {
            None
        }
    }

    /// Whether a step has started and not yet been reported or stopped
    pub fn in_flight(&self) -> bool {
        self.armed.is_some()
    }

    pub fn progress(&self) -> f64 {
        self.transition.progress()
    }

    /// Current leftward translation in columns
    pub fn offset(&self) -> u16 {
        lerp_u16(0, self.distance, self.transition.progress())
    }

    pub fn transition(&self) -> &T {
        &self.transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::transition::{ClockTransition, ManualClock};

    fn engine() -> (ManualClock, ScrollEngine<ClockTransition<ManualClock>>) {
        let clock = ManualClock::new();
        let mut engine = ScrollEngine::new(
            ClockTransition::new(clock.clone()),
            Duration::from_millis(3000),
        );
        engine.set_distance(30);
        (clock, engine)
    }

    #[test]
    fn test_step_requires_playing() {
        let (_, mut engine) = engine();
        assert!(engine.step(AnimationState::Stopped).is_none());
        assert!(engine.step(AnimationState::Paused).is_none());
        assert!(!engine.in_flight());
        assert!(engine.step(AnimationState::Playing).is_some());
        assert!(engine.in_flight());
    }

    #[test]
    fn test_single_step_in_flight() {
        let (_, mut engine) = engine();
        engine.step(AnimationState::Playing);
        assert!(engine.step(AnimationState::Playing).is_none());
    }

    #[test]
    fn test_completion_reported_once() {
        let (clock, mut engine) = engine();
        let token = engine.step(AnimationState::Playing);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(engine.offset(), 15);
        assert!(engine.poll().is_none());

        clock.advance(Duration::from_millis(1500));
        assert_eq!(engine.poll(), token);
        assert!(engine.poll().is_none());
        // Final position holds until the next step
        assert_eq!(engine.offset(), 30);
    }

    #[test]
    fn test_stop_disarms_and_resets_offset() {
        let (clock, mut engine) = engine();
        engine.step(AnimationState::Playing);
        clock.advance(Duration::from_millis(2000));

        engine.stop();
        assert_eq!(engine.offset(), 0);
        assert!(!engine.in_flight());

        clock.advance(Duration::from_millis(5000));
        assert!(engine.poll().is_none());
    }

    #[test]
    fn test_pause_resume_keeps_partial_offset() {
        let (clock, mut engine) = engine();
        engine.step(AnimationState::Playing);
        clock.advance(Duration::from_millis(1000));
        engine.pause();
        clock.advance(Duration::from_millis(10_000));
        assert_eq!(engine.offset(), 10);
        assert!(engine.poll().is_none());

        engine.resume();
        clock.advance(Duration::from_millis(2000));
        assert!(engine.poll().is_some());
    }

    #[test]
    fn test_next_step_starts_where_previous_ended() {
        let (clock, mut engine) = engine();
        engine.step(AnimationState::Playing);
        clock.advance(Duration::from_millis(3090));
        assert!(engine.poll().is_some());

        engine.step(AnimationState::Playing);
        assert_eq!(engine.offset(), 1);
        clock.advance(Duration::from_millis(2910));
        assert!(engine.poll().is_some());
    }

    #[test]
    fn test_step_after_stop_starts_fresh() {
        let (clock, mut engine) = engine();
        engine.step(AnimationState::Playing);
        clock.advance(Duration::from_millis(3500));
        engine.stop();

        engine.step(AnimationState::Playing);
        assert_eq!(engine.offset(), 0);
        clock.advance(Duration::from_millis(2999));
        assert!(engine.poll().is_none());
    }
}
