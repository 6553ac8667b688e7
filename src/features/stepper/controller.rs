//! Edge-triggered step visibility.
//!
//! The controller remembers which step it last showed and only writes to the
//! sink when the segment under the scroll position changes. Scrolling back up
//! uses the same rule; a fling across several segments resolves straight to
//! the final one.

use super::segmenter;
use crate::gfx::sink::{EffectSink, ElementRef, Visibility};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Settled(usize),
}

/// The only mutable state of the stepped procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    phase: Phase,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, Phase::Settled(_))
    }

    pub fn previous_active_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Settled(index) => Some(index),
            Phase::Uninitialized => None,
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// One emitted change of the active step. `from` is `None` for the seeding write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: Option<usize>,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct StepTransitionController {
    total_steps: usize,
    state: ControllerState,
}

impl StepTransitionController {
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            state: ControllerState::new(),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.previous_active_index()
    }

    /// Completed / active / pending for `step`, relative to the current active step.
    pub fn step_state(&self, step: usize) -> Option<StepState> {
        let active = self.active_index()?;
        Some(match step.cmp(&active) {
            std::cmp::Ordering::Less => StepState::Completed,
            std::cmp::Ordering::Equal => StepState::Active,
            std::cmp::Ordering::Greater => StepState::Pending,
        })
    }

    /// Shows step 0 and hides the rest. Does nothing once settled or with no steps.
    pub fn seed(&mut self, sink: &mut dyn EffectSink) -> Option<StepTransition> {
        if self.total_steps == 0 || self.state.is_initialized() {
            return None;
        }
        for step in 0..self.total_steps {
            let visibility = if step == 0 {
                Visibility::SHOWN
            } else {
                Visibility::HIDDEN
            };
            sink.set_visibility(ElementRef::Step(step), visibility);
        }
        self.state.phase = Phase::Settled(0);
        debug!("steps seeded: 0 of {} visible", self.total_steps);
        Some(StepTransition { from: None, to: 0 })
    }

    /// Feeds one progress tick. Returns the transition when the active step changed.
    ///
    /// An uninitialized controller seeds itself first; the returned transition
    /// then has `from: None` and points at wherever the tick landed.
    pub fn update(&mut self, progress: f32, sink: &mut dyn EffectSink) -> Option<StepTransition> {
        if self.total_steps == 0 {
            return None;
        }
        let seeded = self.seed(sink).is_some();
        let previous = self.active_index()?;
        let next = segmenter::active_index(segmenter::clamp_progress(progress), self.total_steps);

        if next == previous {
            return seeded.then_some(StepTransition { from: None, to: next });
        }

        sink.set_visibility(ElementRef::Step(previous), Visibility::HIDDEN);
        sink.set_visibility(ElementRef::Step(next), Visibility::SHOWN);
        self.state.phase = Phase::Settled(next);
        debug!("step {previous} -> {next} at progress {progress:.3}");

        Some(StepTransition {
            from: if seeded { None } else { Some(previous) },
            to: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::sink::testing::RecordingSink;

    #[test]
    fn seed_shows_first_step_only() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(4);
        assert!(!controller.state().is_initialized());

        let seeded = controller.seed(&mut sink);
        assert_eq!(seeded, Some(StepTransition { from: None, to: 0 }));
        assert_eq!(sink.visible_steps(), vec![0]);
        assert_eq!(sink.visibility_writes, 4);
        assert_eq!(controller.state().phase(), Phase::Settled(0));

        assert_eq!(controller.seed(&mut sink), None);
        assert_eq!(sink.visibility_writes, 4);
    }

    #[test]
    fn same_progress_twice_transitions_once() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(4);
        controller.seed(&mut sink);
        let writes = sink.visibility_writes;

        assert_eq!(
            controller.update(0.5, &mut sink),
            Some(StepTransition { from: Some(0), to: 2 })
        );
        assert_eq!(controller.update(0.5, &mut sink), None);
        assert_eq!(sink.visibility_writes, writes + 2);
    }

    #[test]
    fn ticks_inside_one_segment_write_nothing() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(4);
        controller.seed(&mut sink);
        let writes = sink.visibility_writes;
        for i in 0..25 {
            assert_eq!(controller.update(i as f32 / 100.0, &mut sink), None);
        }
        assert_eq!(sink.visibility_writes, writes);
    }

    #[test]
    fn first_update_without_seed_seeds_then_moves() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(4);
        assert_eq!(
            controller.update(0.6, &mut sink),
            Some(StepTransition { from: None, to: 2 })
        );
        assert_eq!(sink.visible_steps(), vec![2]);
        assert_eq!(controller.update(0.6, &mut sink), None);
    }

    #[test]
    fn fling_and_backward_scroll_resolve_to_final_step() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(4);
        controller.seed(&mut sink);

        controller.update(0.9, &mut sink);
        assert_eq!(controller.active_index(), Some(3));
        assert_eq!(sink.visible_steps(), vec![3]);

        let back = controller.update(0.4, &mut sink);
        assert_eq!(back, Some(StepTransition { from: Some(3), to: 1 }));
        assert_eq!(sink.visible_steps(), vec![1]);
        assert_eq!(controller.step_state(0), Some(StepState::Completed));
        assert_eq!(controller.step_state(1), Some(StepState::Active));
        assert_eq!(controller.step_state(3), Some(StepState::Pending));
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(3);
        controller.seed(&mut sink);
        controller.update(7.5, &mut sink);
        assert_eq!(controller.active_index(), Some(2));
        controller.update(-3.0, &mut sink);
        assert_eq!(controller.active_index(), Some(0));
    }

    #[test]
    fn empty_collection_is_a_no_op() {
        let mut sink = RecordingSink::default();
        let mut controller = StepTransitionController::new(0);
        assert_eq!(controller.seed(&mut sink), None);
        assert_eq!(controller.update(0.5, &mut sink), None);
        assert_eq!(sink.visibility_writes, 0);
        assert!(!controller.state().is_initialized());
        assert_eq!(controller.step_state(0), None);
    }
}
