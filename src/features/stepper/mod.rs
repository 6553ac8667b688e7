//! The stepped "method" section: one scroll region drives which step is shown
//! and how far the lines inside it have filled.

pub mod controller;
pub mod filler;
pub mod segmenter;

use super::ScrollEffect;
use crate::gfx::sink::{EffectSink, ElementRef};
use controller::{StepState, StepTransition, StepTransitionController};
use log::info;

/// Ordered steps and the number of lines each one owns, fixed once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLayout {
    lines: Vec<usize>,
}

impl StepLayout {
    pub fn new(lines: Vec<usize>) -> Self {
        Self { lines }
    }

    /// `count` steps with `lines` lines each.
    pub fn uniform(count: usize, lines: usize) -> Self {
        Self::new(vec![lines; count])
    }

    pub fn total_steps(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines_in(&self, step: usize) -> usize {
        self.lines.get(step).copied().unwrap_or(0)
    }

    pub fn total_lines(&self) -> usize {
        self.lines.iter().sum()
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }
}

pub struct MethodSteps {
    layout: StepLayout,
    controller: StepTransitionController,
    last_progress: Option<f32>,
}

impl MethodSteps {
    pub fn new(layout: StepLayout) -> Self {
        let controller = StepTransitionController::new(layout.total_steps());
        Self {
            layout,
            controller,
            last_progress: None,
        }
    }

    pub fn layout(&self) -> &StepLayout {
        &self.layout
    }

    pub fn active_index(&self) -> Option<usize> {
        self.controller.active_index()
    }

    pub fn step_state(&self, step: usize) -> Option<StepState> {
        self.controller.step_state(step)
    }

    pub fn last_progress(&self) -> Option<f32> {
        self.last_progress
    }

    /// First step visible, every line empty.
    pub fn mount(&mut self, sink: &mut dyn EffectSink) {
        if self.layout.is_empty() {
            return;
        }
        self.controller.seed(sink);
        for (step, &count) in self.layout.lines().iter().enumerate() {
            for line in 0..count {
                sink.set_fill_fraction(ElementRef::Line { step, line }, 0.0);
            }
        }
        let with_lines = self.layout.lines().iter().filter(|&&n| n > 0).count();
        if with_lines > 0 {
            info!("method lines initialized ({with_lines} items)");
        }
    }

    /// One scroll tick: step visibility on segment crossings, line fills every time.
    pub fn update(&mut self, progress: f32, sink: &mut dyn EffectSink) -> Option<StepTransition> {
        if self.layout.is_empty() {
            return None;
        }
        let progress = segmenter::clamp_progress(progress);
        self.last_progress = Some(progress);

        let transition = self.controller.update(progress, sink);
        if self.layout.total_lines() > 0 {
            for fill in filler::fill_fractions(progress, self.layout.total_steps(), self.layout.lines()) {
                sink.set_fill_fraction(
                    ElementRef::Line {
                        step: fill.step,
                        line: fill.line,
                    },
                    fill.fraction,
                );
            }
        }
        transition
    }
}

impl ScrollEffect for MethodSteps {
    fn name(&self) -> &'static str {
        "method-steps"
    }

    fn mount(&mut self, sink: &mut dyn EffectSink) {
        MethodSteps::mount(self, sink);
    }

    fn on_progress(&mut self, progress: f32, sink: &mut dyn EffectSink) {
        self.update(progress, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::sink::testing::RecordingSink;

    fn mounted(lines: Vec<usize>) -> (MethodSteps, RecordingSink) {
        let mut sink = RecordingSink::default();
        let mut steps = MethodSteps::new(StepLayout::new(lines));
        steps.mount(&mut sink);
        (steps, sink)
    }

    #[test]
    fn mount_seeds_visibility_and_empties_lines() {
        let (steps, sink) = mounted(vec![2, 2, 2, 2]);
        assert_eq!(steps.active_index(), Some(0));
        assert_eq!(sink.visible_steps(), vec![0]);
        assert_eq!(sink.fills.len(), 8);
        assert!(sink.fills.values().all(|&f| f == 0.0));
    }

    #[test]
    fn completed_step_stays_full_until_scrolled_back() {
        let (mut steps, mut sink) = mounted(vec![2, 2, 2, 2]);

        steps.update(0.3, &mut sink);
        assert_eq!(sink.fill(0, 0), 1.0);
        assert_eq!(sink.fill(0, 1), 1.0);
        assert_eq!(steps.step_state(0), Some(StepState::Completed));

        for p in [0.4, 0.6, 0.95, 1.0] {
            steps.update(p, &mut sink);
            assert_eq!(sink.fill(0, 0), 1.0);
            assert_eq!(sink.fill(0, 1), 1.0);
        }

        steps.update(0.125, &mut sink);
        assert_eq!(steps.active_index(), Some(0));
        assert_eq!(sink.fill(0, 0), 1.0);
        assert_eq!(sink.fill(0, 1), 0.0);
        assert_eq!(sink.fill(1, 0), 0.0);
    }

    #[test]
    fn backward_jump_resets_skipped_steps() {
        let (mut steps, mut sink) = mounted(vec![2, 2, 2, 2]);
        steps.update(0.9, &mut sink);
        assert_eq!(steps.active_index(), Some(3));

        let transition = steps.update(0.4, &mut sink);
        assert_eq!(transition, Some(StepTransition { from: Some(3), to: 1 }));
        assert_eq!(sink.visible_steps(), vec![1]);
        for line in 0..2 {
            assert_eq!(sink.fill(2, line), 0.0);
            assert_eq!(sink.fill(3, line), 0.0);
        }
    }

    #[test]
    fn steps_without_lines_still_transition() {
        let (mut steps, mut sink) = mounted(vec![0, 0, 0]);
        assert!(sink.fills.is_empty());
        steps.update(1.0, &mut sink);
        assert_eq!(steps.active_index(), Some(2));
        assert_eq!(sink.fill_writes, 0);
    }

    #[test]
    fn empty_layout_writes_nothing() {
        let (mut steps, mut sink) = mounted(vec![]);
        assert_eq!(steps.update(0.5, &mut sink), None);
        assert_eq!(sink.visibility_writes, 0);
        assert_eq!(sink.fill_writes, 0);
        assert_eq!(steps.active_index(), None);
    }

    #[test]
    fn progress_is_clamped_before_use() {
        let (mut steps, mut sink) = mounted(vec![1, 1]);
        steps.update(1.7, &mut sink);
        assert_eq!(steps.last_progress(), Some(1.0));
        assert_eq!(steps.active_index(), Some(1));
        assert_eq!(sink.fill(1, 0), 1.0);
    }
}
