//! Fill levels of the lines nested inside each step.
//!
//! Lines of completed steps are full, lines of pending steps are empty, and
//! the active step's lines fill one after another across its segment.

use super::segmenter;

/// Target fill for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFill {
    pub step: usize,
    pub line: usize,
    pub fraction: f32,
}

/// Position inside the active step's segment, in `[0, 1]`.
pub fn progress_in_step(progress: f32, active: usize, total_steps: usize) -> f32 {
    assert!(total_steps > 0, "progress_in_step needs at least one step");
    // (progress - active * segment) / segment, without the rounding of 1/N;
    // progress 1.0 lands exactly on 1.0 of the last step.
    (progress * total_steps as f32 - active as f32).clamp(0.0, 1.0)
}

/// Fill of line `line` out of `count` when the step is `within` of the way through.
pub fn line_fraction(within: f32, line: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let start = line as f32 / count as f32;
    let end = (line + 1) as f32 / count as f32;
    if within <= start {
        0.0
    } else if within >= end {
        1.0
    } else {
        ((within - start) * count as f32).min(1.0)
    }
}

/// Fill of every line of every step for one progress tick.
///
/// `lines_per_step[i]` is the line count of step `i`; steps beyond the slice own
/// no lines. Steps with zero lines contribute no entries.
pub fn fill_fractions(progress: f32, total_steps: usize, lines_per_step: &[usize]) -> Vec<LineFill> {
    let progress = segmenter::clamp_progress(progress);
    let active = segmenter::active_index(progress, total_steps);
    let within = progress_in_step(progress, active, total_steps);

    let mut fills = Vec::with_capacity(lines_per_step.iter().sum());
    for (step, &count) in lines_per_step.iter().enumerate().take(total_steps) {
        for line in 0..count {
            let fraction = match step.cmp(&active) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Greater => 0.0,
                std::cmp::Ordering::Equal => line_fraction(within, line, count),
            };
            fills.push(LineFill { step, line, fraction });
        }
    }
    fills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(fills: &[LineFill], step: usize, line: usize) -> f32 {
        fills
            .iter()
            .find(|f| f.step == step && f.line == line)
            .map(|f| f.fraction)
            .unwrap_or_else(|| panic!("no fill for step {step} line {line}"))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn two_lines_fill_in_sequence() {
        assert!(approx(line_fraction(0.3, 0, 2), 0.6));
        assert_eq!(line_fraction(0.3, 1, 2), 0.0);
        assert_eq!(line_fraction(0.75, 0, 2), 1.0);
        assert!(approx(line_fraction(0.75, 1, 2), 0.5));
    }

    #[test]
    fn sub_segment_bounds_are_inclusive_on_both_sides() {
        assert_eq!(line_fraction(0.5, 1, 2), 0.0);
        assert_eq!(line_fraction(0.5, 0, 2), 1.0);
        assert_eq!(line_fraction(0.0, 0, 3), 0.0);
        assert_eq!(line_fraction(1.0, 2, 3), 1.0);
    }

    #[test]
    fn zero_lines_never_divides() {
        assert_eq!(line_fraction(0.5, 0, 0), 0.0);
        let fills = fill_fractions(0.3, 3, &[2, 0, 1]);
        assert!(fills.iter().all(|f| f.step != 1));
        assert_eq!(fills.len(), 3);
    }

    #[test]
    fn completed_active_and_pending_steps() {
        // Four steps, two lines each; 0.575 is 30% into step 2.
        let fills = fill_fractions(0.575, 4, &[2, 2, 2, 2]);
        assert_eq!(fills.len(), 8);
        for line in 0..2 {
            assert_eq!(fraction(&fills, 0, line), 1.0);
            assert_eq!(fraction(&fills, 1, line), 1.0);
            assert_eq!(fraction(&fills, 3, line), 0.0);
        }
        assert!(approx(fraction(&fills, 2, 0), 0.6));
        assert_eq!(fraction(&fills, 2, 1), 0.0);
    }

    #[test]
    fn full_progress_fills_everything() {
        let fills = fill_fractions(1.0, 3, &[1, 2, 3]);
        assert!(fills.iter().all(|f| f.fraction == 1.0));
    }

    #[test]
    fn backward_scroll_resets_later_steps() {
        let lines = [2, 2, 2, 2];
        let ahead = fill_fractions(0.9, 4, &lines);
        assert_eq!(fraction(&ahead, 2, 1), 1.0);
        assert!(fraction(&ahead, 3, 0) > 0.0);

        let back = fill_fractions(0.4, 4, &lines);
        for line in 0..2 {
            assert_eq!(fraction(&back, 2, line), 0.0);
            assert_eq!(fraction(&back, 3, line), 0.0);
            assert_eq!(fraction(&back, 0, line), 1.0);
        }
        // 0.4 is 60% into step 1.
        assert_eq!(fraction(&back, 1, 0), 1.0);
        assert!(approx(fraction(&back, 1, 1), 0.2));
    }

    #[test]
    fn active_step_fill_is_monotonic_within_segment() {
        let mut last = vec![0.0f32; 3];
        for i in 0..=100 {
            let progress = 0.5 + 0.25 * i as f32 / 101.0;
            let fills = fill_fractions(progress, 4, &[3, 3, 3, 3]);
            for line in 0..3 {
                let now = fraction(&fills, 2, line);
                assert!(now + 1e-6 >= last[line], "line {line} went back at {progress}");
                last[line] = now;
            }
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let low = fill_fractions(-1.0, 2, &[1, 1]);
        assert_eq!(fraction(&low, 0, 0), 0.0);
        assert_eq!(fraction(&low, 1, 0), 0.0);
        let high = fill_fractions(3.0, 2, &[1, 1]);
        assert_eq!(fraction(&high, 0, 0), 1.0);
        assert_eq!(fraction(&high, 1, 0), 1.0);
    }
}
