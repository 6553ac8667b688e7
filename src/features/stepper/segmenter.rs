//! Maps global scroll progress onto one of N equal-width step segments.

/// Clamps provider output into `[0, 1]`; NaN counts as the start.
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Width of one step's slice of the scroll range.
pub fn segment_size(total_steps: usize) -> f32 {
    assert!(total_steps > 0, "segment_size needs at least one step");
    1.0 / total_steps as f32
}

/// Index of the step whose segment contains `progress`.
///
/// Progress exactly at 1.0 (or float overshoot past it) resolves to the last
/// step, never to `total_steps`.
pub fn active_index(progress: f32, total_steps: usize) -> usize {
    let segment = segment_size(total_steps);
    let raw = (clamp_progress(progress) / segment).floor();
    (raw as usize).min(total_steps - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn four_step_examples() {
        assert_eq!(active_index(0.0, 4), 0);
        assert_eq!(active_index(0.24, 4), 0);
        assert_eq!(active_index(0.25, 4), 1);
        assert_eq!(active_index(0.99, 4), 3);
        assert_eq!(active_index(1.0, 4), 3);
    }

    #[test]
    fn endpoints_for_any_count() {
        for n in 1..=32 {
            assert_eq!(active_index(0.0, n), 0);
            assert_eq!(active_index(1.0, n), n - 1);
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(active_index(-0.5, 4), 0);
        assert_eq!(active_index(1.0001, 4), 3);
        assert_eq!(active_index(f32::NAN, 4), 0);
        assert_eq!(active_index(f32::INFINITY, 4), 3);
    }

    #[test]
    fn single_step_is_always_active() {
        assert_eq!(active_index(0.0, 1), 0);
        assert_eq!(active_index(0.7, 1), 0);
        assert_eq!(active_index(1.0, 1), 0);
    }

    #[test]
    fn sampled_progress_stays_in_range_and_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let n = rng.gen_range(1..=20);
            let a: f32 = rng.gen_range(0.0..=1.0);
            let b: f32 = rng.gen_range(0.0..=1.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (i_lo, i_hi) = (active_index(lo, n), active_index(hi, n));
            assert!(i_hi < n);
            assert!(i_lo <= i_hi, "n={n} {lo}->{i_lo} {hi}->{i_hi}");
        }
    }

    #[test]
    #[should_panic]
    fn zero_steps_is_a_programming_error() {
        active_index(0.5, 0);
    }
}
