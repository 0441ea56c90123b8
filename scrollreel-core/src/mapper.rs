//! Scroll progress → frame index.

/// Map a normalised progress value to a discrete frame index.
///
/// `round(clamp(progress, 0, 1) × (frame_count − 1))`. Snapping to the
/// nearest integer means every painted frame is one of the source images,
/// never a blend. Non-finite progress maps to frame 0.
#[inline]
pub fn frame_for_progress(progress: f64, frame_count: usize) -> usize {
    if frame_count <= 1 || !progress.is_finite() {
        return 0;
    }
    let last = (frame_count - 1) as f64;
    let frame = (progress.clamp(0.0, 1.0) * last).round() as usize;
    frame.min(frame_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        for n in 2..50 {
            assert_eq!(frame_for_progress(0.0, n), 0);
            assert_eq!(frame_for_progress(1.0, n), n - 1);
        }
    }

    #[test]
    fn midpoint_of_three_hundred() {
        // round(0.5 × 299) = round(149.5) = 150
        assert_eq!(frame_for_progress(0.5, 300), 150);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(frame_for_progress(-0.25, 300), 0);
        assert_eq!(frame_for_progress(7.0, 300), 299);
        assert_eq!(frame_for_progress(f64::NAN, 300), 0);
    }

    #[test]
    fn degenerate_counts() {
        assert_eq!(frame_for_progress(0.7, 0), 0);
        assert_eq!(frame_for_progress(0.7, 1), 0);
    }

    #[test]
    fn monotonic_and_bounded() {
        for n in [1usize, 2, 3, 17, 300] {
            let mut prev = 0;
            for step in 0..=1000 {
                let p = step as f64 / 1000.0;
                let f = frame_for_progress(p, n);
                assert!(f >= prev, "frame decreased at p={p}, n={n}");
                assert!(f < n.max(1));
                prev = f;
            }
        }
    }
}
