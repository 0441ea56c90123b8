//! Page-level scroll helpers: which full-height section is on screen, and
//! how much of a progressively revealed caption is visible.

/// Reveal starts only after this much region progress.
const REVEAL_BUFFER: f64 = 0.1;

/// Index of the viewport-height section at the top of the screen.
pub fn section_index(scroll_y: f64, viewport_height: f64) -> usize {
    if viewport_height.is_nan() || viewport_height <= 0.0 || scroll_y.is_nan() || scroll_y <= 0.0 {
        return 0;
    }
    let index = (scroll_y / viewport_height).floor();
    if index.is_finite() {
        index as usize
    } else {
        0
    }
}

/// Character-by-character caption reveal driven by scroll progress.
///
/// The first `visible` characters are always shown. The rest appear as
/// progress moves from 10% to 100%; once progress reaches 1 the caption
/// stays fully revealed even when scrolling back.
#[derive(Debug, Clone)]
pub struct TextReveal {
    visible: usize,
    total: usize,
    latched: bool,
}

impl TextReveal {
    pub fn new(visible: usize, total: usize) -> Self {
        Self {
            visible: visible.min(total),
            total,
            latched: false,
        }
    }

    /// Number of characters to show at `progress`.
    pub fn update(&mut self, progress: f64) -> usize {
        if self.latched {
            return self.total;
        }
        if !progress.is_finite() || progress <= REVEAL_BUFFER {
            return self.visible;
        }
        if progress >= 1.0 {
            self.latched = true;
            return self.total;
        }
        let hidden = self.total - self.visible;
        let adjusted = ((progress - REVEAL_BUFFER) / (1.0 - REVEAL_BUFFER)).max(0.0);
        let extra = (adjusted * hidden as f64).floor() as usize;
        (self.visible + extra).min(self.total)
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_boundaries() {
        assert_eq!(section_index(0.0, 800.0), 0);
        assert_eq!(section_index(799.9, 800.0), 0);
        assert_eq!(section_index(800.0, 800.0), 1);
        assert_eq!(section_index(4000.0, 800.0), 5);
    }

    #[test]
    fn section_guards() {
        assert_eq!(section_index(-50.0, 800.0), 0);
        assert_eq!(section_index(500.0, 0.0), 0);
        assert_eq!(section_index(f64::NAN, 800.0), 0);
    }

    #[test]
    fn reveal_holds_visible_portion_until_buffer() {
        let mut r = TextReveal::new(5, 25);
        assert_eq!(r.update(0.0), 5);
        assert_eq!(r.update(0.1), 5);
    }

    #[test]
    fn reveal_progresses_linearly() {
        let mut r = TextReveal::new(5, 25);
        // (0.55 - 0.1) / 0.9 = 0.5 → 10 of 20 hidden characters.
        assert_eq!(r.update(0.55), 15);
        assert!(!r.is_fully_revealed());
    }

    #[test]
    fn reveal_latches_at_completion() {
        let mut r = TextReveal::new(2, 10);
        assert_eq!(r.update(1.0), 10);
        assert!(r.is_fully_revealed());
        assert_eq!(r.update(0.0), 10);
    }

    #[test]
    fn visible_is_capped_by_total() {
        let mut r = TextReveal::new(50, 10);
        assert_eq!(r.update(0.0), 10);
    }
}
