//! Virtual scroll position over the page that hosts the sequence: the pinned
//! region followed by a few trailing viewport heights.

/// Scroll position clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ScrollDocument {
    position: f64,
}

impl ScrollDocument {
    pub(crate) fn position(&self) -> f64 {
        self.position
    }

    /// Largest reachable position for a region ending at `region_end`.
    pub(crate) fn max_position(region_end: f64, viewport_height: f64, trailing_pages: f64) -> f64 {
        let max = region_end + viewport_height * trailing_pages.max(0.0);
        if max.is_finite() {
            max.max(0.0)
        } else {
            0.0
        }
    }

    /// Move by `delta` pixels. Returns whether the position changed.
    pub(crate) fn scroll_by(&mut self, delta: f64, max: f64) -> bool {
        self.scroll_to(self.position + delta, max)
    }

    /// Jump to `target`, clamped. Returns whether the position changed.
    pub(crate) fn scroll_to(&mut self, target: f64, max: f64) -> bool {
        if target.is_nan() {
            return false;
        }
        let next = target.clamp(0.0, max.max(0.0));
        let changed = next != self.position;
        self.position = next;
        changed
    }
}

/// How far past the region the page has scrolled, in viewport heights,
/// clamped to `[0, 1]`.
pub(crate) fn outro_progress(position: f64, region_end: f64, viewport_height: f64) -> f64 {
    if viewport_height <= 0.0 {
        return 0.0;
    }
    let p = (position - region_end) / viewport_height;
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
