//! Scroll-driven cross-fades for overlay layers.
//!
//! An overlay is fully opaque until the scroll position reaches a boundary,
//! then fades linearly to transparent over a fixed distance. Below the
//! interactivity threshold the overlay must stop taking pointer input so it
//! cannot swallow clicks meant for the content underneath.

use serde::{Deserialize, Serialize};

/// Fraction of one viewport height over which a fade completes.
pub const DEFAULT_FADE_FRACTION: f64 = 0.3;
/// Minimum opacity at which an overlay still accepts pointer input.
pub const DEFAULT_INTERACTIVE_THRESHOLD: f64 = 0.1;

/// Linear fade window in scroll units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRange {
    /// Scroll position at which the fade starts (opacity 1 at or before it).
    pub boundary: f64,
    /// Scroll distance over which opacity drops from 1 to 0.
    pub distance: f64,
}

impl FadeRange {
    pub fn new(boundary: f64, distance: f64) -> Self {
        Self { boundary, distance }
    }

    /// Fade that starts when the reference element's top edge enters the
    /// bottom of the viewport.
    pub fn from_layout(reference_top: f64, viewport_height: f64, fade_fraction: f64) -> Self {
        Self {
            boundary: reference_top - viewport_height,
            distance: viewport_height * fade_fraction,
        }
    }

    /// Fade progress in `[0, 1]`; a non-positive distance is a hard step.
    pub fn progress_at(&self, scroll_y: f64) -> f64 {
        if scroll_y.is_nan() {
            return 0.0;
        }
        if self.distance <= 0.0 || !self.distance.is_finite() {
            return if scroll_y > self.boundary { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.boundary) / self.distance).clamp(0.0, 1.0)
    }

    pub fn opacity_at(&self, scroll_y: f64) -> f64 {
        1.0 - self.progress_at(scroll_y)
    }
}

/// Opacity plus the derived "accepts pointer input" flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeState {
    pub opacity: f64,
    pub interactive: bool,
}

impl FadeState {
    pub const OPAQUE: Self = Self {
        opacity: 1.0,
        interactive: true,
    };
}

/// Cross-fade tuning shared by every overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossFade {
    #[serde(default = "default_fade_fraction")]
    pub fade_fraction: f64,
    #[serde(default = "default_interactive_threshold")]
    pub interactive_threshold: f64,
}

fn default_fade_fraction() -> f64 {
    DEFAULT_FADE_FRACTION
}
fn default_interactive_threshold() -> f64 {
    DEFAULT_INTERACTIVE_THRESHOLD
}

impl Default for CrossFade {
    fn default() -> Self {
        Self {
            fade_fraction: DEFAULT_FADE_FRACTION,
            interactive_threshold: DEFAULT_INTERACTIVE_THRESHOLD,
        }
    }
}

impl CrossFade {
    /// Fade window for a reference element at `reference_top`.
    pub fn range(&self, reference_top: f64, viewport_height: f64) -> FadeRange {
        FadeRange::from_layout(reference_top, viewport_height, self.fade_fraction)
    }

    /// Evaluate a fade window at a scroll position.
    pub fn state(&self, range: &FadeRange, scroll_y: f64) -> FadeState {
        let opacity = range.opacity_at(scroll_y);
        FadeState {
            opacity,
            interactive: opacity >= self.interactive_threshold,
        }
    }
}
