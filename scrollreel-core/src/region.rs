use tracing::trace;

use crate::mapper::frame_for_progress;

/// A pinned scroll region, in host scroll units (pixels from the top of the
/// document).
///
/// While the scroll position is between `start` and `end` the region is
/// pinned to the viewport and its progress runs linearly from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRegion {
    /// Scroll offset at which pinning begins.
    pub start: f64,
    /// Scroll offset at which pinning ends.
    pub end: f64,
}

/// Where the scroll position sits relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPhase {
    /// Above the region; progress pinned at 0, not yet pinned.
    Before,
    /// Inside the region; visually pinned, progress advancing.
    Active,
    /// Past the region; progress pinned at 1, released.
    After,
}

impl RegionPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Before => "Before",
            Self::Active => "Pinned",
            Self::After => "After",
        }
    }
}

impl ScrollRegion {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Region that starts when `top` reaches the top of the viewport and
    /// stays pinned for `end_multiplier` viewport heights of scrolling.
    pub fn pinned(top: f64, viewport_height: f64, end_multiplier: f64) -> Self {
        Self {
            start: top,
            end: top + viewport_height * end_multiplier,
        }
    }

    /// `end > start` and both finite. Anything else degrades to a step.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end > self.start
    }

    /// Scroll distance covered by the region (0 for malformed regions).
    pub fn length(&self) -> f64 {
        if self.is_well_formed() {
            self.end - self.start
        } else {
            0.0
        }
    }

    /// Progress in `[0, 1]` for a scroll position.
    pub fn progress_at(&self, position: f64) -> f64 {
        if position.is_nan() {
            return 0.0;
        }
        if !self.is_well_formed() {
            return if position >= self.start { 1.0 } else { 0.0 };
        }
        ((position - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    pub fn phase_at(&self, position: f64) -> RegionPhase {
        if position.is_nan() || position < self.start {
            RegionPhase::Before
        } else if self.is_well_formed() && position <= self.end {
            RegionPhase::Active
        } else {
            RegionPhase::After
        }
    }
}

/// When a controller should notify its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Emit only when the rounded target frame would change.
    FrameChange { frame_count: usize },
    /// Emit whenever the progress value changes at all.
    EveryChange,
}

/// A progress notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionUpdate {
    pub position: f64,
    pub progress: f64,
    pub phase: RegionPhase,
}

#[derive(Debug, Clone, Copy)]
struct Emitted {
    progress: f64,
    phase: RegionPhase,
    frame: usize,
}

/// Tracks progress through a [`ScrollRegion`] and suppresses redundant
/// notifications.
#[derive(Debug, Clone)]
pub struct RegionController {
    region: ScrollRegion,
    policy: EmitPolicy,
    last: Option<Emitted>,
}

impl RegionController {
    pub fn new(region: ScrollRegion, policy: EmitPolicy) -> Self {
        Self {
            region,
            policy,
            last: None,
        }
    }

    pub fn region(&self) -> ScrollRegion {
        self.region
    }

    pub fn policy(&self) -> EmitPolicy {
        self.policy
    }

    /// Replace the region offsets (e.g. after a viewport resize).
    ///
    /// Progress may jump discontinuously; the next `update` always emits.
    pub fn set_region(&mut self, region: ScrollRegion) {
        self.region = region;
        self.last = None;
    }

    /// Forget the last emission so the next `update` notifies.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Progress of the last emitted update, if any.
    pub fn last_progress(&self) -> Option<f64> {
        self.last.map(|e| e.progress)
    }

    /// Feed a new scroll position. Returns `Some` only when the consumer
    /// needs to react.
    pub fn update(&mut self, position: f64) -> Option<RegionUpdate> {
        let progress = self.region.progress_at(position);
        let phase = self.region.phase_at(position);
        let frame = match self.policy {
            EmitPolicy::FrameChange { frame_count } => frame_for_progress(progress, frame_count),
            EmitPolicy::EveryChange => 0,
        };

        let changed = match self.last {
            None => true,
            Some(last) if last.phase != phase => true,
            Some(last) => match self.policy {
                EmitPolicy::FrameChange { .. } => last.frame != frame,
                EmitPolicy::EveryChange => last.progress != progress,
            },
        };
        if !changed {
            return None;
        }

        trace!(position, progress, phase = phase.label(), "Region progress changed");
        self.last = Some(Emitted {
            progress,
            phase,
            frame,
        });
        Some(RegionUpdate {
            position,
            progress,
            phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn progress_is_linear_inside_region() {
        let r = ScrollRegion::new(100.0, 300.0);
        assert!((r.progress_at(100.0)).abs() < EPSILON);
        assert!((r.progress_at(200.0) - 0.5).abs() < EPSILON);
        assert!((r.progress_at(300.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn progress_is_clamped_outside_region() {
        let r = ScrollRegion::new(100.0, 300.0);
        assert_eq!(r.progress_at(-50.0), 0.0);
        assert_eq!(r.progress_at(10_000.0), 1.0);
        assert_eq!(r.progress_at(f64::NAN), 0.0);
    }

    #[test]
    fn phases() {
        let r = ScrollRegion::new(100.0, 300.0);
        assert_eq!(r.phase_at(50.0), RegionPhase::Before);
        assert_eq!(r.phase_at(100.0), RegionPhase::Active);
        assert_eq!(r.phase_at(300.0), RegionPhase::Active);
        assert_eq!(r.phase_at(300.5), RegionPhase::After);
    }

    #[test]
    fn pinned_uses_viewport_multiplier() {
        let r = ScrollRegion::pinned(0.0, 800.0, 6.0);
        assert_eq!(r.start, 0.0);
        assert_eq!(r.end, 4800.0);
        assert_eq!(r.length(), 4800.0);
    }

    #[test]
    fn malformed_region_degrades_to_step() {
        let r = ScrollRegion::new(500.0, 500.0);
        assert!(!r.is_well_formed());
        assert_eq!(r.progress_at(499.0), 0.0);
        assert_eq!(r.progress_at(500.0), 1.0);
        assert_eq!(r.phase_at(499.0), RegionPhase::Before);
        assert_eq!(r.phase_at(500.0), RegionPhase::After);

        let inverted = ScrollRegion::new(800.0, 200.0);
        assert_eq!(inverted.progress_at(900.0), 1.0);
        assert_eq!(inverted.length(), 0.0);
    }

    #[test]
    fn frame_policy_suppresses_sub_frame_motion() {
        // 1000 px region, 11 frames → one frame every 100 px.
        let mut c = RegionController::new(
            ScrollRegion::new(0.0, 1000.0),
            EmitPolicy::FrameChange { frame_count: 11 },
        );
        assert!(c.update(0.0).is_some());
        assert!(c.update(10.0).is_none());
        assert!(c.update(40.0).is_none());
        let u = c.update(60.0).expect("frame 1 reached");
        assert!((u.progress - 0.06).abs() < EPSILON);
        assert!(c.update(61.0).is_none());
    }

    #[test]
    fn every_change_policy_emits_on_any_progress_change() {
        let mut c = RegionController::new(ScrollRegion::new(0.0, 1000.0), EmitPolicy::EveryChange);
        assert!(c.update(0.0).is_some());
        assert!(c.update(0.0).is_none());
        assert!(c.update(0.5).is_some());
        // Beyond the end progress stays at 1, but the phase flip emits once.
        assert!(c.update(1000.0).is_some());
        assert!(c.update(1200.0).is_some());
        assert!(c.update(1300.0).is_none());
    }

    #[test]
    fn phase_transition_always_emits() {
        let mut c = RegionController::new(
            ScrollRegion::new(100.0, 1100.0),
            EmitPolicy::FrameChange { frame_count: 2 },
        );
        let u = c.update(0.0).unwrap();
        assert_eq!(u.phase, RegionPhase::Before);
        let u = c.update(100.0).expect("entering the region emits");
        assert_eq!(u.phase, RegionPhase::Active);
        assert_eq!(u.progress, 0.0);
    }

    #[test]
    fn set_region_forces_next_emission() {
        let mut c = RegionController::new(
            ScrollRegion::new(0.0, 1000.0),
            EmitPolicy::FrameChange { frame_count: 300 },
        );
        c.update(500.0);
        assert!(c.update(500.0).is_none());
        c.set_region(ScrollRegion::new(0.0, 2000.0));
        let u = c.update(500.0).expect("resize forces emission");
        assert!((u.progress - 0.25).abs() < EPSILON);
    }
}
