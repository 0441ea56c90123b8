use std::sync::Arc;

use tracing::{debug, info, warn};

use scrollreel_core::{
    event_channel, frame_for_progress, DeviceClass, EmitPolicy, EventQueue, EventSender, FadeRange,
    FadeState, PlayerConfig, RegionController, RegionPhase, ScrollRegion, Scrubber,
};

use crate::fetch::FrameFetcher;
use crate::loader::{LoadEvent, LoaderHandle};
use crate::store::FrameStore;
use crate::surface::Surface;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An overlay whose opacity follows the scroll position.
#[derive(Debug, Clone)]
pub struct FadeLayer {
    pub name: String,
    /// Top of the reference element in viewport heights.
    pub reference_vh: f64,
    pub range: FadeRange,
    pub state: FadeState,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Frame painted this tick, if the surface changed.
    pub repainted: Option<usize>,
    /// Frame the playhead currently points at.
    pub target_frame: usize,
    /// Smoothed progress in `[0, 1]`.
    pub playhead: f64,
    /// Load completions applied this tick.
    pub loads_applied: usize,
    /// Whether a resize was applied this tick.
    pub resized: bool,
    /// Scroll/resize events superseded within this tick.
    pub coalesced: usize,
}

/// Scroll-synchronised frame-sequence player.
///
/// Owns the frame store, the drawing surface, the region controller and
/// the fade layers. The host pushes scroll and resize notifications through
/// [`events`](Self::events) and calls [`tick`](Self::tick) once per display
/// refresh; all state changes happen inside `tick`.
pub struct SequencePlayer {
    config: PlayerConfig,
    store: FrameStore,
    surface: Option<Surface>,
    controller: RegionController,
    scrubber: Scrubber,
    layers: Vec<FadeLayer>,
    events: EventSender<LoadEvent>,
    queue: EventQueue<LoadEvent>,
    loader: Option<LoaderHandle>,
    device: DeviceClass,
    viewport: (u32, u32),
    scroll_y: f64,
    progress: f64,
    phase: RegionPhase,
    primed: bool,
    target_frame: usize,
    /// Frame currently on the surface; `None` after a reset.
    drawn_frame: Option<usize>,
    /// Last frame ever painted, used to refill the surface after a reset.
    last_painted: Option<usize>,
    disposed: bool,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl SequencePlayer {
    /// Validate `config`, create the surface and start loading every frame.
    ///
    /// Fails before any background work starts if the configuration is
    /// invalid or the viewport has no area.
    pub fn mount(
        config: PlayerConfig,
        fetcher: Arc<dyn FrameFetcher>,
        width: u32,
        height: u32,
    ) -> crate::Result<Self> {
        let pattern = config.validate()?;
        let surface = Surface::new(width, height)?;

        let (events, queue) = event_channel();
        let (store, loader) =
            FrameStore::initialize(&pattern, config.frame_count, fetcher, events.clone())?;

        let device = config.profiles.classify(width);
        let profile = config.profiles.profile(device);
        let region = region_for(&config, height, profile.end_multiplier);
        let controller = RegionController::new(
            region,
            EmitPolicy::FrameChange {
                frame_count: config.frame_count,
            },
        );
        let layers = config
            .fade_layers
            .iter()
            .map(|layer| FadeLayer {
                name: layer.name.clone(),
                reference_vh: layer.reference_vh,
                range: config
                    .fade
                    .range(layer.reference_vh * height as f64, height as f64),
                state: FadeState::OPAQUE,
            })
            .collect();

        info!(
            frames = config.frame_count,
            width,
            height,
            device = device.label(),
            region_end = region.end,
            "Sequence player mounted"
        );

        Ok(Self {
            scrubber: Scrubber::new(profile.scrub_seconds),
            config,
            store,
            surface: Some(surface),
            controller,
            layers,
            events,
            queue,
            loader: Some(loader),
            device,
            viewport: (width, height),
            scroll_y: 0.0,
            progress: 0.0,
            phase: RegionPhase::Before,
            primed: false,
            target_frame: 0,
            drawn_frame: None,
            last_painted: None,
            disposed: false,
        })
    }

    /// Stop listening and release the surface. Later ticks do nothing and
    /// in-flight loads are discarded.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.queue.close();
        self.surface = None;
        // The loader notices the closed queue and skips what is left.
        self.loader = None;
        self.disposed = true;
        info!("Sequence player disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Block until the loader has attempted every frame. Completions still
    /// need a [`tick`](Self::tick) to be applied.
    pub fn wait_for_loads(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.join();
        }
    }
}

impl Drop for SequencePlayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

impl SequencePlayer {
    /// Process everything queued since the last tick and repaint if needed.
    ///
    /// `dt` is the time since the previous tick in seconds; it drives the
    /// scrub smoothing.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        if self.disposed {
            return TickReport::default();
        }

        let tick = self.queue.drain();
        let mut report = TickReport {
            coalesced: tick.coalesced,
            ..TickReport::default()
        };

        for event in tick.loads {
            if self.store.apply(event) {
                report.loads_applied += 1;
            }
        }
        if let Some((width, height)) = tick.resize {
            report.resized = self.apply_resize(width, height);
        }
        if let Some(y) = tick.scroll {
            self.scroll_y = y;
        }

        // Suppression only gates the scrubber; reported progress is always live.
        self.progress = self.controller.region().progress_at(self.scroll_y);
        if let Some(update) = self.controller.update(self.scroll_y) {
            self.phase = update.phase;
            if self.primed {
                self.scrubber.set_target(update.progress);
            } else {
                self.scrubber.snap_to(update.progress);
                self.primed = true;
            }
        }

        let playhead = self.scrubber.advance(dt);
        self.target_frame = frame_for_progress(playhead, self.store.len());
        report.playhead = playhead;
        report.target_frame = self.target_frame;
        report.repainted = self.paint();

        for layer in &mut self.layers {
            layer.state = self.config.fade.state(&layer.range, self.scroll_y);
        }

        report
    }

    fn apply_resize(&mut self, width: u32, height: u32) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if let Err(e) = surface.resize(width, height) {
            warn!("Ignoring resize: {e}");
            return false;
        }
        self.viewport = (width, height);

        let device = self.config.profiles.classify(width);
        if device != self.device {
            info!(
                from = self.device.label(),
                to = device.label(),
                "Device class changed"
            );
            self.device = device;
        }
        let profile = self.config.profiles.profile(device);
        self.scrubber.set_lag(profile.scrub_seconds);
        self.controller
            .set_region(region_for(&self.config, height, profile.end_multiplier));

        let h = height as f64;
        for layer in &mut self.layers {
            layer.range = self.config.fade.range(layer.reference_vh * h, h);
        }

        self.drawn_frame = None;
        debug!(width, height, "Viewport resized");
        true
    }

    /// Paint the target frame if it is ready and not already shown. After a
    /// surface reset with the target still loading, the last painted frame
    /// is restored instead.
    fn paint(&mut self) -> Option<usize> {
        if self.drawn_frame == Some(self.target_frame) {
            return None;
        }
        let candidate = if self.store.is_ready(self.target_frame) {
            self.target_frame
        } else {
            match (self.drawn_frame, self.last_painted) {
                (None, Some(prev)) if self.store.is_ready(prev) => prev,
                _ => return None,
            }
        };

        let (Some(surface), Some(image)) = (self.surface.as_mut(), self.store.get(candidate))
        else {
            return None;
        };
        surface.draw(image);
        self.drawn_frame = Some(candidate);
        self.last_painted = Some(candidate);
        Some(candidate)
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl SequencePlayer {
    /// Producer handle for scroll and resize notifications.
    pub fn events(&self) -> EventSender<LoadEvent> {
        self.events.clone()
    }

    /// The drawing surface; `None` once disposed.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn region(&self) -> ScrollRegion {
        self.controller.region()
    }

    pub fn phase(&self) -> RegionPhase {
        self.phase
    }

    /// Unsmoothed region progress at the current scroll position.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn playhead(&self) -> f64 {
        self.scrubber.value()
    }

    /// True while the playhead is still catching up with the scroll target.
    pub fn is_scrubbing(&self) -> bool {
        !self.scrubber.is_settled()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn target_frame(&self) -> usize {
        self.target_frame
    }

    pub fn drawn_frame(&self) -> Option<usize> {
        self.drawn_frame
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn fade_layers(&self) -> &[FadeLayer] {
        &self.layers
    }

    pub fn fade(&self, name: &str) -> Option<FadeState> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.state)
    }
}

fn region_for(config: &PlayerConfig, viewport_height: u32, end_multiplier: f64) -> ScrollRegion {
    let h = viewport_height as f64;
    ScrollRegion::pinned(config.region_top_vh * h, h, end_multiplier)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::fetch::MemoryFetcher;
    use scrollreel_core::{DeviceProfiles, ScrollProfile};

    /// 2×2 PNG whose red channel encodes the sequence number.
    fn frame_png(sequence: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([sequence, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn config(frames: usize) -> PlayerConfig {
        let instant = ScrollProfile {
            end_multiplier: 10.0,
            scrub_seconds: 0.0,
        };
        PlayerConfig {
            pattern: "f{:02}.png".into(),
            frame_count: frames,
            profiles: DeviceProfiles {
                breakpoint: 768,
                compact: instant,
                full: instant,
            },
            ..PlayerConfig::default()
        }
    }

    /// Fetcher holding frames for the given 1-based sequence numbers.
    fn fetcher(sequences: impl IntoIterator<Item = usize>) -> Arc<MemoryFetcher> {
        let mut f = MemoryFetcher::new();
        for seq in sequences {
            f.insert(format!("f{seq:02}.png"), frame_png(seq as u8));
        }
        Arc::new(f)
    }

    fn mounted(frames: usize, available: impl IntoIterator<Item = usize>) -> SequencePlayer {
        // 100 px tall viewport → region of 1000 px.
        let mut p = SequencePlayer::mount(config(frames), fetcher(available), 100, 100).unwrap();
        p.wait_for_loads();
        p
    }

    /// Serves frames from memory but holds back one locator until the test
    /// meets it at the barrier.
    struct GatedFetcher {
        inner: MemoryFetcher,
        gated: String,
        gate: Arc<std::sync::Barrier>,
    }

    impl FrameFetcher for GatedFetcher {
        fn fetch(&self, locator: &str) -> crate::Result<Vec<u8>> {
            if locator == self.gated {
                self.gate.wait();
            }
            self.inner.fetch(locator)
        }
    }

    fn shown(p: &SequencePlayer) -> u8 {
        p.surface().unwrap().pixel(0, 0).unwrap()[0]
    }

    #[test]
    fn mount_rejects_invalid_config() {
        let cfg = PlayerConfig {
            pattern: "nope".into(),
            ..config(3)
        };
        assert!(SequencePlayer::mount(cfg, fetcher(Vec::new()), 100, 100).is_err());
    }

    #[test]
    fn mount_rejects_missing_surface() {
        assert!(matches!(
            SequencePlayer::mount(config(3), fetcher([1]), 0, 100),
            Err(crate::RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn first_tick_paints_first_frame() {
        let mut p = mounted(11, 1..=11);
        let report = p.tick(0.016);
        assert_eq!(report.loads_applied, 11);
        assert_eq!(report.repainted, Some(0));
        assert_eq!(shown(&p), 1);
    }

    #[test]
    fn scroll_scrubs_to_the_mapped_frame() {
        let mut p = mounted(11, 1..=11);
        p.tick(0.016);
        p.events().scroll(500.0);
        let report = p.tick(0.016);
        assert_eq!(report.target_frame, 5);
        assert_eq!(report.repainted, Some(5));
        assert_eq!(shown(&p), 6);
        assert_eq!(p.phase(), RegionPhase::Active);
    }

    #[test]
    fn redundant_scroll_does_not_repaint() {
        let mut p = mounted(11, 1..=11);
        p.events().scroll(500.0);
        p.tick(0.016);
        p.events().scroll(510.0);
        let report = p.tick(0.016);
        assert_eq!(report.repainted, None);
        assert_eq!(p.drawn_frame(), Some(5));
    }

    #[test]
    fn progress_tracks_scroll_within_a_frame() {
        let mut p = mounted(11, 1..=11);
        p.events().scroll(500.0);
        p.tick(0.016);
        p.events().scroll(540.0);
        let report = p.tick(0.016);
        assert_eq!(report.repainted, None);
        assert_eq!(p.target_frame(), 5);
        assert!((p.progress() - 0.54).abs() < 1e-12);
        assert_eq!(p.scroll_y(), 540.0);
    }

    #[test]
    fn bursts_are_coalesced_into_one_repaint() {
        let mut p = mounted(11, 1..=11);
        p.tick(0.016);
        let tx = p.events();
        for y in (0..=900).step_by(10) {
            tx.scroll(y as f64);
        }
        let report = p.tick(0.016);
        assert_eq!(report.coalesced, 90);
        assert_eq!(report.repainted, Some(9));
    }

    #[test]
    fn missing_frame_keeps_previous_on_screen() {
        // Frame 6 (index 5) is absent and fails to load.
        let mut p = mounted(11, (1..=11).filter(|&s| s != 6));
        p.events().scroll(400.0);
        p.tick(0.016);
        assert_eq!(shown(&p), 5);

        p.events().scroll(500.0);
        let report = p.tick(0.016);
        assert_eq!(report.target_frame, 5);
        assert_eq!(report.repainted, None);
        assert_eq!(shown(&p), 5);
        assert_eq!(p.store().failed_count(), 1);
    }

    #[test]
    fn unloaded_target_leaves_surface_blank() {
        let mut p = mounted(3, [1]);
        p.events().scroll(1000.0);
        let report = p.tick(0.016);
        // Target is the last frame, which never loaded.
        assert_eq!(report.target_frame, 2);
        assert_eq!(report.repainted, None);
        assert_eq!(p.drawn_frame(), None);
    }

    #[test]
    fn late_target_frame_is_painted_on_arrival() {
        let mut inner = MemoryFetcher::new();
        for seq in 1..=3usize {
            inner.insert(format!("f{seq:02}.png"), frame_png(seq as u8));
        }
        let gate = Arc::new(std::sync::Barrier::new(2));
        let fetcher = GatedFetcher {
            inner,
            gated: "f03.png".into(),
            gate: Arc::clone(&gate),
        };
        let mut p = SequencePlayer::mount(config(3), Arc::new(fetcher), 100, 100).unwrap();

        for _ in 0..5000 {
            p.tick(0.0);
            if p.store().loaded_count() == 2 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(p.store().loaded_count(), 2);
        assert_eq!(p.store().state(2), Some(crate::LoadState::Pending));

        // Scroll to the end while the last frame is still in flight.
        p.events().scroll(1000.0);
        let waiting = p.tick(0.0);
        assert_eq!(waiting.target_frame, 2);
        assert_eq!(waiting.repainted, None);
        assert_ne!(p.drawn_frame(), Some(2));

        gate.wait();
        p.wait_for_loads();
        let arrived = p.tick(0.0);
        assert_eq!(arrived.loads_applied, 1);
        assert_eq!(arrived.repainted, Some(2));
        assert_eq!(shown(&p), 3);

        // Already on screen: the next tick leaves it alone.
        assert_eq!(p.tick(0.0).repainted, None);
    }

    #[test]
    fn resize_resets_and_repaints() {
        let mut p = mounted(11, 1..=11);
        p.events().scroll(500.0);
        p.tick(0.016);

        // Doubling the height doubles the region, so 500 px is now 25%.
        p.events().resize(100, 200);
        let report = p.tick(0.016);
        assert!(report.resized);
        assert_eq!(p.region().end, 2000.0);
        assert_eq!(report.target_frame, 3);
        assert_eq!(report.repainted, Some(3));
        assert_eq!(p.surface().unwrap().height(), 200);
    }

    #[test]
    fn resize_restores_last_frame_when_target_missing() {
        let mut p = mounted(11, (1..=11).filter(|&s| s != 4));
        p.events().scroll(500.0);
        p.tick(0.016);
        assert_eq!(shown(&p), 6);

        // New target is index 3 (sequence 4), which failed; the previous
        // frame is painted back onto the cleared surface.
        p.events().resize(100, 200);
        let report = p.tick(0.016);
        assert_eq!(report.target_frame, 3);
        assert_eq!(report.repainted, Some(5));
        assert_eq!(shown(&p), 6);
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut p = mounted(3, 1..=3);
        p.events().resize(0, 0);
        let report = p.tick(0.016);
        assert!(!report.resized);
        assert_eq!(p.viewport(), (100, 100));
    }

    #[test]
    fn fade_layers_follow_scroll() {
        // Default hero layer: reference at 1.5 vh → boundary 50, distance 30.
        let mut p = mounted(3, 1..=3);
        p.tick(0.016);
        assert_eq!(p.fade("hero"), Some(FadeState::OPAQUE));

        p.events().scroll(65.0);
        p.tick(0.016);
        let half = p.fade("hero").unwrap();
        assert!((half.opacity - 0.5).abs() < 1e-9);
        assert!(half.interactive);

        p.events().scroll(90.0);
        p.tick(0.016);
        let gone = p.fade("hero").unwrap();
        assert_eq!(gone.opacity, 0.0);
        assert!(!gone.interactive);
        assert!(p.fade("missing").is_none());
    }

    #[test]
    fn compact_viewport_uses_compact_profile() {
        let cfg = PlayerConfig {
            pattern: "f{:02}.png".into(),
            frame_count: 3,
            ..PlayerConfig::default()
        };
        let mut p = SequencePlayer::mount(cfg, fetcher(1..=3), 400, 800).unwrap();
        assert_eq!(p.device_class(), DeviceClass::Compact);
        assert_eq!(p.region().end, 3200.0);

        p.events().resize(1200, 800);
        p.tick(0.016);
        assert_eq!(p.device_class(), DeviceClass::Full);
        assert_eq!(p.region().end, 4800.0);
    }

    #[test]
    fn scrub_lag_eases_toward_target() {
        let cfg = PlayerConfig {
            pattern: "f{:02}.png".into(),
            frame_count: 11,
            ..PlayerConfig::default()
        };
        let mut p = SequencePlayer::mount(cfg, fetcher(1..=11), 1000, 100).unwrap();
        p.wait_for_loads();
        p.tick(0.016);
        // Full profile: 600 px region, 0.15 s lag.
        p.events().scroll(600.0);
        let first = p.tick(1.0 / 60.0);
        assert!(first.playhead > 0.0 && first.playhead < 1.0);
        assert!(p.is_scrubbing());
        for _ in 0..120 {
            p.tick(1.0 / 60.0);
        }
        assert!(!p.is_scrubbing());
        assert_eq!(p.target_frame(), 10);
        assert_eq!(p.drawn_frame(), Some(10));
    }

    #[test]
    fn dispose_makes_ticks_inert() {
        let mut p = mounted(3, 1..=3);
        p.tick(0.016);
        let tx = p.events();
        p.dispose();
        assert!(p.is_disposed());
        assert!(p.surface().is_none());
        assert!(!tx.scroll(100.0));
        assert_eq!(p.tick(0.016), TickReport::default());
        // Idempotent.
        p.dispose();
    }
}
