use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use tracing::{error, info};

use scrollreel_core::{EventSender, TextReveal};
use scrollreel_render::{
    export_png, FrameFetcher, FsFetcher, LoadEvent, SequencePlayer, SnapshotMetadata, TickReport,
};

use crate::app_dir;
use crate::document::ScrollDocument;
use crate::preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fraction of the viewport scrolled per arrow-key press.
pub(crate) const ARROW_STEP: f64 = 0.05;
/// Fraction of the viewport scrolled per Page Up/Down.
pub(crate) const PAGE_STEP: f64 = 0.9;
pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
/// Seconds a notification stays on screen.
pub(crate) const NOTIFICATION_SECONDS: f32 = 5.0;

/// Caption revealed while scrolling past the sequence.
pub(crate) const OUTRO_TEXT: &str = "Every frame lands exactly where you left the scroll bar.";
/// Leading characters of the caption that are always shown.
const OUTRO_VISIBLE: usize = 11;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub(crate) struct ScrollReelApp {
    pub(crate) preferences: AppPreferences,
    pub(crate) player: Option<SequencePlayer>,
    pub(crate) events: Option<EventSender<LoadEvent>>,
    /// Current frame uploaded to the GPU. Replaced only when the surface changes.
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) document: ScrollDocument,
    pub(crate) panel_size: [u32; 2],
    pub(crate) show_hud: bool,
    pub(crate) last_report: TickReport,
    pub(crate) outro: TextReveal,
    /// (message, shown at, is_error)
    pub(crate) notification: Option<(String, Instant, bool)>,
    pub(crate) window_size: Option<egui::Vec2>,
}

impl ScrollReelApp {
    pub(crate) fn new(prefs: AppPreferences) -> Self {
        let panel_size = [
            prefs.window_width.max(1.0) as u32,
            prefs.window_height.max(1.0) as u32,
        ];
        let mut app = Self {
            show_hud: prefs.show_hud,
            preferences: prefs,
            player: None,
            events: None,
            texture: None,
            document: ScrollDocument::default(),
            panel_size,
            last_report: TickReport::default(),
            outro: new_outro(),
            notification: None,
            window_size: None,
        };
        if let Some(dir) = app.preferences.frame_dir() {
            app.open_sequence(dir);
        }
        app
    }

    // -- Sequence lifecycle ---------------------------------------------------

    pub(crate) fn open_sequence(&mut self, dir: PathBuf) {
        self.close_sequence();

        let fetcher: Arc<dyn FrameFetcher> = Arc::new(FsFetcher::new(&dir));
        let [width, height] = self.panel_size;
        match SequencePlayer::mount(self.preferences.player.clone(), fetcher, width, height) {
            Ok(player) => {
                info!(
                    "Opened {} frames from {}",
                    player.store().len(),
                    dir.display()
                );
                self.events = Some(player.events());
                self.player = Some(player);
                self.preferences.frame_dir = dir.to_string_lossy().into_owned();
                self.document = ScrollDocument::default();
                self.outro = new_outro();
            }
            Err(e) => {
                error!("Failed to open frame sequence in {}: {e}", dir.display());
                self.notify(format!("Could not open sequence: {e}"), true);
            }
        }
    }

    pub(crate) fn close_sequence(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.dispose();
        }
        self.events = None;
        self.texture = None;
        self.last_report = TickReport::default();
    }

    pub(crate) fn pick_folder(&mut self) {
        let mut dialog = rfd::FileDialog::new();
        if let Some(current) = self.preferences.frame_dir() {
            if current.is_dir() {
                dialog = dialog.set_directory(current);
            }
        }
        if let Some(folder) = dialog.pick_folder() {
            self.open_sequence(folder);
        }
    }

    // -- Per-frame driving ----------------------------------------------------

    pub(crate) fn check_resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 && [width, height] != self.panel_size {
            self.panel_size = [width, height];
            if let Some(events) = &self.events {
                events.resize(width, height);
            }
        }
    }

    /// Advance the player by one UI frame and refresh the texture if the
    /// surface changed.
    pub(crate) fn tick_player(&mut self, ctx: &egui::Context) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let dt = ctx.input(|i| i.stable_dt) as f64;
        let report = player.tick(dt);

        if report.repainted.is_some() || report.resized {
            if let Some(surface) = player.surface() {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [surface.width() as usize, surface.height() as usize],
                    surface.pixels(),
                );
                match self.texture.as_mut() {
                    Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR));
                    }
                }
            }
        }
        self.last_report = report;

        // The region may have changed size; keep the position reachable.
        let max = self.max_scroll();
        if self.document.scroll_by(0.0, max) {
            self.push_scroll();
        }
    }

    /// Whether another UI frame is needed without further input.
    pub(crate) fn is_animating(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|p| p.is_scrubbing() || p.store().pending_count() > 0)
    }

    // -- Scrolling ------------------------------------------------------------

    pub(crate) fn viewport_height(&self) -> f64 {
        self.panel_size[1] as f64
    }

    pub(crate) fn region_end(&self) -> f64 {
        self.player.as_ref().map_or(0.0, |p| p.region().end)
    }

    pub(crate) fn max_scroll(&self) -> f64 {
        ScrollDocument::max_position(
            self.region_end(),
            self.viewport_height(),
            self.preferences.trailing_pages,
        )
    }

    pub(crate) fn scroll_by(&mut self, delta: f64) {
        let max = self.max_scroll();
        if self.document.scroll_by(delta, max) {
            self.push_scroll();
        }
    }

    pub(crate) fn scroll_to(&mut self, target: f64) {
        let max = self.max_scroll();
        if self.document.scroll_to(target, max) {
            self.push_scroll();
        }
    }

    fn push_scroll(&self) {
        if let Some(events) = &self.events {
            events.scroll(self.document.position());
        }
    }

    // -- Snapshot -------------------------------------------------------------

    pub(crate) fn save_snapshot(&mut self) {
        if self.player.is_none() {
            return;
        }
        match self.write_snapshot() {
            Ok(path) => {
                info!("Snapshot saved: {}", path.display());
                let short = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.notify(format!("Exported: {short}"), false);
            }
            Err(msg) => {
                error!("Snapshot failed: {msg}");
                self.notify(format!("Export failed: {msg}"), true);
            }
        }
    }

    fn write_snapshot(&self) -> Result<PathBuf, String> {
        let player = self.player.as_ref().ok_or("no sequence open")?;
        let (Some(surface), Some(frame)) = (player.surface(), player.drawn_frame()) else {
            return Err("nothing on screen yet".to_string());
        };

        let out_dir = app_dir::snapshots_directory();
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| format!("failed to create {}: {e}", out_dir.display()))?;
        let path = unique_path(&out_dir, &format!("frame_{:04}", frame + 1), "png");
        let metadata = SnapshotMetadata {
            frame_index: frame,
            frame_count: player.store().len(),
            progress: player.progress(),
            scroll_y: player.scroll_y(),
            locator: player.store().slot(frame).map(|s| s.locator.clone()),
        };
        export_png(surface, &path, &metadata).map_err(|e| e.to_string())?;
        Ok(path)
    }

    pub(crate) fn notify(&mut self, message: String, is_error: bool) {
        self.notification = Some((message, Instant::now(), is_error));
    }
}

impl eframe::App for ScrollReelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.window_size = Some(rect.size());
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                self.check_resize(available.x.max(1.0) as u32, available.y.max(1.0) as u32);

                let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
                self.handle_scroll_input(ctx, &response);
                self.tick_player(ctx);

                if let Some(ref tex) = self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }
                self.paint_load_bar(&painter, response.rect);

                if self.player.is_none() {
                    painter.text(
                        response.rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Open a folder of frames (O)",
                        egui::FontId::proportional(20.0),
                        egui::Color32::from_gray(160),
                    );
                }
            });

        self.handle_keyboard(ctx);

        // Overlays.
        self.show_hero(ctx);
        self.show_outro(ctx);
        self.show_hud(ctx);
        self.show_toolbar(ctx);
        self.show_notification(ctx);

        if self.is_animating() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(size) = self.window_size {
            self.preferences.window_width = size.x;
            self.preferences.window_height = size.y;
        }
        self.preferences.show_hud = self.show_hud;
        self.close_sequence();
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

fn new_outro() -> TextReveal {
    TextReveal::new(OUTRO_VISIBLE, OUTRO_TEXT.chars().count())
}

fn unique_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let base = dir.join(format!("{name}.{ext}"));
    if !base.exists() {
        return base;
    }
    for i in 1..10000 {
        let candidate = dir.join(format!("{name}_{i:03}.{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }
    dir.join(format!("{name}_export.{ext}"))
}
