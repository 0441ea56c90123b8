use eframe::egui;

use scrollreel_core::{section_index, RegionPhase};

use crate::app::{ScrollReelApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl ScrollReelApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }
        let Some(player) = self.player.as_ref() else {
            return;
        };

        let hud_alpha =
            (self.preferences.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let report = self.last_report;

        // -- Top-left: playback --
        egui::Area::new(egui::Id::new("hud_playback"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        let frames = player.store().len();
                        ui.label(format!("Frame: {} / {frames}", report.target_frame + 1));
                        match player.drawn_frame() {
                            Some(shown) if shown != report.target_frame => {
                                ui.colored_label(
                                    egui::Color32::from_rgb(255, 180, 50),
                                    format!("Showing: {} (target not loaded)", shown + 1),
                                );
                            }
                            None => {
                                ui.label("Showing: none");
                            }
                            _ => {}
                        }
                        ui.label(format!("Progress: {:.1}%", player.progress() * 100.0));
                        ui.label(format!("Playhead: {:.1}%", report.playhead * 100.0));

                        let phase_color = match player.phase() {
                            RegionPhase::Before => egui::Color32::GRAY,
                            RegionPhase::Active => egui::Color32::from_rgb(80, 200, 255),
                            RegionPhase::After => egui::Color32::from_rgb(100, 220, 100),
                        };
                        ui.colored_label(phase_color, format!("Phase: {}", player.phase().label()));

                        let vh = self.viewport_height();
                        ui.label(format!(
                            "Scroll: {:.0} px (section {})",
                            self.document.position(),
                            section_index(self.document.position(), vh)
                        ));
                        let (w, h) = player.viewport();
                        ui.label(format!(
                            "Viewport: {w}\u{00d7}{h} ({})",
                            player.device_class().label()
                        ));
                    });
            });

        // -- Bottom-centre: loading stats --
        egui::Area::new(egui::Id::new("hud_loading"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        let store = player.store();
                        ui.label(format!(
                            "Loaded {} / {}  failed {}",
                            store.loaded_count(),
                            store.len(),
                            store.failed_count()
                        ));
                        if report.coalesced > 0 {
                            ui.small(format!("{} events coalesced", report.coalesced));
                        }
                    });
            });
    }

    /// Thin bar along the bottom edge while frames are still loading.
    pub(crate) fn paint_load_bar(&self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let store = player.store();
        if store.pending_count() == 0 || store.is_empty() {
            return;
        }
        let done = store.len() - store.pending_count();
        let frac = (done as f32 / store.len() as f32).clamp(0.0, 1.0);
        let bar_h = 3.0;
        let bar_y = rect.max.y - bar_h;

        let bg_rect =
            egui::Rect::from_min_size(egui::pos2(rect.min.x, bar_y), egui::vec2(rect.width(), bar_h));
        painter.rect_filled(bg_rect, 0.0, egui::Color32::from_rgba_premultiplied(0, 0, 0, 120));
        if frac > 0.0 {
            let fill_rect = egui::Rect::from_min_size(
                egui::pos2(rect.min.x, bar_y),
                egui::vec2(rect.width() * frac, bar_h),
            );
            painter.rect_filled(fill_rect, 0.0, egui::Color32::from_rgb(80, 200, 255));
        }
    }
}
