use eframe::egui;

use crate::app::{ScrollReelApp, HUD_CORNER_RADIUS, HUD_MARGIN, NOTIFICATION_SECONDS};

impl ScrollReelApp {
    pub(crate) fn show_toolbar(&mut self, ctx: &egui::Context) {
        let hud_alpha =
            (self.preferences.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut open = false;
        let mut snapshot = false;

        egui::Area::new(egui::Id::new("toolbar"))
            .anchor(egui::Align2::RIGHT_TOP, [-HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(6))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui
                                .button("Open folder\u{2026}")
                                .on_hover_text("Pick a folder of frames (O)")
                                .clicked()
                            {
                                open = true;
                            }
                            let can_export = self
                                .player
                                .as_ref()
                                .is_some_and(|p| p.drawn_frame().is_some());
                            if ui
                                .add_enabled(can_export, egui::Button::new("Snapshot"))
                                .on_hover_text("Save the current frame as PNG (S)")
                                .clicked()
                            {
                                snapshot = true;
                            }
                            ui.toggle_value(&mut self.show_hud, "HUD")
                                .on_hover_text("Toggle the HUD (H)");
                        });
                    });
            });

        if snapshot {
            self.save_snapshot();
        }
        if open {
            self.pick_folder();
        }
    }

    pub(crate) fn show_notification(&mut self, ctx: &egui::Context) {
        let Some((msg, at, is_error)) = self.notification.as_ref() else {
            return;
        };
        let elapsed = at.elapsed().as_secs_f32();
        if elapsed > NOTIFICATION_SECONDS {
            self.notification = None;
            return;
        }
        let alpha = (NOTIFICATION_SECONDS - elapsed).clamp(0.0, 1.0);
        let color = if *is_error {
            egui::Color32::from_rgba_unmultiplied(255, 100, 100, (alpha * 255.0) as u8)
        } else {
            egui::Color32::from_rgba_unmultiplied(100, 255, 140, (alpha * 255.0) as u8)
        };
        let text = msg.clone();
        egui::Area::new(egui::Id::new("notification"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -56.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(egui::Color32::from_black_alpha((alpha * 200.0) as u8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(text).color(color));
                    });
            });
        ctx.request_repaint();
    }
}
