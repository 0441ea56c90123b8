use eframe::egui;

use crate::app::{ScrollReelApp, OUTRO_TEXT};
use crate::document::outro_progress;

impl ScrollReelApp {
    /// Title card over the opening frames. Fades out as the page scrolls and
    /// stops taking clicks once it is nearly transparent.
    pub(crate) fn show_hero(&mut self, ctx: &egui::Context) {
        let Some(state) = self.player.as_ref().and_then(|p| p.fade("hero")) else {
            return;
        };
        if state.opacity <= 0.0 {
            return;
        }
        let alpha = (state.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

        let mut skip = false;
        egui::Area::new(egui::Id::new("hero"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .interactable(state.interactive)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("ScrollReel")
                            .size(48.0)
                            .strong()
                            .color(egui::Color32::from_white_alpha(alpha)),
                    );
                    ui.label(
                        egui::RichText::new("Scroll to play the sequence")
                            .size(18.0)
                            .color(egui::Color32::from_white_alpha(alpha / 4 * 3)),
                    );
                    ui.add_space(12.0);
                    let button = egui::Button::new(
                        egui::RichText::new("Skip to the end")
                            .color(egui::Color32::from_white_alpha(alpha)),
                    )
                    .fill(egui::Color32::from_black_alpha(alpha / 2));
                    if ui.add_enabled(state.interactive, button).clicked() {
                        skip = true;
                    }
                });
            });

        if skip {
            let end = self.region_end();
            self.scroll_to(end);
        }
    }

    /// Caption that types itself out while scrolling past the sequence.
    pub(crate) fn show_outro(&mut self, ctx: &egui::Context) {
        if self.player.is_none() {
            return;
        }
        let progress = outro_progress(
            self.document.position(),
            self.region_end(),
            self.viewport_height(),
        );
        if progress <= 0.0 && !self.outro.is_fully_revealed() {
            return;
        }
        let shown = self.outro.update(progress);
        let text: String = OUTRO_TEXT.chars().take(shown).collect();

        egui::Area::new(egui::Id::new("outro"))
            .anchor(egui::Align2::LEFT_BOTTOM, [48.0, -64.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(text)
                        .size(28.0)
                        .color(egui::Color32::from_gray(235)),
                );
            });
    }
}
