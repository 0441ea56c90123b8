use eframe::egui;

use crate::app::{ScrollReelApp, ARROW_STEP, PAGE_STEP};

impl ScrollReelApp {
    /// Mouse wheel over the canvas moves the virtual page.
    pub(crate) fn handle_scroll_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let wheel = ctx.input(|i| i.raw_scroll_delta.y) as f64;
        if wheel.abs() > 0.0 && response.hovered() {
            // Wheel up yields a positive delta; the page moves toward the top.
            self.scroll_by(-wheel * self.preferences.wheel_speed);
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let vh = self.viewport_height();
        let mut delta = 0.0;
        let mut jump = None;
        let mut open_folder = false;
        let mut snapshot = false;

        ctx.input(|input| {
            if input.key_pressed(egui::Key::ArrowDown) {
                delta += vh * ARROW_STEP;
            }
            if input.key_pressed(egui::Key::ArrowUp) {
                delta -= vh * ARROW_STEP;
            }
            if input.key_pressed(egui::Key::PageDown)
                || (input.key_pressed(egui::Key::Space) && !input.modifiers.shift)
            {
                delta += vh * PAGE_STEP;
            }
            if input.key_pressed(egui::Key::PageUp)
                || (input.key_pressed(egui::Key::Space) && input.modifiers.shift)
            {
                delta -= vh * PAGE_STEP;
            }
            if input.key_pressed(egui::Key::Home) {
                jump = Some(0.0);
            }
            if input.key_pressed(egui::Key::End) {
                jump = Some(f64::INFINITY);
            }
            if input.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
            }
            if input.key_pressed(egui::Key::O) {
                open_folder = true;
            }
            if input.key_pressed(egui::Key::S) && !input.modifiers.ctrl {
                snapshot = true;
            }
        });

        if let Some(target) = jump {
            self.scroll_to(target);
        }
        if delta != 0.0 {
            self.scroll_by(delta);
        }
        if snapshot {
            self.save_snapshot();
        }
        // Blocks until the dialog closes, so it runs last.
        if open_folder {
            self.pick_folder();
        }
    }
}
