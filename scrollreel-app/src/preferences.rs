use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use scrollreel_core::PlayerConfig;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Folder holding the frame images. Empty until one is picked.
    #[serde(default)]
    pub frame_dir: String,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// Scrollable document height after the pinned region, in viewport heights.
    #[serde(default = "default_trailing_pages")]
    pub trailing_pages: f64,
    /// Pixels scrolled per wheel unit.
    #[serde(default = "default_wheel_speed")]
    pub wheel_speed: f64,
    /// HUD panel background opacity 0.0..=1.0.
    #[serde(default = "default_hud_panel_opacity")]
    pub hud_panel_opacity: f32,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_true() -> bool {
    true
}
fn default_trailing_pages() -> f64 {
    3.0
}
fn default_wheel_speed() -> f64 {
    1.0
}
fn default_hud_panel_opacity() -> f32 {
    0.65
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            frame_dir: String::new(),
            player: PlayerConfig::default(),
            show_hud: true,
            trailing_pages: default_trailing_pages(),
            wheel_speed: default_wheel_speed(),
            hud_panel_opacity: default_hud_panel_opacity(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut prefs: Self = serde_json::from_str(json)?;
        prefs.trailing_pages = prefs.trailing_pages.max(0.0);
        prefs.hud_panel_opacity = prefs.hud_panel_opacity.clamp(0.0, 1.0);
        Ok(prefs)
    }

    /// The frame folder, if one has been chosen.
    pub fn frame_dir(&self) -> Option<PathBuf> {
        let trimmed = self.frame_dir.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
