use serde::{Deserialize, Serialize};

use crate::device::DeviceProfiles;
use crate::error::CoreError;
use crate::fade::CrossFade;
use crate::pattern::FramePattern;

/// An overlay that fades out as a reference element scrolls into view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadeLayerConfig {
    pub name: String,
    /// Top of the reference element, in viewport heights from the document
    /// top. Scales with the viewport on resize.
    pub reference_vh: f64,
}

/// Everything needed to mount a sequence player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Locator pattern, see [`FramePattern`].
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    /// Offset of the pinned region's top edge, in viewport heights.
    #[serde(default)]
    pub region_top_vh: f64,
    #[serde(default)]
    pub fade: CrossFade,
    #[serde(default = "default_fade_layers")]
    pub fade_layers: Vec<FadeLayerConfig>,
    #[serde(default)]
    pub profiles: DeviceProfiles,
}

fn default_pattern() -> String {
    "male{:04}.png".to_string()
}
fn default_frame_count() -> usize {
    300
}
fn default_fade_layers() -> Vec<FadeLayerConfig> {
    vec![FadeLayerConfig {
        name: "hero".to_string(),
        reference_vh: 1.5,
    }]
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            frame_count: default_frame_count(),
            region_top_vh: 0.0,
            fade: CrossFade::default(),
            fade_layers: default_fade_layers(),
            profiles: DeviceProfiles::default(),
        }
    }
}

impl PlayerConfig {
    /// Check the configuration and return the parsed locator pattern.
    pub fn validate(&self) -> crate::Result<FramePattern> {
        if self.frame_count == 0 {
            return Err(CoreError::InvalidFrameCount(self.frame_count));
        }
        self.profiles.validate()?;
        FramePattern::parse(&self.pattern)
    }
}
