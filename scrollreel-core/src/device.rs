//! Coarse device classification and the scroll tuning that depends on it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Viewports narrower than this are treated as compact.
pub const COMPACT_BREAKPOINT: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Compact,
    Full,
}

impl DeviceClass {
    pub fn from_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            Self::Compact
        } else {
            Self::Full
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Full => "Full",
        }
    }
}

/// Scroll tuning for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollProfile {
    /// Pinned region length in viewport heights.
    pub end_multiplier: f64,
    /// Playhead catch-up time in seconds.
    pub scrub_seconds: f64,
}

impl ScrollProfile {
    pub const COMPACT: Self = Self {
        end_multiplier: 4.0,
        scrub_seconds: 0.1,
    };
    pub const FULL: Self = Self {
        end_multiplier: 6.0,
        scrub_seconds: 0.15,
    };

    fn validate(&self, which: &str) -> crate::Result<()> {
        if !(self.end_multiplier.is_finite() && self.end_multiplier > 0.0) {
            return Err(CoreError::InvalidProfile {
                reason: format!(
                    "{which} end_multiplier must be positive and finite, got {}",
                    self.end_multiplier
                ),
            });
        }
        if !(self.scrub_seconds.is_finite() && self.scrub_seconds >= 0.0) {
            return Err(CoreError::InvalidProfile {
                reason: format!(
                    "{which} scrub_seconds must be >= 0 and finite, got {}",
                    self.scrub_seconds
                ),
            });
        }
        Ok(())
    }
}

/// Per-class scroll profiles plus the breakpoint that selects between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfiles {
    #[serde(default = "default_breakpoint")]
    pub breakpoint: u32,
    #[serde(default = "default_compact")]
    pub compact: ScrollProfile,
    #[serde(default = "default_full")]
    pub full: ScrollProfile,
}

fn default_breakpoint() -> u32 {
    COMPACT_BREAKPOINT
}
fn default_compact() -> ScrollProfile {
    ScrollProfile::COMPACT
}
fn default_full() -> ScrollProfile {
    ScrollProfile::FULL
}

impl Default for DeviceProfiles {
    fn default() -> Self {
        Self {
            breakpoint: COMPACT_BREAKPOINT,
            compact: ScrollProfile::COMPACT,
            full: ScrollProfile::FULL,
        }
    }
}

impl DeviceProfiles {
    pub fn classify(&self, viewport_width: u32) -> DeviceClass {
        DeviceClass::from_width(viewport_width, self.breakpoint)
    }

    pub fn profile(&self, class: DeviceClass) -> ScrollProfile {
        match class {
            DeviceClass::Compact => self.compact,
            DeviceClass::Full => self.full,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.compact.validate("compact")?;
        self.full.validate("full")
    }
}
