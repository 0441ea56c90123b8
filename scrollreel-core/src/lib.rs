pub mod config;
pub mod device;
pub mod error;
pub mod events;
pub mod fade;
pub mod mapper;
pub mod pattern;
pub mod region;
pub mod scrub;
pub mod section;

// Re-export primary types for convenience.
pub use config::{FadeLayerConfig, PlayerConfig};
pub use device::{DeviceClass, DeviceProfiles, ScrollProfile, COMPACT_BREAKPOINT};
pub use error::CoreError;
pub use events::{event_channel, EventQueue, EventSender, HostEvent, Tick};
pub use fade::{CrossFade, FadeRange, FadeState};
pub use mapper::frame_for_progress;
pub use pattern::FramePattern;
pub use region::{EmitPolicy, RegionController, RegionPhase, RegionUpdate, ScrollRegion};
pub use scrub::Scrubber;
pub use section::{section_index, TextReveal};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
