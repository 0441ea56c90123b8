pub mod error;
pub mod export;
pub mod fetch;
pub mod frame;
pub mod loader;
pub mod player;
pub mod store;
pub mod surface;

pub use error::RenderError;
pub use export::{export_png, SnapshotMetadata};
pub use fetch::{FrameFetcher, FsFetcher, MemoryFetcher};
pub use frame::FrameImage;
pub use loader::{spawn_loader, LoadEvent, LoaderHandle};
pub use player::{FadeLayer, SequencePlayer, TickReport};
pub use store::{FrameSlot, FrameStore, LoadState};
pub use surface::{cover_fit, CoverFit, Surface};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
