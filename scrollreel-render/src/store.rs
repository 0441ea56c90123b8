use std::sync::Arc;

use tracing::{debug, warn};

use scrollreel_core::{EventSender, FramePattern};

use crate::fetch::FrameFetcher;
use crate::frame::FrameImage;
use crate::loader::{spawn_loader, LoadEvent, LoaderHandle};

/// Load progress of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

/// One frame of the sequence.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    /// 1-based sequence number used to build the locator.
    pub sequence: usize,
    pub locator: String,
    state: LoadState,
    image: Option<FrameImage>,
}

impl FrameSlot {
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Natural dimensions, known once loaded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width(), img.height()))
    }
}

/// Fixed-length, display-ordered frame sequence.
///
/// Slots are addressed by zero-based position; slot `i` carries sequence
/// number `i + 1`. A slot leaves `Pending` exactly once and loaded images
/// stay resident for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct FrameStore {
    slots: Vec<FrameSlot>,
}

impl FrameStore {
    /// A store of pending slots, one per locator.
    pub fn new(locators: Vec<String>) -> Self {
        let slots = locators
            .into_iter()
            .enumerate()
            .map(|(i, locator)| FrameSlot {
                sequence: i + 1,
                locator,
                state: LoadState::Pending,
                image: None,
            })
            .collect();
        Self { slots }
    }

    /// Build `count` slots from `pattern` and start loading all of them in
    /// the background. Completions are delivered through `events` and must
    /// be passed to [`apply`](Self::apply).
    pub fn initialize(
        pattern: &FramePattern,
        count: usize,
        fetcher: Arc<dyn FrameFetcher>,
        events: EventSender<LoadEvent>,
    ) -> crate::Result<(Self, LoaderHandle)> {
        let store = Self::new(pattern.locators(count));
        let requests = store
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (i, slot.locator.clone()))
            .collect();
        let loader = spawn_loader(requests, fetcher, events)?;
        debug!(count, "Frame store initialised");
        Ok((store, loader))
    }

    /// Record one load completion. Returns `true` if the slot changed.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        let Some(slot) = self.slots.get_mut(event.index) else {
            warn!(index = event.index, "Load event for unknown frame");
            return false;
        };
        if slot.state != LoadState::Pending {
            debug!(index = event.index, "Ignoring repeated load event");
            return false;
        }
        match event.result {
            Ok(image) => {
                slot.state = LoadState::Loaded;
                slot.image = Some(image);
            }
            Err(e) => {
                warn!(index = event.index, locator = %slot.locator, "Frame failed to load: {e}");
                slot.state = LoadState::Failed;
            }
        }
        true
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.state(index) == Some(LoadState::Loaded)
    }

    /// The frame at `index` if it has loaded; `None` otherwise, including
    /// out-of-range indices.
    pub fn get(&self, index: usize) -> Option<&FrameImage> {
        self.slots.get(index).and_then(|slot| slot.image.as_ref())
    }

    pub fn state(&self, index: usize) -> Option<LoadState> {
        self.slots.get(index).map(|slot| slot.state)
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.count_in(LoadState::Loaded)
    }

    pub fn failed_count(&self) -> usize {
        self.count_in(LoadState::Failed)
    }

    pub fn pending_count(&self) -> usize {
        self.count_in(LoadState::Pending)
    }

    fn count_in(&self, state: LoadState) -> usize {
        self.slots.iter().filter(|s| s.state == state).count()
    }
}
