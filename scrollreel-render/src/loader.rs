use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use scrollreel_core::EventSender;

use crate::fetch::FrameFetcher;
use crate::frame::FrameImage;

/// Completion notice for one frame, successful or not.
#[derive(Debug)]
pub struct LoadEvent {
    /// Zero-based position in the sequence.
    pub index: usize,
    pub result: crate::Result<FrameImage>,
}

/// Handle to the background loader thread.
#[derive(Debug)]
pub struct LoaderHandle {
    thread: JoinHandle<()>,
}

impl LoaderHandle {
    /// Block until every frame has been attempted.
    pub fn join(self) {
        if self.thread.join().is_err() {
            tracing::error!("Frame loader thread panicked");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Start fetching and decoding every `(index, locator)` pair in the
/// background.
///
/// Frames are decoded in parallel on the Rayon pool, so completions arrive
/// in no particular order. Each one is sent as its own event. Once the
/// event queue is closed the remaining frames are skipped.
pub fn spawn_loader(
    requests: Vec<(usize, String)>,
    fetcher: Arc<dyn FrameFetcher>,
    events: EventSender<LoadEvent>,
) -> crate::Result<LoaderHandle> {
    let thread = std::thread::Builder::new()
        .name("frame-loader".into())
        .spawn(move || {
            let start = Instant::now();
            let total = requests.len();
            debug!(total, "Frame loader started");

            requests.into_par_iter().for_each(|(index, locator)| {
                if events.is_closed() {
                    return;
                }
                let result = fetcher
                    .fetch(&locator)
                    .and_then(|bytes| FrameImage::decode(&bytes));
                events.loaded(LoadEvent { index, result });
            });

            info!(
                elapsed_ms = start.elapsed().as_millis(),
                total,
                cancelled = events.is_closed(),
                "Frame loader finished"
            );
        })?;

    Ok(LoaderHandle { thread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use scrollreel_core::event_channel;

    #[test]
    fn every_request_produces_one_event() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let (tx, queue) = event_channel::<LoadEvent>();
        let requests = (0..8).map(|i| (i, format!("f{i}"))).collect();

        spawn_loader(requests, fetcher, tx).unwrap().join();

        let tick = queue.drain();
        assert_eq!(tick.loads.len(), 8);
        // Nothing was registered with the fetcher, so every load failed.
        assert!(tick.loads.iter().all(|e| e.result.is_err()));
        let mut indices: Vec<_> = tick.loads.iter().map(|e| e.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn closed_queue_skips_remaining_frames() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let (tx, queue) = event_channel::<LoadEvent>();
        queue.close();
        let requests = (0..4).map(|i| (i, format!("f{i}"))).collect();

        spawn_loader(requests, fetcher, tx).unwrap().join();

        assert!(queue.drain().loads.is_empty());
    }
}
