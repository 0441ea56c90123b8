//! Host event intake with per-tick coalescing.
//!
//! Scroll and resize notifications can arrive far faster than the display
//! refreshes. They are queued on a channel and drained once per tick: only
//! the most recent scroll position and viewport size survive. Load
//! completions are never coalesced; every one is handed over in arrival
//! order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use tracing::trace;

/// An event delivered by the host environment.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<L> {
    /// The scroll position changed.
    Scroll(f64),
    /// The viewport was resized.
    Resize { width: u32, height: u32 },
    /// One frame finished loading (successfully or not).
    Loaded(L),
}

/// Everything that happened since the previous tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick<L> {
    /// Latest scroll position, if any arrived.
    pub scroll: Option<f64>,
    /// Latest viewport size, if any arrived.
    pub resize: Option<(u32, u32)>,
    /// Every load completion, in arrival order.
    pub loads: Vec<L>,
    /// Scroll and resize events that were superseded within this tick.
    pub coalesced: usize,
}

impl<L> Default for Tick<L> {
    fn default() -> Self {
        Self {
            scroll: None,
            resize: None,
            loads: Vec::new(),
            coalesced: 0,
        }
    }
}

impl<L> Tick<L> {
    pub fn is_empty(&self) -> bool {
        self.scroll.is_none() && self.resize.is_none() && self.loads.is_empty()
    }
}

/// Cloneable producer half. Safe to move onto loader threads.
#[derive(Debug)]
pub struct EventSender<L> {
    tx: mpsc::Sender<HostEvent<L>>,
    closed: Arc<AtomicBool>,
}

impl<L> Clone for EventSender<L> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<L> EventSender<L> {
    /// Queue an event. Returns `false` once the queue has been closed.
    pub fn send(&self, event: HostEvent<L>) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    pub fn scroll(&self, position: f64) -> bool {
        self.send(HostEvent::Scroll(position))
    }

    pub fn resize(&self, width: u32, height: u32) -> bool {
        self.send(HostEvent::Resize { width, height })
    }

    pub fn loaded(&self, payload: L) -> bool {
        self.send(HostEvent::Loaded(payload))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Single-consumer half, owned by whoever runs the tick loop.
#[derive(Debug)]
pub struct EventQueue<L> {
    rx: mpsc::Receiver<HostEvent<L>>,
    closed: Arc<AtomicBool>,
}

/// Create a connected sender/queue pair.
pub fn event_channel<L>() -> (EventSender<L>, EventQueue<L>) {
    let (tx, rx) = mpsc::channel();
    let closed = Arc::new(AtomicBool::new(false));
    (
        EventSender {
            tx,
            closed: Arc::clone(&closed),
        },
        EventQueue { rx, closed },
    )
}

impl<L> EventQueue<L> {
    /// Take everything queued since the last call, coalescing scroll and
    /// resize events. Returns an empty tick after [`close`](Self::close).
    pub fn drain(&self) -> Tick<L> {
        let mut tick = Tick::default();
        if self.is_closed() {
            self.discard_pending();
            return tick;
        }
        while let Ok(event) = self.rx.try_recv() {
            match event {
                HostEvent::Scroll(position) => {
                    if tick.scroll.replace(position).is_some() {
                        tick.coalesced += 1;
                    }
                }
                HostEvent::Resize { width, height } => {
                    if tick.resize.replace((width, height)).is_some() {
                        tick.coalesced += 1;
                    }
                }
                HostEvent::Loaded(payload) => tick.loads.push(payload),
            }
        }
        if tick.coalesced > 0 {
            trace!(coalesced = tick.coalesced, "Coalesced host events");
        }
        tick
    }

    /// Stop listening: senders start refusing events and anything still
    /// queued is dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.discard_pending();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn discard_pending(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}

impl<L> Drop for EventQueue<L> {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}
