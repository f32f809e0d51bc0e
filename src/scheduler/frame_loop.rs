//! Cooperative per-frame callbacks.
//!
//! A [`FrameQueue`] plays the role of the display's "request next frame"
//! mechanism: requests made during a frame fire on the following tick.
//! A [`FrameLoop`] keeps exactly one request outstanding while running and
//! cancels it on `stop()` or when dropped.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies a mounted layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Which of a layer's loops a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    /// Simulation update and redraw
    Simulation,
    /// Scroll parallax easing
    Parallax,
}

/// A pending next-frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub token: u64,
    pub layer: LayerId,
    pub slot: FrameSlot,
}

/// Outstanding frame requests for one host
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_token: u64,
    pending: Vec<FrameRequest>,
}

pub type SharedFrameQueue = Rc<RefCell<FrameQueue>>;

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedFrameQueue {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Schedule a callback for the next tick and return its token
    pub fn request(&mut self, layer: LayerId, slot: FrameSlot) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.pending.push(FrameRequest { token, layer, slot });
        token
    }

    /// Drop a pending request; returns false if it already fired or never existed
    pub fn cancel(&mut self, token: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|r| r.token != token);
        self.pending.len() != before
    }

    /// Remove and return every request due on this tick
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Start/stop control over a periodic per-frame callback
pub trait FrameScheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// A self-rescheduling frame callback registered on a [`FrameQueue`]
#[derive(Debug)]
pub struct FrameLoop {
    queue: SharedFrameQueue,
    layer: LayerId,
    slot: FrameSlot,
    token: Option<u64>,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// Create a stopped loop
    pub fn new(queue: SharedFrameQueue, layer: LayerId, slot: FrameSlot) -> Self {
        Self {
            queue,
            layer,
            slot,
            token: None,
            running: false,
            frames: 0,
        }
    }

    /// Handle a fired request
    ///
    /// Returns true when `token` is this loop's outstanding request and the
    /// loop is running; the next frame is requested before returning.
    pub fn fire(&mut self, token: u64) -> bool {
        if self.token != Some(token) {
            return false;
        }
        self.token = None;
        if !self.running {
            return false;
        }
        self.frames += 1;
        self.token = Some(self.queue.borrow_mut().request(self.layer, self.slot));
        true
    }

    /// Frames this loop has run
    pub fn frames_run(&self) -> u64 {
        self.frames
    }

    pub fn slot(&self) -> FrameSlot {
        self.slot
    }

    /// Whether a request is outstanding
    pub fn is_pending(&self) -> bool {
        self.token.is_some()
    }
}

impl FrameScheduler for FrameLoop {
    fn start(&mut self) {
        self.running = true;
        if self.token.is_none() {
            self.token = Some(self.queue.borrow_mut().request(self.layer, self.slot));
        }
    }

    fn stop(&mut self) {
        self.running = false;
        if let Some(token) = self.token.take() {
            self.queue.borrow_mut().cancel(token);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
