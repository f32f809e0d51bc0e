//! Viewport signal listeners.
//!
//! Layers subscribe to resize and scroll signals through a
//! [`Subscription`] that removes itself from the bus when dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::LayerId;

/// Host signals a layer can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Resize,
    Scroll,
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    id: u64,
    signal: Signal,
    layer: LayerId,
}

/// Registered listeners for one host
#[derive(Debug, Default)]
pub struct SignalBus {
    next_id: u64,
    listeners: Vec<Listener>,
}

pub type SharedSignalBus = Rc<RefCell<SignalBus>>;

impl SignalBus {
    pub fn shared() -> SharedSignalBus {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn subscribe(&mut self, signal: Signal, layer: LayerId) -> u64 {
        self.next_id += 1;
        self.listeners.push(Listener {
            id: self.next_id,
            signal,
            layer,
        });
        self.next_id
    }

    pub fn unsubscribe(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Layers listening to `signal`, in subscription order
    pub fn listeners_for(&self, signal: Signal) -> Vec<LayerId> {
        self.listeners
            .iter()
            .filter(|l| l.signal == signal)
            .map(|l| l.layer)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Scoped listener registration
#[derive(Debug)]
pub struct Subscription {
    bus: SharedSignalBus,
    id: u64,
    signal: Signal,
}

impl Subscription {
    pub fn new(bus: SharedSignalBus, signal: Signal, layer: LayerId) -> Self {
        let id = bus.borrow_mut().subscribe(signal, layer);
        Self { bus, id, signal }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.borrow_mut().unsubscribe(self.id);
    }
}
