//! Frame scheduling: per-frame callbacks and the host's timestamp source.

mod frame_loop;
mod ticker;

pub use frame_loop::{
    FrameLoop, FrameQueue, FrameRequest, FrameScheduler, FrameSlot, LayerId, SharedFrameQueue,
};
pub use ticker::{TickMode, Ticker};
