use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

/// One pending capture-and-decode cycle.
///
/// The tick fires once, `interval` after it was scheduled. Dropping it
/// cancels it: nothing else holds the timer, so the cycle never runs.
pub struct FrameTick {
    id: u64,
    timer: Receiver<Instant>,
}

impl FrameTick {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Becomes ready when the tick fires. Clones observe the same timer.
    pub fn receiver(&self) -> &Receiver<Instant> {
        &self.timer
    }

    pub fn cancel(self) {
        log::trace!("Cancelled frame tick {}", self.id);
    }
}

/// Issues [`FrameTick`]s paced at a fixed refresh interval.
pub struct FrameScheduler {
    interval: Duration,
    next_id: u64,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
        }
    }

    pub fn schedule(&mut self) -> FrameTick {
        self.next_id += 1;
        FrameTick {
            id: self.next_id,
            timer: crossbeam_channel::after(self.interval),
        }
    }
}
