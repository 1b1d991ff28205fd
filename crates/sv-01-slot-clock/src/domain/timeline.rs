//! Genesis-anchored timeline.
//!
//! The wall clock is read once, when the clock starts. From then on time is
//! measured on the monotonic runtime clock, so slot numbers never go
//! backwards when the system clock is adjusted.

use super::slot_math;
use shared_types::Slot;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    genesis: Duration,
    slot_duration: Duration,
    anchor_wall: Duration,
    anchor_instant: Instant,
}

impl Timeline {
    /// Anchor `anchor_wall` (wall time, since Unix epoch) to the current
    /// runtime instant.
    pub fn anchor(genesis_time: u64, slot_duration: Duration, anchor_wall: Duration) -> Self {
        Self {
            genesis: Duration::from_secs(genesis_time),
            slot_duration,
            anchor_wall,
            anchor_instant: Instant::now(),
        }
    }

    pub fn genesis_time(&self) -> u64 {
        self.genesis.as_secs()
    }

    /// Current wall time derived from the anchor.
    pub fn now(&self) -> Duration {
        self.anchor_wall + self.anchor_instant.elapsed()
    }

    pub fn current_slot(&self) -> Option<Slot> {
        slot_math::compute_slot(self.genesis, self.slot_duration, self.now())
    }

    pub fn slot_start(&self, slot: Slot) -> Duration {
        slot_math::slot_start(self.genesis, self.slot_duration, slot)
    }

    pub fn slot_deadline(&self, slot: Slot) -> Duration {
        slot_math::slot_deadline(self.genesis, self.slot_duration, slot)
    }

    pub fn slot_deadline_system_time(&self, slot: Slot) -> SystemTime {
        UNIX_EPOCH + self.slot_deadline(slot)
    }

    /// Runtime instant corresponding to wall time `at`.
    ///
    /// Wall times before the anchor map to the anchor instant.
    pub fn instant_at(&self, at: Duration) -> Instant {
        match at.checked_sub(self.anchor_wall) {
            Some(ahead) => self.anchor_instant + ahead,
            None => self.anchor_instant,
        }
    }
}
