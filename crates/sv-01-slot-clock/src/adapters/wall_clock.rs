use crate::ports::WallClock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> Duration {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}

/// Wall clock frozen at a fixed reading. For tests and replay.
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock(pub Duration);

impl WallClock for FixedWallClock {
    fn now(&self) -> Duration {
        self.0
    }
}
