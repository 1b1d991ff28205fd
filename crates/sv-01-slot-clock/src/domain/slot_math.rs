//! Pure slot arithmetic over Unix-epoch offsets.
//!
//! All inputs are durations since the Unix epoch so the functions stay
//! independent of any clock source.

use shared_types::Slot;
use std::time::Duration;

/// Slot containing `now`, or `None` before genesis.
///
/// `slot = floor((now - genesis) / slot_duration)`
pub fn compute_slot(genesis: Duration, slot_duration: Duration, now: Duration) -> Option<Slot> {
    if now < genesis || slot_duration.is_zero() {
        return None;
    }
    let elapsed = (now - genesis).as_nanos();
    let slot = elapsed / slot_duration.as_nanos();
    Slot::try_from(slot).ok()
}

/// Instant at which `slot` begins.
pub fn slot_start(genesis: Duration, slot_duration: Duration, slot: Slot) -> Duration {
    genesis + mul_duration(slot_duration, slot)
}

/// Instant at which the slot after `slot` begins: the deadline for all work
/// belonging to `slot`.
pub fn slot_deadline(genesis: Duration, slot_duration: Duration, slot: Slot) -> Duration {
    slot_start(genesis, slot_duration, slot.saturating_add(1))
}

fn mul_duration(d: Duration, n: u64) -> Duration {
    let nanos = d.as_nanos().saturating_mul(u128::from(n));
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % 1_000_000_000) as u32)
}
