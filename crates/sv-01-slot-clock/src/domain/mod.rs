//! Domain layer: slot arithmetic and the anchored timeline.

pub mod slot_math;
pub mod timeline;

pub use slot_math::{compute_slot, slot_deadline, slot_start};
pub use timeline::Timeline;
