//! Domain layer: stream events.

mod event;

pub use event::TaskEvent;
