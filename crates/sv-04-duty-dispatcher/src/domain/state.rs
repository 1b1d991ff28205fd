//! Dispatcher state machine and per-slot reports.

use shared_types::Slot;
use std::fmt;

/// Where the dispatcher loop currently is.
///
/// ```text
/// WaitingForChainStart -> WaitingForSlot -> ResolvingDuties -> DispatchingRoles
///                              ^                                     |
///                              +-------- AwaitingCompletion <--------+
/// ```
///
/// Any state moves to `Stopped` on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    WaitingForChainStart,
    WaitingForSlot,
    ResolvingDuties { slot: Slot },
    DispatchingRoles { slot: Slot },
    /// Role tasks handed to the slot supervisor; the loop does not wait.
    AwaitingCompletion { slot: Slot },
    Stopped,
}

impl fmt::Display for DispatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatcherState::WaitingForChainStart => f.write_str("waiting_for_chain_start"),
            DispatcherState::WaitingForSlot => f.write_str("waiting_for_slot"),
            DispatcherState::ResolvingDuties { slot } => write!(f, "resolving_duties({slot})"),
            DispatcherState::DispatchingRoles { slot } => write!(f, "dispatching_roles({slot})"),
            DispatcherState::AwaitingCompletion { slot } => {
                write!(f, "awaiting_completion({slot})")
            }
            DispatcherState::Stopped => f.write_str("stopped"),
        }
    }
}

/// Outcome of every role task spawned for one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotReport {
    pub slot: Slot,
    pub spawned: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Ended by the slot deadline or shutdown.
    pub aborted: usize,
    /// Roles with no work behind them yet.
    pub skipped: usize,
}

impl SlotReport {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded + self.failed + self.aborted + self.skipped == self.spawned
    }
}
