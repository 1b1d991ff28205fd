use crate::error::StreamError;
use shared_types::SsvTask;

/// What the consumer observes on the task channel.
///
/// `Closed` and `Error` are terminal: every later receive repeats them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// The next task, in transport order.
    Task(SsvTask),
    /// The stream ended normally or the client shut down.
    Closed,
    /// The stream failed with a non-EOF receive error.
    Error(StreamError),
}

impl TaskEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskEvent::Task(_))
    }
}
