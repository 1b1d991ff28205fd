//! Explicit connection handle to the beacon/coordinating node.

use shared_types::rpc::{BeaconNodeValidator, SsvTaskService};
use std::sync::Arc;
use sv_05_task_source::TaskSource;

/// Both RPC services of one coordinating node.
///
/// Cloned into every component that talks to the node; all calls are
/// independent and may run concurrently.
#[derive(Clone)]
pub struct BeaconConnection {
    pub beacon: Arc<dyn BeaconNodeValidator>,
    pub tasks: Arc<dyn SsvTaskService>,
}

impl BeaconConnection {
    pub fn new(beacon: Arc<dyn BeaconNodeValidator>, tasks: Arc<dyn SsvTaskService>) -> Self {
        Self { beacon, tasks }
    }

    /// Connection served by an in-process task source.
    pub fn in_process(source: Arc<TaskSource>) -> Self {
        Self {
            beacon: source.clone(),
            tasks: source,
        }
    }
}
