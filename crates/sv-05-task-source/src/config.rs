//! Task source configuration.

use shared_types::rpc::DutyAssignment;
use shared_types::ChainConfig;

#[derive(Debug, Clone)]
pub struct TaskSourceConfig {
    /// Genesis time announced on the chain-start stream (seconds since the
    /// Unix epoch).
    pub genesis_time: u64,
    pub chain: ChainConfig,
    /// Served by `get_duties`, filtered to the requested keys.
    pub duties: Vec<DutyAssignment>,
    /// Treat assignment slots as offsets within the requested epoch, so the
    /// same schedule repeats every epoch.
    pub per_epoch: bool,
    /// Per-stream send buffer.
    pub stream_buffer: usize,
}

impl TaskSourceConfig {
    pub fn new(genesis_time: u64) -> Self {
        Self {
            genesis_time,
            chain: ChainConfig::default(),
            duties: Vec::new(),
            per_epoch: false,
            stream_buffer: 1,
        }
    }

    pub fn with_duties(mut self, duties: Vec<DutyAssignment>) -> Self {
        self.duties = duties;
        self
    }

    pub fn repeating_every_epoch(mut self) -> Self {
        self.per_epoch = true;
        self
    }
}
