//! Task source service: task stream plus stub validator endpoint.

use crate::config::TaskSourceConfig;
use crate::domain::synthetic_attestation_task;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::rpc::{
    AttestResponse, BeaconNodeValidator, ChainStartResponse, DomainRequest, DomainResponse,
    DutiesRequest, DutiesResponse, DutyAssignment, ProposeResponse, ServerStream, SsvTaskService,
    StreamRequest,
};
use shared_types::{
    Attestation, BlsPubKey, ChainConfig, Epoch, Shutdown, SignedBeaconBlock, Slot, SsvTask,
    TransportError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sv_01_slot_clock::domain::Timeline;
use sv_01_slot_clock::WallClock;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// Everything the coordinator side has been sent.
#[derive(Debug, Default)]
struct Received {
    stream_requests: Vec<StreamRequest>,
    attestations: Vec<Attestation>,
    blocks: Vec<SignedBeaconBlock>,
}

/// In-process reference coordinator.
pub struct TaskSource {
    config: TaskSourceConfig,
    wall: Arc<dyn WallClock>,
    shutdown: Shutdown,
    received: RwLock<Received>,
    /// Total submissions (attestations and blocks) acknowledged so far.
    submissions: watch::Sender<usize>,
    next_stream_id: AtomicU64,
}

impl TaskSource {
    /// Streams opened on this source end when `shutdown` fires.
    pub fn new(config: TaskSourceConfig, wall: Arc<dyn WallClock>, shutdown: Shutdown) -> Self {
        let (submissions, _) = watch::channel(0);
        Self {
            config,
            wall,
            shutdown,
            received: RwLock::new(Received::default()),
            submissions,
            next_stream_id: AtomicU64::new(1),
        }
    }

    pub fn stream_requests(&self) -> Vec<StreamRequest> {
        self.received.read().stream_requests.clone()
    }

    pub fn attestations(&self) -> Vec<Attestation> {
        self.received.read().attestations.clone()
    }

    pub fn blocks(&self) -> Vec<SignedBeaconBlock> {
        self.received.read().blocks.clone()
    }

    /// Watch the running submission count.
    pub fn submissions(&self) -> watch::Receiver<usize> {
        self.submissions.subscribe()
    }

    fn timeline(&self) -> Timeline {
        Timeline::anchor(
            self.config.genesis_time,
            Duration::from_secs(self.config.chain.seconds_per_slot),
            self.wall.now(),
        )
    }

    fn record_submission(&self) {
        self.submissions.send_modify(|count| *count += 1);
    }
}

#[async_trait]
impl SsvTaskService for TaskSource {
    async fn get_task_stream(
        &self,
        request: StreamRequest,
    ) -> Result<ServerStream<SsvTask>, TransportError> {
        let Some(&target) = request.public_keys.first() else {
            return Err(TransportError::InvalidRequest(
                "stream request carries no public keys".into(),
            ));
        };

        let id = self.next_stream_id.fetch_add(1, Ordering::SeqCst);
        info!(
            stream_id = id,
            keys = request.public_keys.len(),
            topics = request.topics.len(),
            "[sv-05] New task stream established"
        );
        self.received.write().stream_requests.push(request);

        let (tx, rx) = mpsc::channel(self.config.stream_buffer.max(1));
        tokio::spawn(stream_tasks(
            id,
            target,
            self.timeline(),
            tx,
            self.shutdown.clone(),
        ));
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// One synthetic attestation task per slot boundary until shutdown or until
/// the client goes away.
async fn stream_tasks(
    id: u64,
    target: BlsPubKey,
    timeline: Timeline,
    tx: mpsc::Sender<Result<SsvTask, TransportError>>,
    mut shutdown: Shutdown,
) {
    let mut slot = timeline.current_slot().map_or(0, |current| current + 1);
    loop {
        let start = timeline.instant_at(timeline.slot_start(slot));
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep_until(start) => {}
        }

        let task = synthetic_attestation_task(target, slot);
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            sent = tx.send(Ok(task)) => {
                if sent.is_err() {
                    warn!(stream_id = id, slot, "[sv-05] Could not stream task, client gone");
                    return;
                }
                info!(stream_id = id, slot, "[sv-05] Streamed task");
            }
        }
        slot += 1;
    }
    debug!(stream_id = id, "[sv-05] Shutdown, closing task stream");
}

/// Move an assignment's slots into `epoch`, keeping their offsets.
fn rebase(duty: &DutyAssignment, chain: &ChainConfig, epoch: Epoch) -> DutyAssignment {
    let start = chain.epoch_start_slot(epoch);
    let offset = |slot: Slot| start + slot % chain.slots_per_epoch;
    DutyAssignment {
        attester_slot: offset(duty.attester_slot),
        proposer_slots: duty.proposer_slots.iter().copied().map(offset).collect(),
        ..duty.clone()
    }
}

#[async_trait]
impl BeaconNodeValidator for TaskSource {
    async fn wait_for_chain_start(
        &self,
    ) -> Result<ServerStream<ChainStartResponse>, TransportError> {
        Ok(Box::pin(tokio_stream::once(Ok::<_, TransportError>(ChainStartResponse {
            started: true,
            genesis_time: self.config.genesis_time,
        }))))
    }

    async fn get_duties(&self, request: DutiesRequest) -> Result<DutiesResponse, TransportError> {
        let duties: Vec<_> = self
            .config
            .duties
            .iter()
            .filter(|duty| request.public_keys.contains(&duty.public_key))
            .map(|duty| {
                if self.config.per_epoch {
                    rebase(duty, &self.config.chain, request.epoch)
                } else {
                    duty.clone()
                }
            })
            .collect();
        debug!(
            epoch = request.epoch,
            requested = request.public_keys.len(),
            served = duties.len(),
            "[sv-05] Duties requested"
        );
        Ok(DutiesResponse { duties })
    }

    async fn domain_data(&self, _request: DomainRequest) -> Result<DomainResponse, TransportError> {
        Ok(DomainResponse {
            signature_domain: vec![0u8; 32],
        })
    }

    async fn propose_attestation(
        &self,
        attestation: Attestation,
    ) -> Result<AttestResponse, TransportError> {
        info!(
            slot = attestation.data.slot,
            committee_index = attestation.data.committee_index,
            "[sv-05] Received partial attestation"
        );
        self.received.write().attestations.push(attestation);
        self.record_submission();
        Ok(AttestResponse {
            attestation_data_root: vec![0u8; 96],
        })
    }

    async fn propose_block(
        &self,
        block: SignedBeaconBlock,
    ) -> Result<ProposeResponse, TransportError> {
        info!(slot = block.block.slot, "[sv-05] Received partial block");
        self.received.write().blocks.push(block);
        self.record_submission();
        Ok(ProposeResponse {
            block_root: vec![0u8; 32],
        })
    }
}
