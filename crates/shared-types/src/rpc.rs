//! # RPC Surface
//!
//! Logical request/response shapes and service traits of the connection to
//! the beacon/coordinating node. A client implementation wraps the real
//! transport; the reference task source implements the server side directly.
//!
//! Implementations must be safe for independent concurrent calls: one
//! connection is shared read-only by every role task.

use crate::beacon::{Attestation, DomainType, SignedBeaconBlock};
use crate::errors::TransportError;
use crate::primitives::{BlsPubKey, CommitteeIndex, Epoch, Slot, ValidatorIndex};
use crate::ssv::{SsvTask, StreamTopic};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;

/// Server-to-client stream. `None` from the stream is end-of-stream.
pub type ServerStream<T> = Pin<Box<dyn Stream<Item = Result<T, TransportError>> + Send>>;

/// Chain-start notification carrying the genesis time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStartResponse {
    pub started: bool,
    /// Seconds since the Unix epoch.
    pub genesis_time: u64,
}

/// Duty lookup for a set of keys in one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutiesRequest {
    pub epoch: Epoch,
    pub public_keys: Vec<BlsPubKey>,
}

/// One validator's assignments within the requested epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    pub public_key: BlsPubKey,
    pub validator_index: ValidatorIndex,
    pub committee_index: CommitteeIndex,
    /// Committee members in committee order.
    pub committee: Vec<ValidatorIndex>,
    pub attester_slot: Slot,
    pub proposer_slots: Vec<Slot>,
    /// Selected to aggregate at `attester_slot`.
    pub aggregator: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutiesResponse {
    pub duties: Vec<DutyAssignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequest {
    pub epoch: Epoch,
    pub domain_type: DomainType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainResponse {
    pub signature_domain: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestResponse {
    pub attestation_data_root: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeResponse {
    pub block_root: Vec<u8>,
}

/// Task stream subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub public_keys: Vec<BlsPubKey>,
    pub topics: Vec<StreamTopic>,
}

/// Beacon-node validator service (chain start, duties, domains, submissions).
#[async_trait]
pub trait BeaconNodeValidator: Send + Sync {
    /// Long-lived stream that yields the chain-start notification.
    async fn wait_for_chain_start(&self)
        -> Result<ServerStream<ChainStartResponse>, TransportError>;

    async fn get_duties(&self, request: DutiesRequest) -> Result<DutiesResponse, TransportError>;

    async fn domain_data(&self, request: DomainRequest) -> Result<DomainResponse, TransportError>;

    /// Submit a (partial) attestation to the coordinator.
    async fn propose_attestation(
        &self,
        attestation: Attestation,
    ) -> Result<AttestResponse, TransportError>;

    /// Submit a (partially) signed block to the coordinator.
    async fn propose_block(
        &self,
        block: SignedBeaconBlock,
    ) -> Result<ProposeResponse, TransportError>;
}

/// SSV coordinator task service.
#[async_trait]
pub trait SsvTaskService: Send + Sync {
    /// Open the server-streamed sequence of signing tasks.
    async fn get_task_stream(
        &self,
        request: StreamRequest,
    ) -> Result<ServerStream<SsvTask>, TransportError>;
}
