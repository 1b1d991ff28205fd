//! Chain-start source backed by the beacon node validator connection.

use crate::ports::ChainStartSource;
use async_trait::async_trait;
use shared_types::rpc::{BeaconNodeValidator, ChainStartResponse, ServerStream};
use shared_types::TransportError;
use std::sync::Arc;

pub struct BeaconChainStart {
    beacon: Arc<dyn BeaconNodeValidator>,
}

impl BeaconChainStart {
    pub fn new(beacon: Arc<dyn BeaconNodeValidator>) -> Self {
        Self { beacon }
    }
}

#[async_trait]
impl ChainStartSource for BeaconChainStart {
    async fn wait_for_chain_start(
        &self,
    ) -> Result<ServerStream<ChainStartResponse>, TransportError> {
        self.beacon.wait_for_chain_start().await
    }
}
