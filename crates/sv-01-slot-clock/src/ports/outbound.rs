//! Driven ports of the slot clock.

use async_trait::async_trait;
use shared_types::rpc::{ChainStartResponse, ServerStream};
use shared_types::TransportError;
use std::time::Duration;

/// Upstream chain-start notification.
///
/// The stream yields at most one `started = true` notification carrying the
/// genesis time, and may close afterwards.
#[async_trait]
pub trait ChainStartSource: Send + Sync {
    async fn wait_for_chain_start(
        &self,
    ) -> Result<ServerStream<ChainStartResponse>, TransportError>;
}

/// Wall-clock reading as the offset since the Unix epoch.
pub trait WallClock: Send + Sync {
    fn now(&self) -> Duration;
}
