//! Duty resolver backed by the beacon node `GetDuties` call.
//!
//! Duties are epoch-scoped: the first slot of an epoch fetches the
//! assignments for every local key, later slots of the same epoch derive
//! their roles from the cached response.

use crate::domain::to_validator_duty;
use crate::error::ResolveError;
use crate::ports::DutyResolver;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::rpc::{BeaconNodeValidator, DutiesRequest, DutyAssignment};
use shared_types::{ChainConfig, Epoch, KeyManager, Slot, ValidatorDuty};
use std::sync::Arc;
use tracing::debug;

pub struct BeaconDutyResolver {
    api: Arc<dyn BeaconNodeValidator>,
    keys: Arc<dyn KeyManager>,
    chain: ChainConfig,
    cache: Mutex<Option<(Epoch, Arc<Vec<DutyAssignment>>)>>,
}

impl BeaconDutyResolver {
    pub fn new(
        api: Arc<dyn BeaconNodeValidator>,
        keys: Arc<dyn KeyManager>,
        chain: ChainConfig,
    ) -> Self {
        Self {
            api,
            keys,
            chain,
            cache: Mutex::new(None),
        }
    }

    async fn assignments(
        &self,
        epoch: Epoch,
    ) -> Result<Arc<Vec<DutyAssignment>>, ResolveError> {
        let cached = self
            .cache
            .lock()
            .as_ref()
            .filter(|(cached_epoch, _)| *cached_epoch == epoch)
            .map(|(_, assignments)| assignments.clone());
        if let Some(assignments) = cached {
            return Ok(assignments);
        }

        let public_keys = self.keys.fetch_validating_public_keys().await?;
        let response = self
            .api
            .get_duties(DutiesRequest { epoch, public_keys })
            .await?;
        debug!(
            epoch,
            assignments = response.duties.len(),
            "[sv-04] Fetched duties for epoch"
        );

        let assignments = Arc::new(response.duties);
        *self.cache.lock() = Some((epoch, assignments.clone()));
        Ok(assignments)
    }
}

#[async_trait]
impl DutyResolver for BeaconDutyResolver {
    async fn resolve_duties(&self, slot: Slot) -> Result<Vec<ValidatorDuty>, ResolveError> {
        let epoch = self.chain.epoch_of(slot);
        let assignments = self.assignments(epoch).await?;
        Ok(assignments
            .iter()
            .map(|assignment| to_validator_duty(assignment, slot))
            .collect())
    }
}
