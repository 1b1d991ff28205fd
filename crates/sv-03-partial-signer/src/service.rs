//! Partial signer service.

use crate::domain::{
    attestation_signing_root, block_signing_root, committee_position, AggregationBits,
};
use crate::error::{Result, SignerError};
use shared_types::rpc::{
    AttestResponse, BeaconNodeValidator, DomainRequest, DutiesRequest, ProposeResponse,
};
use shared_types::{
    Attestation, AttestationData, BeaconBlock, BlsPubKey, ChainConfig, DomainType, Epoch,
    KeyManager, Root, SignedBeaconBlock, Signature, SlotScope, DOMAIN_BEACON_ATTESTER,
    DOMAIN_BEACON_PROPOSER,
};
use ssv_telemetry::metrics::{PARTIAL_SUBMISSIONS, SIGNING_DURATION};
use ssv_telemetry::time_histogram;
use std::sync::Arc;
use tracing::{debug, info};

/// Produces one participant's partial signature for attestations and blocks
/// and submits it to the coordinator.
///
/// Stateless between calls; every step is bounded by the caller's
/// [`SlotScope`]. Nothing is submitted once the scope has ended.
pub struct PartialSigner {
    api: Arc<dyn BeaconNodeValidator>,
    keys: Arc<dyn KeyManager>,
    chain: ChainConfig,
}

impl PartialSigner {
    pub fn new(
        api: Arc<dyn BeaconNodeValidator>,
        keys: Arc<dyn KeyManager>,
        chain: ChainConfig,
    ) -> Self {
        Self { api, keys, chain }
    }

    /// Sign `data` as the committee member behind `public_key` and submit
    /// the partial attestation with a single-bit aggregation bitfield.
    pub async fn sign_partial_attestation(
        &self,
        data: &AttestationData,
        public_key: &BlsPubKey,
        scope: &SlotScope,
    ) -> Result<AttestResponse> {
        let _timer = time_histogram!(SIGNING_DURATION);
        let result = self.attest(data, public_key, scope).await;
        record("attestation", &result);
        result
    }

    async fn attest(
        &self,
        data: &AttestationData,
        public_key: &BlsPubKey,
        scope: &SlotScope,
    ) -> Result<AttestResponse> {
        let epoch = self.chain.epoch_of(data.slot);
        let request = DutiesRequest {
            epoch,
            public_keys: vec![*public_key],
        };
        let duties = scope
            .run(self.api.get_duties(request))
            .await?
            .map_err(SignerError::Duties)?;

        let duty = duties
            .duties
            .iter()
            .find(|duty| duty.public_key == *public_key)
            .ok_or(SignerError::DutyNotFound(*public_key))?;

        let position = committee_position(&duty.committee, duty.validator_index).ok_or_else(
            || SignerError::PositionNotFound {
                validator_index: duty.validator_index,
                committee: duty.committee.clone(),
            },
        )?;
        let bits = AggregationBits::with_single_bit(duty.committee.len(), position)?;

        let domain = self.domain(epoch, DOMAIN_BEACON_ATTESTER, scope).await?;
        let root = attestation_signing_root(data, &domain)?;
        let signature = self.sign(public_key, &root, scope).await?;

        let attestation = Attestation {
            data: data.clone(),
            aggregation_bits: bits.to_ssz_bytes(),
            signature,
        };
        scope.check()?;
        let response = scope
            .run(self.api.propose_attestation(attestation))
            .await?
            .map_err(SignerError::Submission)?;

        info!(
            slot = data.slot,
            pubkey = %public_key.short(),
            committee_index = data.committee_index,
            bits = %bits,
            "[sv-03] Signed and proposed partial attestation"
        );
        Ok(response)
    }

    /// Sign `block` with the key behind `public_key` and submit it.
    pub async fn sign_partial_block(
        &self,
        block: &BeaconBlock,
        public_key: &BlsPubKey,
        scope: &SlotScope,
    ) -> Result<ProposeResponse> {
        let _timer = time_histogram!(SIGNING_DURATION);
        let result = self.propose(block, public_key, scope).await;
        record("block", &result);
        result
    }

    async fn propose(
        &self,
        block: &BeaconBlock,
        public_key: &BlsPubKey,
        scope: &SlotScope,
    ) -> Result<ProposeResponse> {
        let epoch = self.chain.epoch_of(block.slot);
        let domain = self.domain(epoch, DOMAIN_BEACON_PROPOSER, scope).await?;
        let root = block_signing_root(block, &domain)?;
        let signature = self.sign(public_key, &root, scope).await?;

        let signed = SignedBeaconBlock {
            block: block.clone(),
            signature,
        };
        scope.check()?;
        let response = scope
            .run(self.api.propose_block(signed))
            .await?
            .map_err(SignerError::Submission)?;

        info!(
            slot = block.slot,
            pubkey = %public_key.short(),
            "[sv-03] Signed and proposed partial block"
        );
        Ok(response)
    }

    async fn domain(
        &self,
        epoch: Epoch,
        domain_type: DomainType,
        scope: &SlotScope,
    ) -> Result<Vec<u8>> {
        let request = DomainRequest { epoch, domain_type };
        let response = scope
            .run(self.api.domain_data(request))
            .await?
            .map_err(SignerError::Domain)?;
        debug!(epoch, domain_type = ?domain_type, "[sv-03] Signature domain resolved");
        Ok(response.signature_domain)
    }

    async fn sign(
        &self,
        public_key: &BlsPubKey,
        root: &Root,
        scope: &SlotScope,
    ) -> Result<Signature> {
        Ok(scope.run(self.keys.sign(public_key, root)).await??)
    }
}

fn record<T>(kind: &str, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "submitted",
        Err(e) if e.is_abort() => "aborted",
        Err(_) => "failed",
    };
    PARTIAL_SUBMISSIONS.with_label_values(&[kind, outcome]).inc();
}
