//! Role executor for SSV participation.
//!
//! | Role | Work |
//! |------|------|
//! | Attester | claim `sign_attestation`, produce a partial attestation |
//! | Proposer | claim `sign_block`, produce a partial block signature |
//! | Aggregator | none yet, reported as skipped |

use crate::error::RoleError;
use crate::ports::RoleExecutor;
use crate::router::RouterHandle;
use async_trait::async_trait;
use shared_types::{Role, SlotScope, StreamTopic, TaskPayload, ValidatorDuty};
use std::sync::Arc;
use sv_03_partial_signer::PartialSigner;
use tracing::info;

pub struct SsvRoleExecutor {
    router: RouterHandle,
    signer: Arc<PartialSigner>,
}

impl SsvRoleExecutor {
    pub fn new(router: RouterHandle, signer: Arc<PartialSigner>) -> Self {
        Self { router, signer }
    }
}

#[async_trait]
impl RoleExecutor for SsvRoleExecutor {
    async fn execute(
        &self,
        duty: &ValidatorDuty,
        role: Role,
        scope: SlotScope,
    ) -> Result<(), RoleError> {
        let topic = match role {
            Role::Attester => StreamTopic::SignAttestation,
            Role::Proposer => StreamTopic::SignBlock,
            Role::Aggregator => {
                info!(
                    slot = duty.slot,
                    pubkey = %duty.public_key.short(),
                    "[sv-04] Aggregation duty not supported, skipping"
                );
                return Err(RoleError::Unsupported(role));
            }
            Role::None | Role::Unrecognized(_) => return Err(RoleError::NoExecutor(role)),
        };

        let task = scope
            .run(self.router.claim(duty.public_key, topic, duty.slot))
            .await??;

        match (role, task.payload) {
            (Role::Attester, TaskPayload::Attestation(data)) => {
                self.signer
                    .sign_partial_attestation(&data, &duty.public_key, &scope)
                    .await?;
            }
            (Role::Proposer, TaskPayload::Block(block)) => {
                self.signer
                    .sign_partial_block(&block, &duty.public_key, &scope)
                    .await?;
            }
            _ => return Err(RoleError::UnexpectedPayload { topic }),
        }
        Ok(())
    }
}
