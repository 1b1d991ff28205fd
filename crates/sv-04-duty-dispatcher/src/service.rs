//! Duty dispatcher service.

use crate::domain::{DispatcherState, SlotReport};
use crate::error::{DispatcherError, Result, RoleError};
use crate::ports::{DutyResolver, RoleExecutor};
use shared_types::{BlsPubKey, Role, Shutdown, Slot, SlotScope};
use ssv_telemetry::metrics::{DUTY_RESOLUTION_FAILURES, ROLE_TASKS, SLOTS_PROCESSED};
use std::sync::Arc;
use sv_01_slot_clock::SlotClock;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

type RoleResult = (BlsPubKey, Role, std::result::Result<(), RoleError>);

/// Per-slot orchestration loop.
///
/// Each slot: resolve duties once, spawn one task per (validator, role)
/// inside the slot's deadline scope, hand the tasks to a detached supervisor
/// and go back to waiting for the next slot. Work for slot S may still be
/// running when slot S+1 is dispatched.
pub struct DutyDispatcher {
    clock: SlotClock,
    resolver: Arc<dyn DutyResolver>,
    executor: Arc<dyn RoleExecutor>,
    state: watch::Sender<DispatcherState>,
    reports: Option<mpsc::UnboundedSender<SlotReport>>,
}

impl DutyDispatcher {
    pub fn new(
        clock: SlotClock,
        resolver: Arc<dyn DutyResolver>,
        executor: Arc<dyn RoleExecutor>,
    ) -> Self {
        let (state, _) = watch::channel(DispatcherState::WaitingForChainStart);
        Self {
            clock,
            resolver,
            executor,
            state,
            reports: None,
        }
    }

    /// Emit a [`SlotReport`] for every slot once all of its role tasks end.
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<SlotReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<DispatcherState> {
        self.state.subscribe()
    }

    /// Run until `shutdown` fires.
    ///
    /// Fails only when the slot clock cannot start; a cancelled start is a
    /// clean stop.
    pub async fn run(mut self, mut shutdown: Shutdown) -> Result<()> {
        self.set_state(DispatcherState::WaitingForChainStart);
        match self.clock.start(&mut shutdown).await {
            Ok(genesis_time) => {
                info!(genesis_time, "[sv-04] Slot clock started");
            }
            Err(e) if e.is_cancellation() => {
                self.set_state(DispatcherState::Stopped);
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "[sv-04] Slot clock failed to start");
                self.set_state(DispatcherState::Stopped);
                return Err(DispatcherError::Clock(e));
            }
        }

        let mut ticker = self.clock.ticker()?;
        let mut supervisors = JoinSet::new();
        loop {
            self.set_state(DispatcherState::WaitingForSlot);
            let slot = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                slot = ticker.next_slot() => slot,
            };
            SLOTS_PROCESSED.inc();

            let scope = self.clock.slot_scope(slot, shutdown.clone())?;
            if let Some(tasks) = self
                .dispatch_slot(slot, &scope)
                .instrument(info_span!("slot", slot))
                .await
            {
                self.set_state(DispatcherState::AwaitingCompletion { slot });
                supervisors.spawn(supervise(slot, tasks, self.reports.clone()));
            }
            // Reap supervisors of closed slots without waiting.
            while supervisors.try_join_next().is_some() {}
        }

        // Role tasks observe the same shutdown signal and end promptly.
        while supervisors.join_next().await.is_some() {}
        self.set_state(DispatcherState::Stopped);
        info!("[sv-04] Duty dispatcher stopped");
        Ok(())
    }

    async fn dispatch_slot(
        &self,
        slot: Slot,
        scope: &SlotScope,
    ) -> Option<JoinSet<RoleResult>> {
        self.set_state(DispatcherState::ResolvingDuties { slot });
        let duties = match scope.run(self.resolver.resolve_duties(slot)).await {
            Ok(Ok(duties)) => duties,
            Ok(Err(e)) => {
                DUTY_RESOLUTION_FAILURES.inc();
                warn!(error = %e, "[sv-04] Could not resolve duties, skipping slot");
                return None;
            }
            Err(exit) => {
                DUTY_RESOLUTION_FAILURES.inc();
                warn!(reason = %exit, "[sv-04] Duty resolution did not finish, skipping slot");
                return None;
            }
        };

        self.set_state(DispatcherState::DispatchingRoles { slot });
        let mut tasks = JoinSet::new();
        for duty in duties {
            let duty = Arc::new(duty);
            for &role in &duty.roles {
                match role {
                    Role::None => {
                        info!(pubkey = %duty.public_key.short(), "[sv-04] No duty this slot");
                        continue;
                    }
                    Role::Unrecognized(value) => {
                        ROLE_TASKS.with_label_values(&[role.as_str(), "skipped"]).inc();
                        warn!(
                            pubkey = %duty.public_key.short(),
                            role = value,
                            "[sv-04] Unrecognized role, skipping"
                        );
                        continue;
                    }
                    Role::Attester | Role::Proposer | Role::Aggregator => {}
                }

                let executor = self.executor.clone();
                let duty = duty.clone();
                let scope = scope.clone();
                debug!(pubkey = %duty.public_key.short(), %role, "[sv-04] Spawning role task");
                tasks.spawn(
                    async move {
                        let result = executor.execute(&duty, role, scope).await;
                        (duty.public_key, role, result)
                    }
                    .instrument(info_span!("role", %role)),
                );
            }
        }
        Some(tasks)
    }

    fn set_state(&self, state: DispatcherState) {
        self.state.send_replace(state);
    }
}

/// Wait for every role task of `slot` and report the outcome.
async fn supervise(
    slot: Slot,
    mut tasks: JoinSet<RoleResult>,
    reports: Option<mpsc::UnboundedSender<SlotReport>>,
) {
    let mut report = SlotReport::new(slot);
    report.spawned = tasks.len();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, role, Ok(()))) => {
                report.succeeded += 1;
                ROLE_TASKS.with_label_values(&[role.as_str(), "succeeded"]).inc();
            }
            Ok((_, role, Err(e))) if e.is_skip() => {
                report.skipped += 1;
                ROLE_TASKS.with_label_values(&[role.as_str(), "skipped"]).inc();
            }
            Ok((public_key, role, Err(e))) if e.is_abort() => {
                report.aborted += 1;
                ROLE_TASKS.with_label_values(&[role.as_str(), "aborted"]).inc();
                warn!(
                    slot,
                    pubkey = %public_key.short(),
                    %role,
                    error = %e,
                    "[sv-04] Role task aborted"
                );
            }
            Ok((public_key, role, Err(e))) => {
                report.failed += 1;
                ROLE_TASKS.with_label_values(&[role.as_str(), "failed"]).inc();
                error!(
                    slot,
                    pubkey = %public_key.short(),
                    %role,
                    error = %e,
                    "[sv-04] Role task failed"
                );
            }
            Err(e) => {
                report.failed += 1;
                error!(slot, error = %e, "[sv-04] Role task panicked");
            }
        }
    }

    debug!(
        slot,
        spawned = report.spawned,
        succeeded = report.succeeded,
        failed = report.failed,
        aborted = report.aborted,
        skipped = report.skipped,
        "[sv-04] Slot closed"
    );
    if let Some(reports) = reports {
        let _ = reports.send(report);
    }
}
