//! Runtime lifecycle: wire every component, run it, shut it down.

use crate::config::{ConfigError, ValidatorConfig};
use crate::connection::BeaconConnection;
use shared_types::{shutdown_channel, KeyManager, ShutdownHandle};
use std::sync::Arc;
use sv_01_slot_clock::{BeaconChainStart, SlotClock, SystemWallClock, WallClock};
use sv_02_task_stream::{StreamError, TaskStreamClient};
use sv_03_partial_signer::PartialSigner;
use sv_04_duty_dispatcher::{
    BeaconDutyResolver, DispatcherError, DispatcherState, DutyDispatcher, RouterConfig,
    SlotReport, SsvRoleExecutor, TaskRouter,
};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatcher(#[from] DispatcherError),

    #[error("component task failed: {0}")]
    Join(String),
}

/// Wired but not yet running validator client.
pub struct ValidatorRuntime {
    config: ValidatorConfig,
    connection: BeaconConnection,
    keys: Arc<dyn KeyManager>,
    wall: Arc<dyn WallClock>,
}

impl ValidatorRuntime {
    pub fn new(
        config: ValidatorConfig,
        connection: BeaconConnection,
        keys: Arc<dyn KeyManager>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            connection,
            keys,
            wall: Arc::new(SystemWallClock),
        })
    }

    pub fn with_wall_clock(mut self, wall: Arc<dyn WallClock>) -> Self {
        self.wall = wall;
        self
    }

    /// Spawn the task router and the duty dispatcher.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> RunningValidator {
        let chain = self.config.chain;
        let (shutdown, signal) = shutdown_channel();

        let client = TaskStreamClient::new(self.connection.tasks.clone(), self.keys.clone());
        let (router, router_handle) = TaskRouter::new(
            client,
            RouterConfig {
                reconnect_delay: self.config.stream.reconnect_delay,
                retention_slots: chain.slots_per_epoch,
                command_buffer: self.config.stream.router_command_buffer,
            },
        );

        let signer = Arc::new(PartialSigner::new(
            self.connection.beacon.clone(),
            self.keys.clone(),
            chain,
        ));
        let clock = SlotClock::new(
            chain,
            Arc::new(BeaconChainStart::new(self.connection.beacon.clone())),
            self.wall,
        );
        let resolver = Arc::new(BeaconDutyResolver::new(
            self.connection.beacon.clone(),
            self.keys.clone(),
            chain,
        ));
        let executor = Arc::new(SsvRoleExecutor::new(router_handle, signer));

        let (report_tx, reports) = mpsc::unbounded_channel();
        let dispatcher = DutyDispatcher::new(clock, resolver, executor).with_reports(report_tx);
        let state = dispatcher.state();

        info!(
            seconds_per_slot = chain.seconds_per_slot,
            slots_per_epoch = chain.slots_per_epoch,
            reconnect = self.config.stream.reconnect_delay.is_some(),
            "[runtime] Starting validator client"
        );
        let router = tokio::spawn(router.run(signal.clone()));
        let dispatcher = tokio::spawn(dispatcher.run(signal));

        RunningValidator {
            shutdown,
            state,
            reports,
            dispatcher,
            router,
        }
    }
}

/// Handle to a running validator client.
pub struct RunningValidator {
    shutdown: ShutdownHandle,
    state: watch::Receiver<DispatcherState>,
    reports: mpsc::UnboundedReceiver<SlotReport>,
    dispatcher: JoinHandle<Result<(), DispatcherError>>,
    router: JoinHandle<Result<(), StreamError>>,
}

impl RunningValidator {
    pub fn state(&self) -> watch::Receiver<DispatcherState> {
        self.state.clone()
    }

    /// Next closed slot, or `None` once the dispatcher is gone.
    pub async fn next_report(&mut self) -> Option<SlotReport> {
        self.reports.recv().await
    }

    /// Resolve once the dispatcher has stopped on its own.
    pub async fn stopped(&mut self) {
        let _ = self
            .state
            .wait_for(|state| *state == DispatcherState::Stopped)
            .await;
    }

    /// Signal shutdown and wait for every component to exit.
    ///
    /// Returns the reports of slots closed since the last
    /// [`RunningValidator::next_report`]. Only a dispatcher failure is an
    /// error; a router that ended with a stream error is logged.
    pub async fn shutdown(mut self) -> Result<Vec<SlotReport>, RuntimeError> {
        self.shutdown.trigger();

        let dispatched = self
            .dispatcher
            .await
            .map_err(|e| RuntimeError::Join(e.to_string()))?;
        match self.router.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "[runtime] Task router ended with a stream error"),
            Err(e) => error!(error = %e, "[runtime] Task router task failed"),
        }
        dispatched?;

        let mut pending = Vec::new();
        while let Ok(report) = self.reports.try_recv() {
            pending.push(report);
        }
        info!(pending_reports = pending.len(), "[runtime] Validator client stopped");
        Ok(pending)
    }
}
