//! # SSV Validator
//!
//! Runs the validator client against an in-process task source with
//! deterministic interop keys. Configuration comes from `SSV_*` environment
//! variables (see [`validator_runtime::config`]).

use anyhow::{Context, Result};
use shared_types::shutdown_channel;
use std::sync::Arc;
use sv_01_slot_clock::SystemWallClock;
use tracing::{debug, info, warn};
use validator_runtime::dev::in_process_source;
use validator_runtime::{BeaconConnection, LocalKeyManager, ValidatorConfig, ValidatorRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ValidatorConfig::from_env().context("Failed to load configuration")?;
    ssv_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  SSV Validator v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let keys = Arc::new(
        LocalKeyManager::interop(config.dev.interop_start_index, config.dev.interop_validators)
            .context("Failed to derive interop keys")?,
    );
    let (source_shutdown, source_signal) = shutdown_channel();
    let source = Arc::new(in_process_source(
        &config,
        keys.public_keys(),
        Arc::new(SystemWallClock),
        source_signal,
    ));

    let runtime = ValidatorRuntime::new(config, BeaconConnection::in_process(source), keys)
        .context("Invalid configuration")?;
    let mut running = runtime.start();

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            info!("Shutdown requested");
        }
        _ = running.stopped() => warn!("Dispatcher stopped on its own"),
    }

    let result = running.shutdown().await;
    source_shutdown.trigger();
    if let Ok(metrics) = ssv_telemetry::encode_metrics() {
        debug!("Final metrics:\n{metrics}");
    }
    result.context("Validator client failed")?;
    Ok(())
}
