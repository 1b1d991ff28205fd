//! # Validator Configuration
//!
//! Unified configuration for the validator client, defaults overridable
//! from the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SSV_SECONDS_PER_SLOT` | `12` | Slot duration |
//! | `SSV_SLOTS_PER_EPOCH` | `32` | Slots per epoch |
//! | `SSV_STREAM_RECONNECT_MS` | `2000` | Delay before re-opening the task stream, `0` disables |
//! | `SSV_ROUTER_COMMAND_BUFFER` | `64` | Pending claims buffered by the task router |
//! | `SSV_INTEROP_VALIDATORS` | `4` | Number of deterministic development keys |
//! | `SSV_INTEROP_START_INDEX` | `0` | First development key index |
//! | `SSV_GENESIS_TIME` | startup time | Genesis announced by the in-process task source |

use shared_types::ChainConfig;
use ssv_telemetry::TelemetryConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use sv_04_duty_dispatcher::DEFAULT_COMMAND_BUFFER;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("invalid chain configuration: {0}")]
    Chain(String),

    #[error("router command buffer must be greater than zero")]
    ZeroCommandBuffer,

    #[error("at least one validating key is required")]
    NoValidators,
}

/// Complete validator configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    pub chain: ChainConfig,
    pub stream: StreamConfig,
    pub telemetry: TelemetryConfig,
    pub dev: DevConfig,
}

/// Task stream and router configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// `None` stops routing when the stream closes.
    pub reconnect_delay: Option<Duration>,
    pub router_command_buffer: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Some(Duration::from_secs(2)),
            router_command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

/// Development settings: interop keys and the in-process task source.
#[derive(Debug, Clone)]
pub struct DevConfig {
    pub interop_validators: u64,
    pub interop_start_index: u64,
    /// `None` announces the startup time as genesis.
    pub genesis_time: Option<u64>,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            interop_validators: 4,
            interop_start_index: 0,
            genesis_time: None,
        }
    }
}

impl ValidatorConfig {
    /// Defaults overridden by the `SSV_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Some(seconds) = parse_var("SSV_SECONDS_PER_SLOT")? {
            config.chain.seconds_per_slot = seconds;
        }
        if let Some(slots) = parse_var("SSV_SLOTS_PER_EPOCH")? {
            config.chain.slots_per_epoch = slots;
        }
        if let Some(millis) = parse_var::<u64>("SSV_STREAM_RECONNECT_MS")? {
            config.stream.reconnect_delay = (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(buffer) = parse_var("SSV_ROUTER_COMMAND_BUFFER")? {
            config.stream.router_command_buffer = buffer;
        }
        if let Some(count) = parse_var("SSV_INTEROP_VALIDATORS")? {
            config.dev.interop_validators = count;
        }
        if let Some(index) = parse_var("SSV_INTEROP_START_INDEX")? {
            config.dev.interop_start_index = index;
        }
        if let Some(genesis_time) = parse_var("SSV_GENESIS_TIME")? {
            config.dev.genesis_time = Some(genesis_time);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chain.validate().map_err(ConfigError::Chain)?;
        if self.stream.router_command_buffer == 0 {
            return Err(ConfigError::ZeroCommandBuffer);
        }
        if self.dev.interop_validators == 0 {
            return Err(ConfigError::NoValidators);
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}
