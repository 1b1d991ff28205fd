//! Slot clock service and slot ticker.

use crate::domain::Timeline;
use crate::error::{ClockError, Result};
use crate::ports::{ChainStartSource, WallClock};
use shared_types::{ChainConfig, Shutdown, Slot, SlotScope};
use ssv_telemetry::metrics::CURRENT_SLOT;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Genesis-anchored slot clock.
///
/// Nothing advances until [`SlotClock::start`] has received the chain-start
/// notification. The genesis time is immutable once set.
pub struct SlotClock {
    chain: ChainConfig,
    source: Arc<dyn ChainStartSource>,
    wall: Arc<dyn WallClock>,
    timeline: Option<Timeline>,
}

impl SlotClock {
    pub fn new(
        chain: ChainConfig,
        source: Arc<dyn ChainStartSource>,
        wall: Arc<dyn WallClock>,
    ) -> Self {
        Self {
            chain,
            source,
            wall,
            timeline: None,
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Block until the chain-start notification supplies the genesis time.
    ///
    /// Returns the genesis time (seconds since the Unix epoch). Calling this
    /// again after a successful start returns the recorded genesis time
    /// without contacting the source.
    pub async fn start(&mut self, shutdown: &mut Shutdown) -> Result<u64> {
        if let Some(timeline) = &self.timeline {
            return Ok(timeline.genesis_time());
        }

        debug!("[sv-01] Waiting for chain start");
        let mut stream = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Err(ClockError::Cancelled),
            opened = self.source.wait_for_chain_start() => opened?,
        };

        loop {
            let item = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Err(ClockError::Cancelled),
                item = stream.next() => item,
            };

            match item {
                Some(Ok(notification)) if notification.started => {
                    let timeline = Timeline::anchor(
                        notification.genesis_time,
                        Duration::from_secs(self.chain.seconds_per_slot),
                        self.wall.now(),
                    );
                    self.timeline = Some(timeline);
                    info!(
                        genesis_time = notification.genesis_time,
                        current_slot = ?timeline.current_slot(),
                        "[sv-01] Chain started"
                    );
                    return Ok(notification.genesis_time);
                }
                Some(Ok(_)) => debug!("[sv-01] Chain-start notification without start flag"),
                Some(Err(e)) => return Err(ClockError::Transport(e)),
                None => return Err(ClockError::ChainStartClosed),
            }
        }
    }

    pub fn genesis_time(&self) -> Option<u64> {
        self.timeline.map(|t| t.genesis_time())
    }

    /// Slot containing the current instant; `None` before genesis.
    pub fn current_slot(&self) -> Result<Option<Slot>> {
        Ok(self.timeline()?.current_slot())
    }

    /// Wall-clock instant at which the slot after `slot` begins.
    pub fn slot_deadline(&self, slot: Slot) -> Result<SystemTime> {
        Ok(self.timeline()?.slot_deadline_system_time(slot))
    }

    /// Runtime instant of [`SlotClock::slot_deadline`], for timers.
    pub fn slot_deadline_instant(&self, slot: Slot) -> Result<Instant> {
        let timeline = self.timeline()?;
        Ok(timeline.instant_at(timeline.slot_deadline(slot)))
    }

    /// Deadline-bound scope for the work belonging to `slot`.
    pub fn slot_scope(&self, slot: Slot, shutdown: Shutdown) -> Result<SlotScope> {
        Ok(SlotScope::new(
            slot,
            self.slot_deadline_instant(slot)?,
            shutdown,
        ))
    }

    /// Slot ticker for a single consumer.
    pub fn ticker(&self) -> Result<SlotTicker> {
        Ok(SlotTicker {
            timeline: *self.timeline()?,
            last: None,
        })
    }

    fn timeline(&self) -> Result<&Timeline> {
        self.timeline.as_ref().ok_or(ClockError::NotStarted)
    }
}

/// Unbuffered slot notifications.
///
/// Each call to [`SlotTicker::next_slot`] waits for the next slot boundary.
/// Slots are strictly increasing and each is delivered at most once. A
/// consumer that falls behind skips straight to the current slot.
#[derive(Debug)]
pub struct SlotTicker {
    timeline: Timeline,
    last: Option<Slot>,
}

impl SlotTicker {
    /// Wait for the next slot boundary and return its slot.
    ///
    /// Cancel-safe: dropping the future before it resolves delivers nothing.
    pub async fn next_slot(&mut self) -> Slot {
        let target = self.next_target();
        let start = self.timeline.instant_at(self.timeline.slot_start(target));
        tokio::time::sleep_until(start).await;

        if let Some(last) = self.last {
            if target > last + 1 {
                warn!(
                    skipped = target - last - 1,
                    slot = target,
                    "[sv-01] Ticker fell behind, skipping missed slots"
                );
            }
        }
        self.last = Some(target);
        CURRENT_SLOT.set(target as f64);
        target
    }

    pub fn last_slot(&self) -> Option<Slot> {
        self.last
    }

    fn next_target(&self) -> Slot {
        match (self.last, self.timeline.current_slot()) {
            // Genesis still ahead: the first tick is genesis itself.
            (None, None) => 0,
            (None, Some(current)) => current + 1,
            (Some(last), None) => last + 1,
            (Some(last), Some(current)) => (last + 1).max(current),
        }
    }
}
