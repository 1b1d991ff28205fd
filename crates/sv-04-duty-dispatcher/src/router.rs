//! SSV task router.
//!
//! Sole consumer of the task stream. Role tasks claim the task they need by
//! `(public key, topic, slot)` and receive it on a oneshot channel, whether
//! it arrived before or after the claim. The inbox and the waiting claims are
//! owned by the router task; other tasks talk to it only through
//! [`RouterHandle`].
//!
//! Flow:
//! 1. A role task calls [`RouterHandle::claim`]
//! 2. The router answers from its inbox, or parks the claim
//! 3. A matching task from the stream completes the parked claim
//! 4. Inbox entries more than one epoch behind the newest slot are pruned

use crate::error::RouterError;
use shared_types::{BlsPubKey, Shutdown, Slot, SsvTask, StreamTopic};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use sv_02_task_stream::{StreamError, TaskEvent, TaskReceiver, TaskStreamClient};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn};

/// Default capacity of the claim command channel.
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

/// Claim identity of a signing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClaimKey {
    pub public_key: BlsPubKey,
    pub topic: StreamTopic,
    pub slot: Slot,
}

enum RouterCommand {
    Claim {
        key: ClaimKey,
        reply: oneshot::Sender<SsvTask>,
    },
}

/// Cloneable handle used by role tasks.
#[derive(Clone)]
pub struct RouterHandle {
    commands: mpsc::Sender<RouterCommand>,
}

impl RouterHandle {
    /// Wait for the task addressed to `public_key` under `topic` for `slot`.
    ///
    /// Not bounded by itself; callers race it against their slot scope.
    pub async fn claim(
        &self,
        public_key: BlsPubKey,
        topic: StreamTopic,
        slot: Slot,
    ) -> Result<SsvTask, RouterError> {
        let (reply, receiver) = oneshot::channel();
        let key = ClaimKey {
            public_key,
            topic,
            slot,
        };
        self.commands
            .send(RouterCommand::Claim { key, reply })
            .await
            .map_err(|_| RouterError::Closed)?;
        receiver.await.map_err(|_| RouterError::Closed)
    }
}

/// Why a stream drain ended without an error.
enum DrainEnd {
    /// The stream closed, or shutdown fired.
    StreamClosed,
    /// Every [`RouterHandle`] is gone; nobody can claim tasks any more.
    Unclaimed,
}

/// Router configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Delay before re-opening a closed or failed stream. `None` stops the
    /// router instead.
    pub reconnect_delay: Option<Duration>,
    /// Slots per epoch, the inbox retention window.
    pub retention_slots: u64,
    pub command_buffer: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: None,
            retention_slots: 32,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

pub struct TaskRouter {
    client: TaskStreamClient,
    config: RouterConfig,
    commands: mpsc::Receiver<RouterCommand>,
    inbox: HashMap<ClaimKey, VecDeque<SsvTask>>,
    waiters: HashMap<ClaimKey, VecDeque<oneshot::Sender<SsvTask>>>,
    newest_slot: Slot,
}

impl TaskRouter {
    pub fn new(client: TaskStreamClient, config: RouterConfig) -> (Self, RouterHandle) {
        let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
        let router = Self {
            client,
            config,
            commands: rx,
            inbox: HashMap::new(),
            waiters: HashMap::new(),
            newest_slot: 0,
        };
        (router, RouterHandle { commands: tx })
    }

    /// Consume the task stream until shutdown, until every handle is
    /// dropped, or until the stream closes with reconnection disabled.
    ///
    /// Open and receive errors are returned only when reconnection is
    /// disabled. Dropping the router fails every parked claim with
    /// [`RouterError::Closed`].
    pub async fn run(mut self, mut shutdown: Shutdown) -> Result<(), StreamError> {
        loop {
            let pump_shutdown = shutdown.clone();
            let opened = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("[sv-04] Task router stopped while opening the stream");
                    return Ok(());
                }
                opened = self.client.next_task(pump_shutdown) => opened,
            };
            let outcome = match opened {
                Ok(receiver) => self.drain(receiver, &mut shutdown).await,
                Err(e) => {
                    warn!(error = %e, "[sv-04] Could not open task stream");
                    Err(e)
                }
            };
            if shutdown.is_cancelled() {
                info!("[sv-04] Task router stopped");
                return Ok(());
            }
            let outcome = match outcome {
                Ok(DrainEnd::Unclaimed) => {
                    info!("[sv-04] All router handles dropped, router stopping");
                    return Ok(());
                }
                Ok(DrainEnd::StreamClosed) => Ok(()),
                Err(e) => Err(e),
            };

            let Some(delay) = self.config.reconnect_delay else {
                info!("[sv-04] Task stream finished, router stopping");
                return outcome;
            };
            info!(delay_ms = delay.as_millis() as u64, "[sv-04] Re-opening task stream");
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn drain(
        &mut self,
        mut receiver: TaskReceiver,
        shutdown: &mut Shutdown,
    ) -> Result<DrainEnd, StreamError> {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Ok(DrainEnd::StreamClosed),
                command = self.commands.recv() => match command {
                    Some(RouterCommand::Claim { key, reply }) => self.claim(key, reply),
                    None => return Ok(DrainEnd::Unclaimed),
                },
                event = receiver.recv() => match event {
                    TaskEvent::Task(task) => self.route(task),
                    TaskEvent::Closed => return Ok(DrainEnd::StreamClosed),
                    TaskEvent::Error(e) => return Err(e),
                },
            }
        }
    }

    fn claim(&mut self, key: ClaimKey, reply: oneshot::Sender<SsvTask>) {
        if let Some(task) = self.inbox.get_mut(&key).and_then(VecDeque::pop_front) {
            if self.inbox.get(&key).is_some_and(VecDeque::is_empty) {
                self.inbox.remove(&key);
            }
            if let Err(task) = reply.send(task) {
                self.inbox.entry(key).or_default().push_front(task);
            }
            return;
        }
        let queue = self.waiters.entry(key).or_default();
        queue.retain(|waiter| !waiter.is_closed());
        queue.push_back(reply);
    }

    fn route(&mut self, task: SsvTask) {
        let slot = task.slot();
        let span = info_span!("ssv.process_task", topic = %task.topic, slot);
        let _entered = span.enter();

        match task.topic {
            StreamTopic::SignAttestation | StreamTopic::SignBlock => {}
            StreamTopic::CheckBlock | StreamTopic::CheckAttestation => {
                debug!(pubkey = %task.public_key.short(), "[sv-04] Check task received, ignoring");
                return;
            }
            StreamTopic::SignAggregation => {
                info!(
                    pubkey = %task.public_key.short(),
                    "[sv-04] Aggregation signing not supported, dropping task"
                );
                return;
            }
        }

        if slot > self.newest_slot {
            self.newest_slot = slot;
            self.prune();
        }

        let key = ClaimKey {
            public_key: task.public_key,
            topic: task.topic,
            slot,
        };
        let mut task = task;
        if let Some(queue) = self.waiters.get_mut(&key) {
            while let Some(waiter) = queue.pop_front() {
                match waiter.send(task) {
                    Ok(()) => {
                        if queue.is_empty() {
                            self.waiters.remove(&key);
                        }
                        debug!("[sv-04] Task delivered to waiting claim");
                        return;
                    }
                    // Claim abandoned (its scope ended); try the next one.
                    Err(returned) => task = returned,
                }
            }
            self.waiters.remove(&key);
        }
        debug!("[sv-04] Task queued until claimed");
        self.inbox.entry(key).or_default().push_back(task);
    }

    fn prune(&mut self) {
        let horizon = self.newest_slot.saturating_sub(self.config.retention_slots);
        let before = self.inbox.len();
        self.inbox.retain(|key, _| key.slot >= horizon);
        self.waiters.retain(|key, queue| {
            queue.retain(|waiter| !waiter.is_closed());
            key.slot >= horizon || !queue.is_empty()
        });
        let pruned = before - self.inbox.len();
        if pruned > 0 {
            debug!(pruned, horizon, "[sv-04] Pruned stale unclaimed tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared_types::rpc::{ServerStream, SsvTaskService, StreamRequest};
    use shared_types::{
        shutdown_channel, AttestationData, BeaconBlock, KeyError, KeyManager, Root, Signature,
        TaskPayload, TransportError,
    };
    use std::sync::Arc;

    type Item = Result<SsvTask, TransportError>;

    /// Serves one pre-built stream per call, then refuses.
    struct QueuedStreams {
        streams: Mutex<VecDeque<ServerStream<SsvTask>>>,
    }

    impl QueuedStreams {
        fn new(streams: Vec<ServerStream<SsvTask>>) -> Arc<Self> {
            Arc::new(Self {
                streams: Mutex::new(streams.into()),
            })
        }
    }

    #[async_trait]
    impl SsvTaskService for QueuedStreams {
        async fn get_task_stream(
            &self,
            _request: StreamRequest,
        ) -> Result<ServerStream<SsvTask>, TransportError> {
            self.streams
                .lock()
                .pop_front()
                .ok_or_else(|| TransportError::Unavailable("no more streams".into()))
        }
    }

    /// Accepts the open request and never answers it.
    struct Unresponsive;

    #[async_trait]
    impl SsvTaskService for Unresponsive {
        async fn get_task_stream(
            &self,
            _request: StreamRequest,
        ) -> Result<ServerStream<SsvTask>, TransportError> {
            std::future::pending().await
        }
    }

    struct OneKey;

    #[async_trait]
    impl KeyManager for OneKey {
        async fn fetch_validating_public_keys(&self) -> Result<Vec<BlsPubKey>, KeyError> {
            Ok(vec![key()])
        }

        async fn sign(&self, _: &BlsPubKey, _: &Root) -> Result<Signature, KeyError> {
            Err(KeyError::Backend("not used".into()))
        }
    }

    fn key() -> BlsPubKey {
        BlsPubKey::new([1u8; 48])
    }

    fn attestation_task(slot: Slot) -> SsvTask {
        SsvTask {
            public_key: key(),
            topic: StreamTopic::SignAttestation,
            payload: TaskPayload::Attestation(AttestationData {
                slot,
                ..AttestationData::default()
            }),
        }
    }

    fn listed(items: Vec<Item>) -> ServerStream<SsvTask> {
        Box::pin(tokio_stream::iter(items))
    }

    /// A stream whose items are pushed by the test.
    fn pushed() -> (mpsc::UnboundedSender<Item>, ServerStream<SsvTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        (tx, Box::pin(stream))
    }

    fn router(
        streams: Arc<QueuedStreams>,
        reconnect_delay: Option<Duration>,
    ) -> (TaskRouter, RouterHandle) {
        let client = TaskStreamClient::new(streams, Arc::new(OneKey));
        TaskRouter::new(
            client,
            RouterConfig {
                reconnect_delay,
                ..RouterConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_claim_before_arrival() {
        let (tx, stream) = pushed();
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();
        tokio::spawn(router.run(shutdown));

        let claim = tokio::spawn({
            let handle = handle.clone();
            async move { handle.claim(key(), StreamTopic::SignAttestation, 5).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(Ok(attestation_task(5))).unwrap();

        let task = tokio::time::timeout(Duration::from_secs(1), claim)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(task.slot(), 5);
    }

    #[tokio::test]
    async fn test_task_waits_in_inbox_until_claimed() {
        let (tx, stream) = pushed();
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();
        tokio::spawn(router.run(shutdown));

        tx.send(Ok(attestation_task(7))).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let task = handle
            .claim(key(), StreamTopic::SignAttestation, 7)
            .await
            .unwrap();
        assert_eq!(task.slot(), 7);
    }

    #[tokio::test]
    async fn test_topic_and_slot_must_match() {
        let (tx, stream) = pushed();
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();
        tokio::spawn(router.run(shutdown));

        let block = SsvTask {
            public_key: key(),
            topic: StreamTopic::SignBlock,
            payload: TaskPayload::Block(BeaconBlock {
                slot: 7,
                ..BeaconBlock::default()
            }),
        };
        tx.send(Ok(block)).unwrap();
        tx.send(Ok(attestation_task(8))).unwrap();

        let wrong_slot = tokio::time::timeout(
            Duration::from_millis(50),
            handle.claim(key(), StreamTopic::SignAttestation, 7),
        )
        .await;
        assert!(wrong_slot.is_err());

        let task = handle.claim(key(), StreamTopic::SignBlock, 7).await.unwrap();
        assert!(matches!(task.payload, TaskPayload::Block(_)));
    }

    #[tokio::test]
    async fn test_check_and_aggregation_tasks_are_dropped() {
        let mut check = attestation_task(3);
        check.topic = StreamTopic::CheckAttestation;
        let mut aggregation = attestation_task(3);
        aggregation.topic = StreamTopic::SignAggregation;

        let stream = listed(vec![Ok(check), Ok(aggregation)]);
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();
        let running = tokio::spawn(router.run(shutdown));

        // Stream ends after the two ignored tasks; parked claims fail.
        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            handle.claim(key(), StreamTopic::SignAggregation, 3),
        )
        .await
        .unwrap();
        assert_eq!(outcome.unwrap_err(), RouterError::Closed);
        assert!(running.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_receive_error_stops_router_without_reconnect() {
        let stream = listed(vec![Err(TransportError::Unavailable("reset".into()))]);
        let (router, _handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();

        let result = tokio::time::timeout(Duration::from_secs(1), router.run(shutdown))
            .await
            .unwrap();
        assert!(matches!(result, Err(StreamError::Receive(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnects_after_delay() {
        let first = listed(vec![Err(TransportError::Unavailable("reset".into()))]);
        let second = listed(vec![Ok(attestation_task(9))]);
        let (router, handle) = router(
            QueuedStreams::new(vec![first, second]),
            Some(Duration::from_secs(2)),
        );
        let (shutdown_handle, shutdown) = shutdown_channel();
        let running = tokio::spawn(router.run(shutdown));

        let started = tokio::time::Instant::now();
        let task = handle
            .claim(key(), StreamTopic::SignAttestation, 9)
            .await
            .unwrap();
        assert_eq!(task.slot(), 9);
        assert!(started.elapsed() >= Duration::from_secs(2));

        shutdown_handle.trigger();
        assert!(running.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tasks_are_pruned() {
        let (tx, stream) = pushed();
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (_shutdown_handle, shutdown) = shutdown_channel();
        tokio::spawn(router.run(shutdown));

        tx.send(Ok(attestation_task(1))).unwrap();
        tx.send(Ok(attestation_task(40))).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let stale = tokio::time::timeout(
            Duration::from_secs(1),
            handle.claim(key(), StreamTopic::SignAttestation, 1),
        )
        .await;
        assert!(stale.is_err());
        assert!(handle
            .claim(key(), StreamTopic::SignAttestation, 40)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_stops_router() {
        let (_tx, stream) = pushed();
        let (router, handle) = router(QueuedStreams::new(vec![stream]), None);
        let (shutdown_handle, shutdown) = shutdown_channel();
        let running = tokio::spawn(router.run(shutdown));

        shutdown_handle.trigger();
        assert!(tokio::time::timeout(Duration::from_secs(1), running)
            .await
            .unwrap()
            .unwrap()
            .is_ok());
        assert_eq!(
            handle
                .claim(key(), StreamTopic::SignAttestation, 1)
                .await
                .unwrap_err(),
            RouterError::Closed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_while_opening_stream() {
        let client = TaskStreamClient::new(Arc::new(Unresponsive), Arc::new(OneKey));
        let (router, _handle) = TaskRouter::new(
            client,
            RouterConfig {
                reconnect_delay: Some(Duration::from_secs(2)),
                ..RouterConfig::default()
            },
        );
        let (shutdown_handle, shutdown) = shutdown_channel();
        let running = tokio::spawn(router.run(shutdown));

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_handle.trigger();
        let result = tokio::time::timeout(Duration::from_secs(2), running)
            .await
            .expect("router must stop while the stream is still opening")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_every_handle_stops_router() {
        let (_tx, stream) = pushed();
        let (router, handle) = router(
            QueuedStreams::new(vec![stream]),
            Some(Duration::from_secs(1)),
        );
        let (_shutdown_handle, shutdown) = shutdown_channel();
        let running = tokio::spawn(router.run(shutdown));

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);
        let result = tokio::time::timeout(Duration::from_secs(10), running)
            .await
            .expect("router must not reconnect once nobody can claim")
            .unwrap();
        assert!(result.is_ok());
    }
}
