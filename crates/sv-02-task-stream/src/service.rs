//! Task stream client and its background pump.

use crate::domain::TaskEvent;
use crate::error::{Result, StreamError};
use shared_types::rpc::{ServerStream, SsvTaskService, StreamRequest};
use shared_types::{KeyManager, Shutdown, SsvTask, StreamTopic, TransportError};
use ssv_telemetry::metrics::STREAM_TASKS_RECEIVED;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// One task in flight between the pump and the consumer. A slow consumer
/// stalls the pump before its next receive, which throttles the upstream.
pub const TASK_CHANNEL_CAPACITY: usize = 1;

type PumpItem = std::result::Result<SsvTask, TransportError>;

/// Client side of the SSV task stream.
pub struct TaskStreamClient {
    api: Arc<dyn SsvTaskService>,
    keys: Arc<dyn KeyManager>,
}

impl TaskStreamClient {
    pub fn new(api: Arc<dyn SsvTaskService>, keys: Arc<dyn KeyManager>) -> Self {
        Self { api, keys }
    }

    /// Open a task stream for every locally held key and start its pump.
    ///
    /// The pump stops when the stream ends, fails, or `shutdown` fires; the
    /// returned receiver then reports [`TaskEvent::Closed`] or
    /// [`TaskEvent::Error`].
    pub async fn next_task(&self, shutdown: Shutdown) -> Result<TaskReceiver> {
        let public_keys = self.keys.fetch_validating_public_keys().await?;
        if public_keys.is_empty() {
            return Err(StreamError::NoPublicKeys);
        }
        for key in &public_keys {
            info!(pubkey = %key, "[sv-02] Validator key connected");
        }

        let request = StreamRequest {
            public_keys,
            topics: StreamTopic::ALL.to_vec(),
        };
        let stream = self
            .api
            .get_task_stream(request)
            .await
            .map_err(StreamError::Open)?;

        let (tx, rx) = mpsc::channel(TASK_CHANNEL_CAPACITY);
        let pump = tokio::spawn(pump(stream, tx, shutdown));
        Ok(TaskReceiver {
            rx,
            last_error: None,
            pump,
        })
    }
}

async fn pump(
    mut stream: ServerStream<SsvTask>,
    tx: mpsc::Sender<PumpItem>,
    mut shutdown: Shutdown,
) {
    loop {
        let item = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("[sv-02] Shutdown, stopping task pump");
                return;
            }
            item = stream.next() => item,
        };

        let (item, last) = match item {
            Some(Ok(task)) => {
                STREAM_TASKS_RECEIVED
                    .with_label_values(&[task.topic.as_str()])
                    .inc();
                debug!(
                    topic = %task.topic,
                    slot = task.slot(),
                    pubkey = %task.public_key.short(),
                    "[sv-02] Task received"
                );
                (Ok(task), false)
            }
            Some(Err(e)) => {
                warn!(error = %e, "[sv-02] Task stream failed");
                (Err(e), true)
            }
            None => {
                info!("[sv-02] Task stream ended");
                return;
            }
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            sent = tx.send(item) => {
                if sent.is_err() {
                    debug!("[sv-02] Task consumer gone, stopping pump");
                    return;
                }
            }
        }
        if last {
            return;
        }
    }
}

/// Consumer end of a task stream.
///
/// Dropping the receiver stops the pump.
pub struct TaskReceiver {
    rx: mpsc::Receiver<PumpItem>,
    last_error: Option<StreamError>,
    pump: JoinHandle<()>,
}

impl TaskReceiver {
    /// Next task, or the terminal state of the stream.
    ///
    /// Cancel-safe.
    pub async fn recv(&mut self) -> TaskEvent {
        match self.rx.recv().await {
            Some(Ok(task)) => TaskEvent::Task(task),
            Some(Err(e)) => {
                let err = StreamError::Receive(e);
                self.last_error = Some(err.clone());
                TaskEvent::Error(err)
            }
            None => match &self.last_error {
                Some(err) => TaskEvent::Error(err.clone()),
                None => TaskEvent::Closed,
            },
        }
    }

    /// The receive error that terminated the stream, if any.
    pub fn last_error(&self) -> Option<&StreamError> {
        self.last_error.as_ref()
    }
}

impl Drop for TaskReceiver {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
