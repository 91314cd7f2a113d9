//! Batching HTTP shipper shared by the span exporter and the error reporter

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 1024;

/// Where and how a shipper delivers its batches
#[derive(Debug, Clone)]
pub struct ShipperConfig {
    pub endpoint: String,
    /// Header carrying the credential, e.g. `x-api-key`
    pub auth_header: &'static str,
    pub token: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

/// Sending half of a background shipping task.
///
/// Records are queued with `try_send`; when the queue is full the record is
/// dropped with a warning rather than stalling the request path.
pub struct Shipper<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Shipper<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Shipper<T>
where
    T: Serialize + Send + 'static,
{
    /// Spawn the shipping task on the current tokio runtime.
    pub fn spawn(config: ShipperConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let client = reqwest::Client::new();
        tokio::spawn(run(config, client, rx));
        Self { tx }
    }

    /// A shipper whose receiving side is handed back instead of being shipped.
    pub fn detached(capacity: usize) -> (Self, mpsc::Receiver<T>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue a record; returns false when it was dropped.
    pub fn send(&self, record: T) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("shipper queue full, dropping record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

async fn run<T: Serialize>(config: ShipperConfig, client: reqwest::Client, mut rx: mpsc::Receiver<T>) {
    let batch_size = config.batch_size.max(1);
    let mut batch = Vec::with_capacity(batch_size);
    // `interval` panics on a zero period.
    let mut ticker = tokio::time::interval(config.flush_interval.max(Duration::from_millis(1)));

    loop {
        tokio::select! {
            record = rx.recv() => match record {
                Some(record) => {
                    batch.push(record);
                    if batch.len() >= batch_size {
                        flush(&config, &client, &mut batch).await;
                    }
                }
                None => {
                    flush(&config, &client, &mut batch).await;
                    break;
                }
            },
            _ = ticker.tick() => flush(&config, &client, &mut batch).await,
        }
    }
}

async fn flush<T: Serialize>(config: &ShipperConfig, client: &reqwest::Client, batch: &mut Vec<T>) {
    if batch.is_empty() {
        return;
    }
    let records = std::mem::take(batch);

    let result = client
        .post(&config.endpoint)
        .header(config.auth_header, &config.token)
        .json(&records)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            tracing::trace!(count = records.len(), endpoint = %config.endpoint, "batch shipped");
        }
        Ok(response) => {
            tracing::warn!(
                status = %response.status(),
                endpoint = %config.endpoint,
                dropped = records.len(),
                "collector rejected batch"
            );
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                endpoint = %config.endpoint,
                dropped = records.len(),
                "failed to ship batch"
            );
        }
    }
}
