//! Background metadata probing.
//!
//! A small pool of worker threads runs `describe` for each submitted source
//! and reports back over a channel. Results arrive in completion order,
//! which is not necessarily submission order; each result carries the key it
//! was submitted with so the caller can match it up.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use super::metadata::{TrackMetadata, describe};
use super::source::MediaSource;

type Job<K> = (K, Arc<dyn MediaSource>);

#[derive(Debug)]
pub struct ProbeOutcome<K> {
    pub key: K,
    pub metadata: TrackMetadata,
}

/// The pool no longer accepts work; the caller should describe the source
/// itself.
#[derive(Debug, Error)]
#[error("metadata probe pool has shut down")]
pub struct PoolClosed;

pub struct ProbePool<K> {
    jobs: Option<Sender<Job<K>>>,
    results: Receiver<ProbeOutcome<K>>,
    workers: Vec<JoinHandle<()>>,
    closing: Arc<AtomicBool>,
}

impl<K: Send + 'static> ProbePool<K> {
    pub fn new(workers: usize) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job<K>>();
        let (result_tx, result_rx) = mpsc::channel::<ProbeOutcome<K>>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let closing = Arc::new(AtomicBool::new(false));

        let workers = (0..workers.max(1))
            .map(|_| {
                let job_rx = Arc::clone(&job_rx);
                let result_tx = result_tx.clone();
                let closing = Arc::clone(&closing);
                thread::spawn(move || {
                    loop {
                        // Hold the lock only while waiting for the next job.
                        let job = match job_rx.lock() {
                            Ok(rx) => rx.recv(),
                            Err(_) => break,
                        };
                        let Ok((key, source)) = job else {
                            break;
                        };
                        if closing.load(Ordering::Relaxed) {
                            break;
                        }
                        let metadata = describe_guarded(source.as_ref());
                        if result_tx.send(ProbeOutcome { key, metadata }).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        Self {
            jobs: Some(job_tx),
            results: result_rx,
            workers,
            closing,
        }
    }

    /// Queue `source` for probing under `key`. Every accepted submission
    /// produces exactly one outcome.
    pub fn submit(&self, key: K, source: Arc<dyn MediaSource>) -> Result<(), PoolClosed> {
        let tx = self.jobs.as_ref().ok_or(PoolClosed)?;
        tx.send((key, source)).map_err(|_| PoolClosed)
    }

    /// Next finished probe, if any, without blocking.
    pub fn try_next(&self) -> Option<ProbeOutcome<K>> {
        self.results.try_recv().ok()
    }

    /// Next finished probe, waiting up to `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ProbeOutcome<K>> {
        self.results.recv_timeout(timeout).ok()
    }
}

/// `describe`, with a panic inside a decoder reported as file-name metadata
/// so the worker survives and the submission still completes.
fn describe_guarded(source: &dyn MediaSource) -> TrackMetadata {
    panic::catch_unwind(AssertUnwindSafe(|| describe(source))).unwrap_or_else(|_| {
        warn!(name = source.name(), "metadata probe panicked, using file name");
        TrackMetadata::from_name(source.name())
    })
}

impl<K> Drop for ProbePool<K> {
    fn drop(&mut self) {
        // Queued jobs are abandoned; idle workers exit once the channel closes.
        self.closing.store(true, Ordering::Relaxed);
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
