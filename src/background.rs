//! Background task executor.
//!
//! Work closures run on a small pool of worker threads; their completion
//! callbacks are queued and run on the caller's thread from
//! [`BackgroundExecutor::process_results`], so callbacks never race the
//! frame loop.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

pub type TaskResult<T> = Result<T, String>;

type Job = Box<dyn FnOnce() + Send + 'static>;
type Completion = Box<dyn FnOnce() + Send + 'static>;

pub struct BackgroundExecutor {
    job_tx: Option<Sender<Job>>,
    done_tx: Sender<Completion>,
    done_rx: Receiver<Completion>,
    pending: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl BackgroundExecutor {
    pub fn new(worker_count: usize) -> Self {
        let (job_tx, job_rx) = channel::<Job>();
        let (done_tx, done_rx) = channel::<Completion>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let workers = (0..worker_count.max(1))
            .filter_map(|i| {
                let job_rx = Arc::clone(&job_rx);
                thread::Builder::new()
                    .name(format!("gesture-canvas-worker-{}", i))
                    .spawn(move || {
                        loop {
                            let job = job_rx.lock().recv();
                            match job {
                                Ok(job) => job(),
                                Err(_) => break,
                            }
                        }
                    })
                    .map_err(|e| warn!(error = %e, "Failed to spawn worker thread"))
                    .ok()
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            done_tx,
            done_rx,
            pending: Arc::new(AtomicUsize::new(0)),
            workers,
        }
    }

    /// Small pool sized for occasional export work.
    pub fn with_default_workers() -> Self {
        Self::new(2)
    }

    /// Run `work` on a worker; `callback` runs on the next
    /// [`process_results`](Self::process_results) after it finishes.
    pub fn spawn<T, W, C>(&self, name: &'static str, work: W, callback: C)
    where
        T: Send + 'static,
        W: FnOnce() -> TaskResult<T> + Send + 'static,
        C: FnOnce(TaskResult<T>) + Send + 'static,
    {
        let done_tx = self.done_tx.clone();
        self.pending.fetch_add(1, Ordering::SeqCst);
        let job: Job = Box::new(move || {
            debug!(task = name, "Background task started");
            let result = work();
            if let Err(ref e) = result {
                warn!(task = name, error = %e, "Background task failed");
            }
            let _ = done_tx.send(Box::new(move || callback(result)));
        });

        let sent = self
            .job_tx
            .as_ref()
            .map(|tx| tx.send(job).is_ok())
            .unwrap_or(false);
        if !sent {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            warn!(task = name, "Executor shut down, task dropped");
        }
    }

    /// Run queued completion callbacks. Returns how many ran.
    pub fn process_results(&self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.done_rx.try_recv() {
            completion();
            self.pending.fetch_sub(1, Ordering::SeqCst);
            ran += 1;
        }
        ran
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        // Closing the job channel lets workers exit once the queue is empty.
        self.job_tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
