//! Worker pool dispatcher
//!
//! Items are fanned out to a dedicated rayon pool. Workers send their results
//! over a channel to the calling thread, which sees them in completion order.
//! A panicking task is caught and still produces a completion, so the number
//! of completions always equals the number of items.

use crossbeam_channel::unbounded;
use std::panic::{self, AssertUnwindSafe};

use crate::error::PipelineError;

/// What a task produced
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult<O> {
    /// The task returned normally
    Done(O),
    /// The task panicked; carries the panic message
    Panicked(String),
}

/// One finished task
#[derive(Debug, Clone, PartialEq)]
pub struct Completion<O> {
    /// Position of the item in the submitted slice
    pub index: usize,
    pub result: TaskResult<O>,
}

/// Bounded pool of workers
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool with exactly `workers` threads
    pub fn new(workers: usize) -> Result<Self, PipelineError> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("music-batch-worker-{}", i))
            .build()
            .map_err(|e| PipelineError::pool_build(format!("Failed to build worker pool: {}", e)))?;

        log::debug!("Configured worker pool with {} threads", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` once per item and hand every completion to `on_complete`.
    ///
    /// `on_complete` runs on the calling thread only. Returns the number of
    /// completions delivered.
    pub fn dispatch<I, O, F, C>(&self, items: &[I], task: F, mut on_complete: C) -> usize
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync,
        C: FnMut(Completion<O>),
    {
        let (tx, rx) = unbounded::<Completion<O>>();
        let task = &task;
        let pool = &self.pool;

        std::thread::scope(|s| {
            s.spawn(move || {
                pool.scope(|scope| {
                    for (index, item) in items.iter().enumerate() {
                        let tx = tx.clone();
                        scope.spawn(move |_| {
                            let caught = panic::catch_unwind(AssertUnwindSafe(|| task(item)));
                            let result = match caught {
                                Ok(output) => TaskResult::Done(output),
                                Err(payload) => {
                                    TaskResult::Panicked(panic_message(payload.as_ref()))
                                }
                            };
                            // The receiver outlives every sender
                            let _ = tx.send(Completion { index, result });
                        });
                    }
                });
            });

            let mut delivered = 0;
            for completion in rx.iter() {
                delivered += 1;
                on_complete(completion);
            }
            delivered
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker task panicked".to_string()
    }
}
