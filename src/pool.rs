//! Bounded worker pool for the resolution and install stages
//!
//! Each stage submits all of its work units at once and blocks until every
//! unit has finished, making the stage a synchronization barrier. The worker
//! count is fixed per run and independent of the number of items.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{ModsyncError, Result};

/// Default worker count, matching the original fixed pool size
pub const DEFAULT_WORKERS: usize = 4;

/// A fixed-size worker pool shared by every stage of one run
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Build a pool with the given number of workers (0 falls back to the
    /// default)
    pub fn new(workers: usize) -> Result<Self> {
        let workers = if workers == 0 {
            DEFAULT_WORKERS
        } else {
            workers
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("modsync-worker-{i}"))
            .build()
            .map_err(|e| ModsyncError::IoError {
                message: format!("failed to build worker pool: {e}"),
            })?;

        Ok(Self { pool })
    }

    /// Run every task to completion on the pool and return once all are done.
    ///
    /// Tasks may borrow from the caller's stack frame; completion order is
    /// unspecified.
    pub fn run_all<'env>(&self, tasks: Vec<Box<dyn FnOnce() + Send + 'env>>) {
        self.pool.scope(move |scope| {
            for task in tasks {
                scope.spawn(move |_| task());
            }
        });
    }
}
