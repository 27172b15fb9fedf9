//! Bounded concurrency for batches of async work.
//!
//! At most `concurrency` futures are in flight; as soon as one completes the
//! next item is started, so the pool always makes progress while work
//! remains. Results are yielded in completion order.
//!
//! Failure is fail-fast: the first error is returned immediately, futures
//! still in flight are dropped (cancelling their requests) and no further
//! items are started.

use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::config::DEFAULT_CONCURRENCY;

/// Runs async work items with a fixed concurrency ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedPool {
    concurrency: usize,
}

impl Default for BoundedPool {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl BoundedPool {
    /// Create a pool; a ceiling of 0 is treated as 1
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `worker` for every item and collect the results in completion order
    pub async fn run<I, T, R, E, F, Fut>(&self, items: I, worker: F) -> Result<Vec<R>, E>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let mut results = Vec::new();
        self.for_each_completed(items, worker, |result| results.push(result))
            .await?;
        Ok(results)
    }

    /// Run `worker` for every item, handing each result to `on_result` as it completes
    ///
    /// `on_result` runs on the calling task, one result at a time, so it may
    /// mutate local state without synchronization.
    pub async fn for_each_completed<I, T, R, E, F, Fut, G>(
        &self,
        items: I,
        worker: F,
        mut on_result: G,
    ) -> Result<(), E>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        G: FnMut(R),
    {
        let mut in_flight = stream::iter(items)
            .map(worker)
            .buffer_unordered(self.concurrency);

        while let Some(result) = in_flight.next().await {
            on_result(result?);
        }

        Ok(())
    }
}
