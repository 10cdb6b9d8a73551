//! Decorative view counter.
//!
//! The landing page shows a slowly climbing "players watching" number.
//! The ticker owns its background task and stops it on drop, so a torn
//! down view never leaves a timer running.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub struct ViewTicker {
    count: Arc<AtomicU64>,
    task: tokio::task::JoinHandle<()>,
}

impl ViewTicker {
    /// Start ticking from `initial`, incrementing once per `period`.
    pub fn start(initial: u64, period: Duration) -> Self {
        let count = Arc::new(AtomicU64::new(initial));
        Self {
            count: count.clone(),
            task: Self::spawn(count, period),
        }
    }

    /// Tick an externally owned counter, e.g. one the view already renders.
    pub fn attach(count: Arc<AtomicU64>, period: Duration) -> Self {
        Self {
            count: count.clone(),
            task: Self::spawn(count, period),
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn spawn(count: Arc<AtomicU64>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                count.fetch_add(1, Ordering::Relaxed);
            }
        })
    }
}

impl Drop for ViewTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
