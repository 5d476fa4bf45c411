//! Inter-row throttling
//!
//! The [`Sleeper`] seam lets tests count or skip delays without wall-clock time.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Something that can wait
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeps a uniformly random delay in `[min_delay, max_delay]` milliseconds
#[derive(Clone)]
pub struct Pacer {
    min_delay_ms: u64,
    max_delay_ms: u64,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("min_delay_ms", &self.min_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .finish_non_exhaustive()
    }
}

impl Pacer {
    /// Bounds are swapped if given in the wrong order
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: max_delay_ms.max(min_delay_ms),
            sleeper,
        }
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Waits once after `row`
    pub async fn wait(&self, row: usize) -> Duration {
        let delay = self.next_delay();
        tracing::debug!(row, delay_ms = delay.as_millis() as u64, "Pacing before next row");
        self.sleeper.sleep(delay).await;
        delay
    }
}
