// src/ingest/pacing.rs
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Spaces out adapter invocations by a fixed interval.
///
/// The first call to [`Pacer::ready`] returns immediately; each later call
/// waits until `interval` has passed since the previous one was released.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn ready(&mut self) {
        if let Some(last) = self.last {
            let due = last + self.interval;
            if !self.interval.is_zero() && Instant::now() < due {
                tracing::trace!(target: "ingest", wait_ms = self.interval.as_millis() as u64, "pacing");
                sleep_until(due).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_is_immediate_then_spaced() {
        let mut p = Pacer::new(Duration::from_secs(1));
        let t0 = Instant::now();
        p.ready().await;
        assert_eq!(t0.elapsed(), Duration::ZERO);

        p.ready().await;
        assert!(t0.elapsed() >= Duration::from_secs(1));

        p.ready().await;
        assert!(t0.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_work_between_calls_is_credited() {
        let mut p = Pacer::new(Duration::from_secs(1));
        p.ready().await;
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let t1 = Instant::now();
        p.ready().await;
        assert_eq!(t1.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn zero_interval_never_waits() {
        let mut p = Pacer::new(Duration::ZERO);
        for _ in 0..3 {
            p.ready().await;
        }
        assert!(p.interval().is_zero());
    }
}
