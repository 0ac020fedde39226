//! Continuous sampling loop.

use crate::sampler::{SystemSampler, SystemSnapshot};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Longest stretch the loop sleeps without checking for cancellation.
const WAIT_STEP: Duration = Duration::from_secs(1);

/// Whole seconds to wait between samples. Fractions are truncated and the
/// result never drops below one second.
pub fn wait_seconds(interval_secs: f64) -> u64 {
    if interval_secs.is_finite() && interval_secs >= 1.0 {
        interval_secs.trunc() as u64
    } else {
        1
    }
}

/// Sample, hand each snapshot to `consumer`, then wait out the interval;
/// repeat until `token` is cancelled.
///
/// A snapshot already taken is always delivered. Cancellation during the
/// wait ends the loop without sampling again. Returns the number of
/// snapshots delivered.
pub async fn run<F>(
    sampler: &mut SystemSampler,
    interval_secs: f64,
    mut consumer: F,
    token: &CancellationToken,
) -> u64
where
    F: FnMut(&SystemSnapshot),
{
    let wait = wait_seconds(interval_secs);
    info!(interval_secs = wait, "continuous monitoring started");

    let mut delivered = 0u64;
    'outer: while !token.is_cancelled() {
        let snapshot = sampler.sample();
        consumer(&snapshot);
        delivered += 1;

        for _ in 0..wait {
            tokio::select! {
                _ = token.cancelled() => break 'outer,
                _ = sleep(WAIT_STEP) => {}
            }
        }
        debug!(delivered, "interval elapsed");
    }

    info!(delivered, "continuous monitoring stopped");
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsReader, ProcRoot};
    use tokio::time::Instant;

    fn sampler() -> (tempfile::TempDir, SystemSampler) {
        let dir = tempfile::tempdir().unwrap();
        let reader = MetricsReader::new(ProcRoot::with_prefix(dir.path()));
        (dir, SystemSampler::unprimed(reader))
    }

    #[test]
    fn wait_truncates_to_whole_seconds() {
        assert_eq!(wait_seconds(2.0), 2);
        assert_eq!(wait_seconds(2.9), 2);
        assert_eq!(wait_seconds(0.5), 1);
        assert_eq!(wait_seconds(f64::NAN), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_mid_wait_stops_promptly() {
        let (_dir, mut sampler) = sampler();
        let token = CancellationToken::new();
        let mut snapshots = Vec::new();
        let start = Instant::now();

        let canceller = async {
            sleep(Duration::from_millis(2500)).await;
            token.cancel();
        };
        let runner = run(&mut sampler, 30.0, |s| snapshots.push(s.clone()), &token);
        let (delivered, ()) = tokio::join!(runner, canceller);

        assert_eq!(delivered, 1);
        assert_eq!(snapshots.len(), 1);
        assert!(start.elapsed() < Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn samples_on_each_interval_until_consumer_cancels() {
        let (_dir, mut sampler) = sampler();
        let token = CancellationToken::new();
        let start = Instant::now();
        let mut seen = 0;

        let delivered = run(
            &mut sampler,
            2.0,
            |_| {
                seen += 1;
                if seen == 3 {
                    token.cancel();
                }
            },
            &token,
        )
        .await;

        assert_eq!(delivered, 3);
        assert_eq!(seen, 3);
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_sampling() {
        let (_dir, mut sampler) = sampler();
        let token = CancellationToken::new();
        token.cancel();

        let delivered = run(&mut sampler, 1.0, |_| panic!("sampled after cancel"), &token).await;
        assert_eq!(delivered, 0);
    }
}
