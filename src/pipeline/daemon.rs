// src/pipeline/daemon.rs

//! Refresh loop with randomized sleeps.

use std::future::Future;

use rand::Rng;

use crate::pipeline::{IntervalSchedule, Refresher};

/// Counters for a finished daemon run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonSummary {
    pub cycles: usize,
    pub failures: usize,
}

/// Refresh until `shutdown` resolves.
///
/// A failed cycle is logged and the loop goes on; the previous feed file
/// stays in place. Shutdown is honored both mid-cycle and mid-sleep.
pub async fn run_daemon<R, F>(
    refresher: &Refresher,
    schedule: IntervalSchedule,
    rng: &mut R,
    shutdown: F,
) -> DaemonSummary
where
    R: Rng,
    F: Future<Output = ()>,
{
    let mut summary = DaemonSummary::default();
    tokio::pin!(shutdown);

    log::info!("Starting daemon mode. Press Ctrl+C to stop.");
    loop {
        tokio::select! {
            result = refresher.run_cycle() => {
                summary.cycles += 1;
                if let Err(e) = result {
                    summary.failures += 1;
                    log::error!("Refresh cycle {} failed: {}", summary.cycles, e);
                }
            }
            _ = &mut shutdown => break,
        }

        let delay = schedule.next_delay(rng);
        log::info!("Sleeping for {}s...", delay.as_secs());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut shutdown => break,
        }
    }

    log::info!(
        "Daemon stopped after {} cycles ({} failed)",
        summary.cycles,
        summary.failures
    );
    summary
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    use super::*;
    use crate::pipeline::fixtures::{ScriptedSource, article, config_in};
    use crate::storage::MemoryStateStore;

    async fn until_listed(source: Arc<ScriptedSource>, calls: usize) {
        while source.list_calls() < calls {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_failed_cycle_does_not_stop_loop() {
        let tmp = TempDir::new().unwrap();
        let config = Arc::new(config_in(tmp.path()));
        let source = Arc::new(ScriptedSource::new(vec![article("1", "<p>one</p>")]));
        source.fail_next_listings(1);
        let refresher = Refresher::new(
            Arc::clone(&config),
            source.clone(),
            Arc::new(MemoryStateStore::new()),
        );
        let schedule = IntervalSchedule::new(Duration::ZERO, Duration::from_millis(2)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let summary = run_daemon(&refresher, schedule, &mut rng, until_listed(source.clone(), 3)).await;

        assert!(summary.cycles >= 2);
        assert_eq!(summary.failures, 1);
        assert!(config.paths.output.exists());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_sleep() {
        let tmp = TempDir::new().unwrap();
        let config = Arc::new(config_in(tmp.path()));
        let source = Arc::new(ScriptedSource::new(vec![article("1", "<p>one</p>")]));
        let refresher = Refresher::new(config, source.clone(), Arc::new(MemoryStateStore::new()));
        let schedule =
            IntervalSchedule::new(Duration::from_secs(3600), Duration::from_secs(3600)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            run_daemon(&refresher, schedule, &mut rng, until_listed(source.clone(), 1)),
        )
        .await
        .expect("daemon should stop on shutdown");

        assert_eq!(source.list_calls(), 1);
        assert!(summary.cycles <= 1);
    }
}
