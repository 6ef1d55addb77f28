use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::interfaces::scheduler::ScheduledJob;

/// Runs registered jobs on their intervals, one task per job, until stopped.
pub struct Scheduler {
    jobs: Vec<Arc<dyn ScheduledJob>>,
    handles: Vec<JoinHandle<()>>,
    stop: Option<watch::Sender<bool>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            stop: None,
        }
    }

    pub fn register_job(&mut self, job: Arc<dyn ScheduledJob>) {
        self.jobs.push(job);
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    pub fn start(&mut self) {
        if self.stop.is_some() {
            return;
        }
        let (tx, rx) = watch::channel(false);
        self.stop = Some(tx);

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut tick = tokio::time::interval(job.interval());
            let mut rx = rx.clone();
            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            tracing::debug!(job = job.name(), "scheduled job tick");
                            if let Err(err) = job.run().await {
                                tracing::warn!(job = job.name(), error = %err, "scheduled job failed");
                            }
                        }
                        changed = rx.changed() => {
                            if changed.is_err() || *rx.borrow() {
                                break;
                            }
                        }
                    }
                }
            });
            self.handles.push(handle);
        }
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(true);
        }
        let handles = std::mem::take(&mut self.handles);
        for handle in handles {
            let _ = handle.await;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: Arc<AtomicUsize>,
        every: Duration,
    }

    #[async_trait::async_trait]
    impl ScheduledJob for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        fn interval(&self) -> Duration {
            self.every
        }

        async fn run(&self) -> crate::error::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn jobs_tick_on_their_interval_until_stopped() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler.register_job(Arc::new(CountingJob {
            runs: runs.clone(),
            every: minutes(1),
        }));

        assert!(!scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());

        // The first tick completes immediately, then one per interval.
        tokio::time::sleep(minutes(2) + Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        scheduler.stop().await;
        assert!(!scheduler.is_running());

        let after_stop = runs.load(Ordering::SeqCst);
        tokio::time::sleep(minutes(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_spawns_jobs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler.register_job(Arc::new(CountingJob {
            runs: runs.clone(),
            every: minutes(10),
        }));

        scheduler.start();
        scheduler.start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        scheduler.stop().await;
    }

    #[test]
    fn minutes_saturates_instead_of_wrapping() {
        assert_eq!(minutes(2), Duration::from_secs(120));
        assert_eq!(minutes(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
