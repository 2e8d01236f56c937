use std::sync::Mutex;
use std::time::Duration;

use crate::item::Priority;
use crate::utils::lock_or_die;

/* ---------- */

/// Statistics shared by every consumer of a run.
///
/// Guarded by its own lock, independent from the queue's.
#[derive(Debug, Default)]
pub struct RunStatistics(Mutex<Totals>);

/// A copy of the [`RunStatistics`] counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Real items consumed, sentinels excluded.
    pub consumed: u64,
    /// How many of the consumed items were urgent.
    pub urgent: u64,
    /// Sum of every consumed item's queueing latency.
    pub total_latency: Duration,
}

impl RunStatistics {
    /// Returns zeroed statistics.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the consumption of one real item.
    pub fn record(&self, latency: Duration, priority: Priority) {
        let mut totals = lock_or_die(&self.0, "run statistics");

        totals.consumed += 1;
        totals.total_latency += latency;
        if priority == Priority::Urgent {
            totals.urgent += 1;
        }
    }

    /// Returns a copy of the current counters.
    #[inline]
    pub fn snapshot(&self) -> Totals {
        *lock_or_die(&self.0, "run statistics")
    }
}

impl Totals {
    /// Returns the mean latency, or zero if nothing was consumed.
    pub fn average_latency(&self) -> Duration {
        match u32::try_from(self.consumed) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total_latency / count,
            Err(_) => self.total_latency.div_f64(self.consumed as f64),
        }
    }
}

/* ---------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let totals = RunStatistics::new().snapshot();

        assert_eq!(totals, Totals::default());
        assert_eq!(totals.average_latency(), Duration::ZERO);
    }

    #[test]
    fn records() {
        let stats = RunStatistics::new();

        stats.record(Duration::from_millis(10), Priority::Normal);
        stats.record(Duration::from_millis(30), Priority::Urgent);

        let totals = stats.snapshot();
        assert_eq!(totals.consumed, 2);
        assert_eq!(totals.urgent, 1);
        assert_eq!(totals.total_latency, Duration::from_millis(40));
        assert_eq!(totals.average_latency(), Duration::from_millis(20));
    }

    #[test]
    fn concurrent_records() {
        let stats = RunStatistics::new();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        stats.record(Duration::from_micros(1), Priority::Normal);
                    }
                });
            }
        });

        let totals = stats.snapshot();
        assert_eq!(totals.consumed, 800);
        assert_eq!(totals.total_latency, Duration::from_micros(800));
    }

    #[test]
    fn poisoned_lock_exits_the_process() {
        const CHILD: &str = "PRIOQ_POISONED_STATS_CHILD";

        // Re-run this test alone in a child process, which must die on the poisoned lock.
        if std::env::var_os(CHILD).is_none() {
            let status = std::process::Command::new(std::env::current_exe().unwrap())
                .args([
                    "--exact",
                    "stats::tests::poisoned_lock_exits_the_process",
                    "--test-threads=1",
                ])
                .env(CHILD, "1")
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .status()
                .expect("failed to re-run the test binary");

            assert_eq!(status.code(), Some(1));
            return;
        }

        let stats = RunStatistics::new();
        let poisoner = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _totals = stats.0.lock().unwrap();
                    panic!("poisoning the run statistics");
                })
                .join()
        });
        assert!(poisoner.is_err());
        assert!(stats.0.is_poisoned());

        stats.record(Duration::from_millis(1), Priority::Normal);
        unreachable!("recording into poisoned statistics returned");
    }
}
