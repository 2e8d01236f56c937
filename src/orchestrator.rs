use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use crate::consumer::{ConsumerContext, ConsumerTask};
use crate::item::Item;
use crate::producer::{ProducerContext, ProducerTask};
use crate::queue::BoundedPriorityQueue;
use crate::scoped_runtime::ScopedRuntime;
use crate::stats::{RunStatistics, Totals};
use crate::Error;

/* ---------- */

/// Number of items each producer emits when not configured otherwise.
pub const DEFAULT_ITEMS_PER_PRODUCER: usize = 20;

/// Describes a run: how many producers and consumers share a queue of which capacity.
///
/// # Examples
///
/// ```
/// # use prioq::RunConfig;
/// let config = RunConfig::new(2, 3, 10).items_per_producer(5).seed(42);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_items(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    producers: usize,
    consumers: usize,
    capacity: usize,
    items_per_producer: usize,
    seed: u64,
    cores: Option<Vec<usize>>,
}

impl RunConfig {
    /// Returns a configuration with [`DEFAULT_ITEMS_PER_PRODUCER`] items per producer and a random seed.
    pub fn new(producers: usize, consumers: usize, capacity: usize) -> Self {
        Self {
            producers,
            consumers,
            capacity,
            items_per_producer: DEFAULT_ITEMS_PER_PRODUCER,
            seed: rand::random(),
            cores: None,
        }
    }

    /// Sets how many items each producer emits.
    #[inline]
    pub fn items_per_producer(mut self, items: usize) -> Self {
        self.items_per_producer = items;
        self
    }

    /// Sets the seed producers derive their own seed from.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Pins the tasks' threads round-robin over `cores`, consumers first.
    #[inline]
    pub fn pinned(mut self, cores: Vec<usize>) -> Self {
        self.cores = Some(cores);
        self
    }

    /// Returns the number of real items the producers emit in total.
    #[inline]
    pub fn total_items(&self) -> usize {
        self.producers.saturating_mul(self.items_per_producer)
    }

    /// Checks that every count is positive.
    pub fn validate(&self) -> Result<(), Error> {
        let counts = [
            ("producers", self.producers),
            ("consumers", self.consumers),
            ("buffer capacity", self.capacity),
            ("items per producer", self.items_per_producer),
        ];

        if let Some((name, _)) = counts.iter().find(|(_, count)| *count == 0) {
            return Err(Error::config(format!("{name} must be greater than 0")));
        }

        if self.producers.checked_mul(self.items_per_producer).is_none() {
            return Err(Error::config("too many items to produce"));
        }

        if self.cores.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::config("no cpu to pin the tasks to"));
        }

        Ok(())
    }

    #[inline]
    fn core_for(&self, nth_task: usize) -> Option<Vec<usize>> {
        let cores = self.cores.as_ref()?;
        Some(vec![cores[nth_task % cores.len()]])
    }
}

impl Display for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration: {} producers, {} consumers, buffer size {}, {} items/producer (total items = {})",
            self.producers,
            self.consumers,
            self.capacity,
            self.items_per_producer,
            self.total_items()
        )
    }
}

/* ---------- */

/// Runs producers and consumers over a shared queue until every task terminated.
///
/// Consumers are launched first, then producers. Once every producer finished, one sentinel
/// per launched consumer is queued, then every consumer is joined.
///
/// # Errors
///
/// Returns an error if `config` is invalid or if a thread couldn't be spawned.
/// In the latter case, the tasks already launched still run to completion before the error is returned.
///
/// # Examples
///
/// ```
/// # use prioq::RunConfig;
/// let config = RunConfig::new(2, 3, 10).items_per_producer(5);
/// let report = prioq::run(&config).unwrap();
///
/// assert_eq!(report.consumed(), 10);
/// assert_eq!(report.consumers_terminated(), 3);
/// ```
pub fn run(config: &RunConfig) -> Result<RunReport, Error> {
    config.validate()?;

    let capacity = NonZeroUsize::new(config.capacity)
        .ok_or_else(|| Error::config("buffer capacity must be greater than 0"))?;
    let queue = BoundedPriorityQueue::new(capacity);
    let stats = RunStatistics::new();
    let started = Instant::now();

    let (launched, producers_finished, consumers_terminated) = std::thread::scope(|scope| {
        let mut consumers = ScopedRuntime::new(scope);
        let mut producers = ScopedRuntime::new(scope);

        let launched = launch_all(config, &queue, &stats, &mut consumers, &mut producers);

        let producers_finished = producers.wait().iter().filter(|p| !p.panicked()).count();

        let sentinels = consumers.len();
        tracing::info!(
            "All producers finished. Enqueuing {sentinels} sentinels (one per consumer)."
        );
        for nth in 1..=sentinels {
            queue.put(Item::sentinel());
            tracing::info!("[Main] Enqueued sentinel {nth}/{sentinels}");
        }

        let mut consumers_terminated = 0;
        for (nth, joined) in consumers.wait().iter().enumerate() {
            if joined.panicked() {
                tracing::error!("[Main] Consumer-{} panicked.", nth + 1);
            } else {
                tracing::info!("[Main] Consumer-{} has terminated.", nth + 1);
                consumers_terminated += 1;
            }
        }

        (launched, producers_finished, consumers_terminated)
    });

    let runtime = started.elapsed();
    launched?;

    Ok(RunReport {
        expected: config.total_items(),
        totals: stats.snapshot(),
        runtime,
        producers_finished,
        consumers_terminated,
    })
}

fn launch_all<'scope, 'env>(
    config: &RunConfig,
    queue: &'env BoundedPriorityQueue<Item>,
    stats: &'env RunStatistics,
    consumers: &mut ScopedRuntime<'scope, 'env>,
    producers: &mut ScopedRuntime<'scope, 'env>,
) -> Result<(), Error>
where
    'env: 'scope,
{
    for id in 1..=config.consumers {
        let mut ctx = ConsumerContext::new(ConsumerTask { id }, queue, stats);
        if let Some(cores) = config.core_for(id - 1) {
            ctx = ctx.pinned(cores);
        }

        consumers.launch_from_context(ctx)?;
    }

    for id in 1..=config.producers {
        let task = ProducerTask::seeded(id, config.seed);
        let mut ctx = ProducerContext::new(task, config.items_per_producer, queue);
        if let Some(cores) = config.core_for(config.consumers + id - 1) {
            ctx = ctx.pinned(cores);
        }

        producers.launch_from_context(ctx)?;
    }

    Ok(())
}

/* ---------- */

/// What happened during a [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    expected: usize,
    totals: Totals,
    runtime: Duration,
    producers_finished: usize,
    consumers_terminated: usize,
}

impl RunReport {
    /// Returns the number of real items the producers were configured to emit.
    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Returns the number of real items consumed.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.totals.consumed
    }

    /// Returns the number of urgent items consumed.
    #[inline]
    pub fn urgent_consumed(&self) -> u64 {
        self.totals.urgent
    }

    /// Returns the mean time items spent between their creation and their consumption.
    #[inline]
    pub fn average_latency(&self) -> Duration {
        self.totals.average_latency()
    }

    /// Returns the wall-clock duration of the run.
    #[inline]
    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    /// Returns the number of consumed items per second, or `None` if the runtime is zero.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.runtime.as_secs_f64();
        (secs > 0.0).then(|| self.totals.consumed as f64 / secs)
    }

    /// Returns the number of producers that emitted their whole quota.
    #[inline]
    pub fn producers_finished(&self) -> usize {
        self.producers_finished
    }

    /// Returns the number of consumers that received their sentinel and returned.
    #[inline]
    pub fn consumers_terminated(&self) -> usize {
        self.consumers_terminated
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== SUMMARY =====")?;
        writeln!(f, "Total real items expected: {}", self.expected)?;
        writeln!(f, "Total real items consumed: {}", self.totals.consumed)?;
        writeln!(f, "Urgent items consumed: {}", self.totals.urgent)?;
        writeln!(
            f,
            "Average latency per item: {:.6} seconds",
            self.average_latency().as_secs_f64()
        )?;
        writeln!(f, "Total runtime: {:.6} seconds", self.runtime.as_secs_f64())?;
        if let Some(throughput) = self.throughput() {
            writeln!(f, "Throughput: {throughput:.2} items/second")?;
        }
        write!(f, "====================")
    }
}

/* ---------- */
