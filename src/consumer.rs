use crate::item::{Item, Prioritized, Priority};
use crate::queue::BoundedPriorityQueue;
use crate::settings::Settings;
use crate::stats::RunStatistics;
use crate::worker::{Context, ControlFlow, Worker};
use crate::Error;

/* ---------- */

/// Identifies a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerTask {
    /// 1-based identity, used in logs and thread names.
    pub id: usize,
}

/* ---------- */

/// Builds a [`Consumer`] draining `queue` and recording into `stats`.
#[derive(Debug)]
pub struct ConsumerContext<'q> {
    task: ConsumerTask,
    queue: &'q BoundedPriorityQueue<Item>,
    stats: &'q RunStatistics,
    cores: Option<Vec<usize>>,
}

impl<'q> ConsumerContext<'q> {
    /// Returns a new context.
    #[inline]
    pub fn new(
        task: ConsumerTask,
        queue: &'q BoundedPriorityQueue<Item>,
        stats: &'q RunStatistics,
    ) -> Self {
        Self {
            task,
            queue,
            stats,
            cores: None,
        }
    }

    /// Pins the consumer's thread to the given `cores`.
    #[inline]
    pub fn pinned(mut self, cores: Vec<usize>) -> Self {
        self.cores = Some(cores);
        self
    }
}

impl<'q> Context for ConsumerContext<'q> {
    type Target = Consumer<'q>;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Ok(Consumer {
            id: self.task.id,
            state: ConsumerState::Running,
            queue: self.queue,
            stats: self.stats,
        })
    }

    fn settings(&self) -> Settings {
        Settings::for_task("consumer", self.task.id)
    }

    fn core_pinning(&self) -> Option<Vec<usize>> {
        self.cores.clone()
    }
}

/* ---------- */

/// Lifecycle of a [`Consumer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    /// Pulling items.
    Running,
    /// Received its sentinel, won't pull anything anymore.
    Terminated,
}

/// Pulls items until it receives a sentinel.
///
/// Every real item's latency, from creation to dequeue, is recorded into the run's [`RunStatistics`].
/// Sentinels are not recorded.
#[derive(Debug)]
pub struct Consumer<'q> {
    id: usize,
    state: ConsumerState,
    queue: &'q BoundedPriorityQueue<Item>,
    stats: &'q RunStatistics,
}

impl Consumer<'_> {
    /// Returns the consumer's current state.
    #[inline]
    pub fn state(&self) -> ConsumerState {
        self.state
    }

    fn consume(&self, item: Item) {
        let latency = item.enqueued_at().elapsed();
        self.stats.record(latency, item.priority());

        let value = item.payload();
        let latency = latency.as_secs_f64();
        match item.priority() {
            Priority::Urgent => tracing::info!(
                "[Consumer-{}] Consumed URGENT item: {value} (latency: {latency:.6} s)",
                self.id
            ),
            Priority::Normal => tracing::info!(
                "[Consumer-{}] Consumed item: {value} (latency: {latency:.6} s)",
                self.id
            ),
        }
    }
}

impl Worker for Consumer<'_> {
    fn on_update(&mut self) -> ControlFlow {
        if self.state == ConsumerState::Terminated {
            return ControlFlow::Break;
        }

        let item = self.queue.get();
        if item.is_sentinel() {
            tracing::info!("[Consumer-{}] Received sentinel. Exiting.", self.id);
            self.state = ConsumerState::Terminated;
            return ControlFlow::Break;
        }

        self.consume(item);
        ControlFlow::Continue
    }
}

/* ---------- */

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::time::Duration;

    use super::*;

    fn consumer<'q>(
        queue: &'q BoundedPriorityQueue<Item>,
        stats: &'q RunStatistics,
    ) -> Consumer<'q> {
        ConsumerContext::new(ConsumerTask { id: 1 }, queue, stats)
            .into_worker()
            .expect("failed to build the consumer")
    }

    #[test]
    fn stops_on_sentinel() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(4).unwrap());
        let stats = RunStatistics::new();

        queue.put(Item::new(1, Priority::Normal));
        queue.put(Item::new(2, Priority::Urgent));
        queue.put(Item::sentinel());
        queue.put(Item::new(3, Priority::Normal));

        let mut consumer = consumer(&queue, &stats);
        assert_eq!(consumer.state(), ConsumerState::Running);
        consumer.run();

        assert_eq!(consumer.state(), ConsumerState::Terminated);
        // The item queued after the sentinel is left for another consumer.
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get().value(), Some(3));

        let totals = stats.snapshot();
        assert_eq!(totals.consumed, 2);
        assert_eq!(totals.urgent, 1);
    }

    #[test]
    fn terminated_consumer_never_pulls() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(2).unwrap());
        let stats = RunStatistics::new();

        queue.put(Item::sentinel());
        let mut consumer = consumer(&queue, &stats);
        consumer.run();

        queue.put(Item::new(1, Priority::Normal));
        assert_eq!(consumer.on_update(), ControlFlow::Break);
        assert_eq!(queue.len(), 1);
        assert_eq!(stats.snapshot().consumed, 0);
    }

    #[test]
    fn records_latency() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(2).unwrap());
        let stats = RunStatistics::new();

        queue.put(Item::new(5, Priority::Normal));
        std::thread::sleep(Duration::from_millis(20));
        queue.put(Item::sentinel());

        consumer(&queue, &stats).run();

        let totals = stats.snapshot();
        assert_eq!(totals.consumed, 1);
        assert!(totals.total_latency >= Duration::from_millis(20));
    }

    #[test]
    fn thread_settings() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(1).unwrap());
        let stats = RunStatistics::new();
        let ctx = ConsumerContext::new(ConsumerTask { id: 3 }, &queue, &stats);

        assert_eq!(ctx.settings().thread_name(), Some("consumer-3"));
        assert_eq!(ctx.core_pinning(), None);
    }
}
