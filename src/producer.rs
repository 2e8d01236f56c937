use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::item::{Item, Prioritized, Priority, VALUE_RANGE_END};
use crate::queue::BoundedPriorityQueue;
use crate::settings::Settings;
use crate::worker::{Context, ControlFlow, Worker};
use crate::Error;

/* ---------- */

/// Identifies a producer and seeds its random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerTask {
    /// 1-based identity, used in logs and thread names.
    pub id: usize,
    /// Seed of the producer's own random generator.
    pub seed: u64,
}

impl ProducerTask {
    /// Returns the task of the `id`-th producer of a run seeded with `base_seed`.
    ///
    /// Every producer of a run gets a distinct seed, and the same `base_seed` always yields the same seeds.
    #[inline]
    pub fn seeded(id: usize, base_seed: u64) -> Self {
        let index = id.saturating_sub(1) as u64;

        Self {
            id,
            seed: base_seed ^ index.wrapping_mul(1_234_567),
        }
    }
}

/* ---------- */

/// Builds a [`Producer`] emitting `quota` items into `queue`.
#[derive(Debug)]
pub struct ProducerContext<'q> {
    task: ProducerTask,
    quota: usize,
    queue: &'q BoundedPriorityQueue<Item>,
    cores: Option<Vec<usize>>,
}

impl<'q> ProducerContext<'q> {
    /// Returns a new context.
    #[inline]
    pub fn new(task: ProducerTask, quota: usize, queue: &'q BoundedPriorityQueue<Item>) -> Self {
        Self {
            task,
            quota,
            queue,
            cores: None,
        }
    }

    /// Pins the producer's thread to the given `cores`.
    #[inline]
    pub fn pinned(mut self, cores: Vec<usize>) -> Self {
        self.cores = Some(cores);
        self
    }
}

impl<'q> Context for ProducerContext<'q> {
    type Target = Producer<'q>;

    fn into_worker(self) -> Result<Self::Target, Error> {
        if self.quota == 0 {
            return Err(Error::context(format!(
                "producer {} has nothing to produce",
                self.task.id
            )));
        }

        Ok(Producer {
            id: self.task.id,
            rng: StdRng::seed_from_u64(self.task.seed),
            quota: self.quota,
            produced: 0,
            queue: self.queue,
        })
    }

    fn settings(&self) -> Settings {
        Settings::for_task("producer", self.task.id)
    }

    fn core_pinning(&self) -> Option<Vec<usize>> {
        self.cores.clone()
    }
}

/* ---------- */

/// Emits a fixed number of random items, then stops.
///
/// Values are drawn from `0..=999` and one item out of four is urgent, on average.
#[derive(Debug)]
pub struct Producer<'q> {
    id: usize,
    rng: StdRng,
    quota: usize,
    produced: usize,
    queue: &'q BoundedPriorityQueue<Item>,
}

impl Producer<'_> {
    /// Returns the number of items put so far.
    #[inline]
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn next_item(&mut self) -> Item {
        let value = self.rng.gen_range(0..VALUE_RANGE_END);
        let priority = if self.rng.gen_ratio(1, 4) {
            Priority::Urgent
        } else {
            Priority::Normal
        };

        Item::new(value, priority)
    }
}

impl Worker for Producer<'_> {
    fn on_update(&mut self) -> ControlFlow {
        if self.produced >= self.quota {
            return ControlFlow::Break;
        }

        let item = self.next_item();
        self.queue.put(item);
        self.produced += 1;

        let value = item.payload();
        match item.priority() {
            Priority::Urgent => tracing::info!("[Producer-{}] Produced URGENT item: {value}", self.id),
            Priority::Normal => tracing::info!("[Producer-{}] Produced item: {value}", self.id),
        }

        if self.produced == self.quota {
            ControlFlow::Break
        } else {
            ControlFlow::Continue
        }
    }

    fn on_stop(&mut self) {
        tracing::info!(
            "[Producer-{}] Finished producing {} items.",
            self.id,
            self.produced
        );
    }
}

/* ---------- */

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn producer(queue: &BoundedPriorityQueue<Item>, seed: u64, quota: usize) -> Producer<'_> {
        ProducerContext::new(ProducerTask { id: 1, seed }, quota, queue)
            .into_worker()
            .expect("failed to build the producer")
    }

    #[test]
    fn seeds_differ_per_producer() {
        let seeds = (1..=4)
            .map(|id| ProducerTask::seeded(id, 42).seed)
            .collect::<Vec<_>>();

        assert_eq!(seeds[0], 42);
        for (i, a) in seeds.iter().enumerate() {
            assert!(seeds[i + 1..].iter().all(|b| a != b));
        }
        assert_eq!(ProducerTask::seeded(3, 42), ProducerTask::seeded(3, 42));
    }

    #[test]
    fn emits_exactly_its_quota() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(20).unwrap());
        let mut producer = producer(&queue, 7, 20);

        producer.run();

        assert_eq!(producer.produced(), 20);
        assert_eq!(queue.len(), 20);
    }

    #[test]
    fn values_in_range_and_never_sentinels() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(1).unwrap());
        let mut producer = producer(&queue, 1234, 1);

        let mut urgent = 0;
        for _ in 0..4000 {
            let item = producer.next_item();

            assert!(!item.is_sentinel());
            assert!((0..VALUE_RANGE_END).contains(&item.value().unwrap()));
            if item.priority() == Priority::Urgent {
                urgent += 1;
            }
        }

        // One in four on average, with a comfortable margin.
        assert!((800..1200).contains(&urgent), "{urgent} urgent items out of 4000");
    }

    #[test]
    fn same_seed_same_stream() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(1).unwrap());
        let mut a = producer(&queue, 99, 1);
        let mut b = producer(&queue, 99, 1);

        for _ in 0..50 {
            let (x, y) = (a.next_item(), b.next_item());
            assert_eq!(x.payload(), y.payload());
            assert_eq!(x.priority(), y.priority());
        }
    }

    #[test]
    fn zero_quota_is_rejected() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(1).unwrap());

        let err = ProducerContext::new(ProducerTask::seeded(1, 0), 0, &queue)
            .into_worker()
            .expect_err("a producer without quota should be rejected");
        assert!(matches!(err, Error::InvalidContext(_)));
    }

    #[test]
    fn thread_settings() {
        let queue = BoundedPriorityQueue::new(NonZeroUsize::new(1).unwrap());
        let ctx = ProducerContext::new(ProducerTask::seeded(5, 0), 1, &queue).pinned(vec![0]);

        assert_eq!(ctx.settings().thread_name(), Some("producer-5"));
        assert_eq!(ctx.core_pinning(), Some(vec![0]));
    }
}
