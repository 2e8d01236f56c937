//! A bounded work queue with two priority classes, shared by producer and consumer threads.
//!
//! # Philosophy
//!
//! Every producer and every consumer is a [`Worker`] running on its own OS thread. They all share
//! a single [`BoundedPriorityQueue`] by reference: the queue lives as long as the run, not as long as the process.
//!
//! The queue is a classic bounded buffer. Two counting semaphores, one for free slots and one for occupied slots,
//! enforce the capacity, and a lock protects the storage. A producer always waits for a free slot *before*
//! taking the lock, and a consumer always waits for an occupied slot *before* taking the lock, so that
//! nobody ever sleeps while holding it.
//!
//! Items are either [`Priority::Normal`] or [`Priority::Urgent`]. Both classes share the capacity but are stored
//! in separate FIFO rings, and urgent items are always served first.
//!
//! # Usage
//!
//! The simplest way to use this crate is the [`run`] function, which launches consumers and producers,
//! shuts the consumers down once the producers are done and reports what happened.
//!
//! ```
//! # use prioq::RunConfig;
//! // 2 producers, 3 consumers, a queue of 10 items.
//! let config = RunConfig::new(2, 3, 10).items_per_producer(5);
//! let report = prioq::run(&config).unwrap();
//!
//! assert_eq!(report.consumed(), 10);
//! println!("{report}");
//! ```
//!
//! # Features
//!
//! ## Priorities
//!
//! [`BoundedPriorityQueue::get`] returns the oldest urgent item if there is one, the oldest normal item otherwise.
//! Under sustained urgent load, normal items may wait forever: there is no aging.
//!
//! ```
//! # use prioq::{BoundedPriorityQueue, Item, Priority};
//! # use std::num::NonZeroUsize;
//! let queue = BoundedPriorityQueue::new(NonZeroUsize::new(3).unwrap());
//!
//! queue.put(Item::new(1, Priority::Normal));
//! queue.put(Item::new(2, Priority::Normal));
//! queue.put(Item::new(3, Priority::Urgent));
//!
//! let values = (0..3).map(|_| queue.get().value().unwrap()).collect::<Vec<_>>();
//! assert_eq!(values, [3, 1, 2]);
//! ```
//!
//! Any type implementing [`Prioritized`] can be queued.
//!
//! ## Shutting down with sentinels
//!
//! Consumers have no stop button: each of them pulls items until it receives a sentinel, then returns.
//! Once every producer is done, exactly one sentinel per consumer must be queued. Sentinels are always
//! [`Priority::Normal`], so they're served after any remaining urgent work.
//!
//! ```
//! # use prioq::{BoundedPriorityQueue, ConsumerContext, ConsumerTask, Item, Priority, RunStatistics, ScopedRuntime};
//! # use std::num::NonZeroUsize;
//! let queue = BoundedPriorityQueue::new(NonZeroUsize::new(4).unwrap());
//! let stats = RunStatistics::new();
//!
//! std::thread::scope(|scope| {
//!     let mut runtime = ScopedRuntime::new(scope);
//!
//!     for id in 1..=2 {
//!         let ctx = ConsumerContext::new(ConsumerTask { id }, &queue, &stats);
//!         runtime.launch_from_context(ctx).unwrap();
//!     }
//!
//!     queue.put(Item::new(7, Priority::Urgent));
//!     queue.put(Item::sentinel());
//!     queue.put(Item::sentinel());
//!
//!     assert_eq!(runtime.wait().len(), 2);
//! });
//!
//! assert_eq!(stats.snapshot().consumed, 1);
//! ```
//!
//! ## Workers and runtimes
//!
//! Tasks implement the [`Worker`] trait and are launched on scoped threads by a [`ScopedRuntime`],
//! usually from a [`Context`] that builds the worker and configures its thread ([`Settings`], cpu pinning).

#![warn(missing_docs)]

mod consumer;
mod error;
mod item;
mod orchestrator;
mod producer;
mod queue;
mod scoped_runtime;
mod semaphore;
mod settings;
mod stats;
#[cfg(test)]
mod test_utils;
mod utils;
mod worker;

pub use consumer::*;
pub use error::*;
pub use item::*;
pub use orchestrator::*;
pub use producer::*;
pub use queue::*;
pub use scoped_runtime::*;
pub use settings::*;
pub use stats::*;
pub use worker::*;
