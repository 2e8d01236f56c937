use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::{BoundedPriorityQueue, Context, ControlFlow, Error, Prioritized, Priority, Worker};

/* ---------- */

/// Records which hooks were called, breaking after `updates` updates.
pub(crate) struct RecordingWorker {
    pub(crate) events: Vec<&'static str>,
    updates: usize,
}

impl RecordingWorker {
    pub(crate) fn new(updates: usize) -> Self {
        Self {
            events: Vec::new(),
            updates,
        }
    }
}

impl Worker for RecordingWorker {
    fn on_start(&mut self) {
        self.events.push("start");
    }

    fn on_update(&mut self) -> ControlFlow {
        self.events.push("update");
        self.updates -= 1;

        if self.updates == 0 {
            return ControlFlow::Break;
        }

        ControlFlow::Continue
    }

    fn on_stop(&mut self) {
        self.events.push("stop");
    }
}

/* ---------- */

/// Bumps a borrowed counter `times` times.
pub(crate) struct CountingWorker<'a> {
    counter: &'a AtomicUsize,
    times: usize,
}

impl<'a> CountingWorker<'a> {
    pub(crate) fn new(counter: &'a AtomicUsize, times: usize) -> Self {
        Self { counter, times }
    }
}

impl Worker for CountingWorker<'_> {
    fn on_update(&mut self) -> ControlFlow {
        if self.times == 0 {
            return ControlFlow::Break;
        }

        self.times -= 1;
        self.counter.fetch_add(1, Ordering::SeqCst);
        ControlFlow::Continue
    }
}

/* ---------- */

pub(crate) struct PanickingWorker;

impl Worker for PanickingWorker {
    fn on_update(&mut self) -> ControlFlow {
        panic!("panicking on purpose")
    }
}

/* ---------- */

pub(crate) struct BadWorker;

impl Worker for BadWorker {}

pub(crate) struct BadWorkerContext;

impl Context for BadWorkerContext {
    type Target = BadWorker;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Err(Error::context("bad context"))
    }
}

/* ---------- */

/// A queue entry tagged with a sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tagged {
    pub(crate) seq: usize,
    pub(crate) priority: Priority,
}

impl Tagged {
    pub(crate) fn normal(seq: usize) -> Self {
        Self {
            seq,
            priority: Priority::Normal,
        }
    }

    pub(crate) fn urgent(seq: usize) -> Self {
        Self {
            seq,
            priority: Priority::Urgent,
        }
    }

    pub(crate) fn random(seq: usize) -> Self {
        if rand::thread_rng().gen_ratio(1, 4) {
            Self::urgent(seq)
        } else {
            Self::normal(seq)
        }
    }
}

impl Prioritized for Tagged {
    fn priority(&self) -> Priority {
        self.priority
    }
}

pub(crate) fn queue_of(capacity: usize) -> BoundedPriorityQueue<Tagged> {
    BoundedPriorityQueue::new(NonZeroUsize::new(capacity).expect("zero capacity"))
}

pub(crate) fn is_increasing(mut seqs: impl Iterator<Item = usize>) -> bool {
    let Some(mut prev) = seqs.next() else {
        return true;
    };

    seqs.all(|seq| {
        let ok = seq > prev;
        prev = seq;
        ok
    })
}
