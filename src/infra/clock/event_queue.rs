//! In-memory event queue with time ordering and FIFO tie-breaking.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::core::{Scheduler, SimTime, StationEvent, TimerHandle};

/// Wrapper making pending events orderable: earliest time first, then
/// scheduling order.
struct Pending<E> {
    at: SimTime,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Pending<E> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<E> Eq for Pending<E> {}

impl<E> PartialOrd for Pending<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Pending<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for the max-heap
        match other.at.total_cmp(&self.at) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ordering => ordering,
        }
    }
}

/// Virtual clock plus pending events.
///
/// Cancellation is lazy: cancelled entries stay in the heap and are skipped
/// when they reach the top.
pub struct EventQueue<E> {
    heap: BinaryHeap<Pending<E>>,
    live: HashSet<u64>,
    now: SimTime,
    next_seq: u64,
}

impl<E> EventQueue<E> {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            now: 0.0,
            next_seq: 0,
        }
    }

    /// Current virtual time.
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `event` at `at`. Times in the past, and NaN, are clamped to now.
    pub fn push(&mut self, at: SimTime, event: E) -> TimerHandle {
        let at = if at.is_nan() {
            tracing::warn!(now = self.now, "event scheduled at NaN; clamping");
            self.now
        } else if at < self.now {
            tracing::warn!(at, now = self.now, "event scheduled in the past; clamping");
            self.now
        } else {
            at
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Pending { at, seq, event });
        self.live.insert(seq);
        TimerHandle(seq)
    }

    /// Withdraw a pending event.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle.0)
    }

    /// Pop the next live event and advance the clock to its time.
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        while let Some(Pending { at, seq, event }) = self.heap.pop() {
            if self.live.remove(&seq) {
                self.now = at;
                return Some((at, event));
            }
        }
        None
    }

    /// Time of the next live event.
    pub fn peek_time(&mut self) -> Option<SimTime> {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                return Some(top.at);
            }
            self.heap.pop();
        }
        None
    }

    /// Move the clock forward without delivering anything.
    pub fn advance_to(&mut self, at: SimTime) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Number of live events.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no live event is pending.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler for EventQueue<E>
where
    E: From<StationEvent>,
{
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule(&mut self, at: SimTime, event: StationEvent) -> TimerHandle {
        self.push(at, E::from(event))
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        Self::cancel(self, handle)
    }
}
