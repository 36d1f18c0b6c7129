use super::DelayBuffer;
use crate::core::types::SimTime;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::{Hash, Hasher};

/// Scheduled time used both as heap entry and as map key
#[derive(Debug, Clone, Copy)]
struct ScheduledTime<T: SimTime>(T);

impl<T: SimTime> PartialEq for ScheduledTime<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_order(&other.0) == Ordering::Equal
    }
}

impl<T: SimTime> Eq for ScheduledTime<T> {}

impl<T: SimTime> Hash for ScheduledTime<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key_bits().hash(state);
    }
}

impl<T: SimTime> PartialOrd for ScheduledTime<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SimTime> Ord for ScheduledTime<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other.0.total_order(&self.0)
    }
}

/// Delay buffer with transport semantics.
///
/// Every emission keeps its own scheduled time. States sharing a time are
/// released together, in insertion order. The heap holds each distinct time
/// once and `pending` has a non-empty list for exactly those times.
#[derive(Debug, Clone)]
pub struct TransportDelayBuffer<T: SimTime, S> {
    timeline: BinaryHeap<ScheduledTime<T>>,
    pending: HashMap<ScheduledTime<T>, Vec<S>>,
}

impl<T: SimTime, S> TransportDelayBuffer<T, S> {
    pub fn new() -> Self {
        Self {
            timeline: BinaryHeap::new(),
            pending: HashMap::new(),
        }
    }

    /// Number of distinct scheduled times
    pub fn scheduled_times(&self) -> usize {
        self.timeline.len()
    }

    /// Number of states waiting over all times
    pub fn pending_states(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    fn debug_check_lockstep(&self) {
        debug_assert_eq!(self.timeline.len(), self.pending.len());
    }
}

impl<T: SimTime, S> Default for TransportDelayBuffer<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SimTime, S: Send> DelayBuffer<T, S> for TransportDelayBuffer<T, S> {
    fn add_to_buffer(&mut self, state: S, time: T) {
        let key = ScheduledTime(time);
        match self.pending.get_mut(&key) {
            Some(states) => states.push(state),
            None => {
                self.timeline.push(key);
                self.pending.insert(key, vec![state]);
            }
        }
        self.debug_check_lockstep();
    }

    fn next_timeout(&self) -> T {
        match self.timeline.peek() {
            Some(next) => next.0,
            None => T::infinity(),
        }
    }

    fn next_states(&self) -> &[S] {
        self.timeline
            .peek()
            .and_then(|next| self.pending.get(next))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn pop_buffer(&mut self) {
        if let Some(next) = self.timeline.pop() {
            self.pending.remove(&next);
        }
        self.debug_check_lockstep();
    }

    fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }
}
