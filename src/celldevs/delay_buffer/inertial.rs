use super::DelayBuffer;
use crate::core::types::SimTime;

/// Delay buffer with inertial semantics.
///
/// At most one emission is pending. Scheduling a new state preempts the
/// pending one, whatever its time.
#[derive(Debug, Clone)]
pub struct InertialDelayBuffer<T: SimTime, S> {
    pending: Option<(T, Vec<S>)>,
}

impl<T: SimTime, S> InertialDelayBuffer<T, S> {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl<T: SimTime, S> Default for InertialDelayBuffer<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SimTime, S: Send> DelayBuffer<T, S> for InertialDelayBuffer<T, S> {
    fn add_to_buffer(&mut self, state: S, time: T) {
        self.pending = Some((time, vec![state]));
    }

    fn next_timeout(&self) -> T {
        match &self.pending {
            Some((time, _)) => *time,
            None => T::infinity(),
        }
    }

    fn next_states(&self) -> &[S] {
        match &self.pending {
            Some((_, states)) => states,
            None => &[],
        }
    }

    fn pop_buffer(&mut self) {
        self.pending = None;
    }

    fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
