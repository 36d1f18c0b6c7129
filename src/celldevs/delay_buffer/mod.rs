//! Per-cell schedules of outputs waiting to become observable

pub mod inertial;
pub mod transport;

pub use inertial::InertialDelayBuffer;
pub use transport::TransportDelayBuffer;

use crate::core::errors::CompositionError;
use crate::core::types::SimTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Schedule of a cell's future emissions
pub trait DelayBuffer<T: SimTime, S>: Send {
    /// Schedule `state` to become observable at `time`
    fn add_to_buffer(&mut self, state: S, time: T);

    /// Earliest scheduled time, or infinity when nothing is pending
    fn next_timeout(&self) -> T;

    /// States due at [`DelayBuffer::next_timeout`], empty when nothing is pending
    fn next_states(&self) -> &[S];

    /// Drop the earliest scheduled time and its states. No-op when empty
    fn pop_buffer(&mut self);

    fn is_empty(&self) -> bool;
}

/// Delay buffer policy, selected by identifier at composition time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayPolicy {
    Transport,
    Inertial,
}

impl DelayPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayPolicy::Transport => "transport",
            DelayPolicy::Inertial => "inertial",
        }
    }

    /// Create an empty buffer of this policy
    pub fn build<T: SimTime, S: Send + 'static>(&self) -> Box<dyn DelayBuffer<T, S>> {
        match self {
            DelayPolicy::Transport => Box::new(TransportDelayBuffer::new()),
            DelayPolicy::Inertial => Box::new(InertialDelayBuffer::new()),
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Transport
    }
}

impl FromStr for DelayPolicy {
    type Err = CompositionError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "transport" => Ok(DelayPolicy::Transport),
            "inertial" => Ok(DelayPolicy::Inertial),
            other => Err(CompositionError::UnknownDelayPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for DelayPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
