use super::atomic::{Atomic, InputBags, OutputBags};
use crate::core::errors::ModelError;
use crate::core::types::SimTime;
use crate::core::values::Port;
use std::marker::PhantomData;

/// Single input port of [`Passive`], carrying messages of type `M`
pub struct PassiveInput<M>(PhantomData<fn() -> M>);

impl<M: Clone + Send + Sync + 'static> Port for PassiveInput<M> {
    type Message = M;
}

/// Atomic model that absorbs every input and never produces an event.
///
/// Its time advance is always infinite, so a correct simulator never asks it
/// for an internal transition, a confluence transition or an output.
pub struct Passive<M, T> {
    state: (),
    _marker: PhantomData<fn() -> (M, T)>,
}

impl<M, T> Passive<M, T> {
    pub fn new() -> Self {
        Self {
            state: (),
            _marker: PhantomData,
        }
    }

    fn violation(operation: &'static str) -> ModelError {
        ModelError::ContractViolation {
            model: format!("passive model<{}>", std::any::type_name::<M>()),
            operation,
        }
    }
}

impl<M, T> Default for Passive<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, T> Atomic for Passive<M, T>
where
    M: Clone + Send + Sync + 'static,
    T: SimTime,
{
    type Time = T;
    type Input = (PassiveInput<M>,);
    type Output = ();
    type State = ();

    fn state(&self) -> &() {
        &self.state
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        Err(Self::violation("internal transition"))
    }

    fn external_transition(&mut self, _elapsed: T, _inputs: InputBags<Self>) -> Result<(), ModelError> {
        Ok(())
    }

    fn confluence_transition(&mut self, _elapsed: T, _inputs: InputBags<Self>) -> Result<(), ModelError> {
        Err(Self::violation("confluence transition"))
    }

    fn output(&self) -> Result<OutputBags<Self>, ModelError> {
        Err(Self::violation("output"))
    }

    fn time_advance(&self) -> T {
        T::infinity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AtomicAdapter, DynamicAtomic};
    use crate::core::values::{MessageBag, PortId};

    #[test]
    fn test_external_transition_discards_inputs() {
        let mut model = Passive::<String, f64>::new();
        let inputs = (MessageBag::from(vec!["a".to_string(), "b".to_string()]),);
        assert!(model.external_transition(3.5, inputs).is_ok());
        assert_eq!(model.state(), &());
        assert!(model.time_advance().is_infinite());
    }

    #[test]
    fn test_forbidden_operations_fail() {
        let mut model = Passive::<i32, u64>::new();
        assert!(model.internal_transition().is_err());
        assert!(model.confluence_transition(0, (MessageBag::from(vec![1]),)).is_err());
        assert!(matches!(
            model.output(),
            Err(ModelError::ContractViolation { operation: "output", .. })
        ));
        assert_eq!(model.time_advance(), u64::MAX);
    }

    #[test]
    fn test_declared_ports() {
        let adapter = AtomicAdapter::new("sink", Passive::<i32, f64>::new());
        assert_eq!(adapter.input_ports(), vec![PortId::of::<PassiveInput<i32>>()]);
        assert!(adapter.output_ports().is_empty());

        let mut inbound = adapter.empty_inputs();
        inbound.push::<PassiveInput<i32>>(42);
        let mut adapter = adapter;
        assert!(adapter.external_transition(1.0, &inbound).is_ok());
        assert!(adapter.output().is_err());
    }
}
