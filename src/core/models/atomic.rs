use crate::core::errors::ModelError;
use crate::core::types::{ModelId, SimTime};
use crate::core::values::{ErasedBags, PortId, PortSet};
use std::any::Any;

/// Typed input bags of an atomic model
pub type InputBags<M> = <<M as Atomic>::Input as PortSet>::Bags;

/// Typed output bags of an atomic model
pub type OutputBags<M> = <<M as Atomic>::Output as PortSet>::Bags;

/// Parallel DEVS atomic model.
///
/// Implementors only see their own typed bags; the conversion from and to
/// erased bags happens in [`AtomicAdapter`].
pub trait Atomic: Send + 'static {
    type Time: SimTime;
    /// Declared input ports
    type Input: PortSet;
    /// Declared output ports
    type Output: PortSet;
    type State;

    /// Current state
    fn state(&self) -> &Self::State;

    /// Transition taken when the time advance expires
    fn internal_transition(&mut self) -> Result<(), ModelError>;

    /// Transition taken when inputs arrive before the time advance expires
    fn external_transition(
        &mut self,
        elapsed: Self::Time,
        inputs: <Self::Input as PortSet>::Bags,
    ) -> Result<(), ModelError>;

    /// Transition taken when inputs arrive exactly when the time advance expires
    fn confluence_transition(
        &mut self,
        elapsed: Self::Time,
        inputs: <Self::Input as PortSet>::Bags,
    ) -> Result<(), ModelError>;

    /// Output emitted right before an internal transition
    fn output(&self) -> Result<<Self::Output as PortSet>::Bags, ModelError>;

    /// Time until the next internal transition
    fn time_advance(&self) -> Self::Time;
}

/// Object-safe view of an atomic model working on erased bags
pub trait DynamicAtomic<T: SimTime>: Send {
    fn id(&self) -> &ModelId;

    fn input_ports(&self) -> Vec<PortId>;

    fn output_ports(&self) -> Vec<PortId>;

    /// Erased bags with an empty entry per declared input port
    fn empty_inputs(&self) -> ErasedBags;

    fn internal_transition(&mut self) -> Result<(), ModelError>;

    fn external_transition(&mut self, elapsed: T, inbound: &ErasedBags) -> Result<(), ModelError>;

    fn confluence_transition(&mut self, elapsed: T, inbound: &ErasedBags) -> Result<(), ModelError>;

    fn output(&self) -> Result<ErasedBags, ModelError>;

    fn time_advance(&self) -> T;

    /// The wrapped concrete model, for downcasting
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Bridges a typed [`Atomic`] model to [`DynamicAtomic`]
pub struct AtomicAdapter<M: Atomic> {
    id: ModelId,
    model: M,
}

impl<M: Atomic> AtomicAdapter<M> {
    pub fn new(id: impl Into<ModelId>, model: M) -> Self {
        Self { id: id.into(), model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M: Atomic> DynamicAtomic<M::Time> for AtomicAdapter<M> {
    fn id(&self) -> &ModelId {
        &self.id
    }

    fn input_ports(&self) -> Vec<PortId> {
        M::Input::port_ids()
    }

    fn output_ports(&self) -> Vec<PortId> {
        M::Output::port_ids()
    }

    fn empty_inputs(&self) -> ErasedBags {
        M::Input::empty_erased()
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        self.model.internal_transition()
    }

    fn external_transition(&mut self, elapsed: M::Time, inbound: &ErasedBags) -> Result<(), ModelError> {
        let inputs = M::Input::from_erased(inbound);
        self.model.external_transition(elapsed, inputs)
    }

    fn confluence_transition(&mut self, elapsed: M::Time, inbound: &ErasedBags) -> Result<(), ModelError> {
        let inputs = M::Input::from_erased(inbound);
        self.model.confluence_transition(elapsed, inputs)
    }

    fn output(&self) -> Result<ErasedBags, ModelError> {
        let outputs = self.model.output()?;
        Ok(M::Output::to_erased(outputs))
    }

    fn time_advance(&self) -> M::Time {
        self.model.time_advance()
    }

    fn as_any(&self) -> &dyn Any {
        &self.model
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.model
    }
}
