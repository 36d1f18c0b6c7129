use super::atomic::{Atomic, AtomicAdapter, DynamicAtomic};
use super::coupled::CoupledModel;
use crate::core::types::{ModelId, SimTime};
use crate::core::values::{ErasedBags, PortId};

/// A child of a coupled model: either atomic or coupled
pub enum Model<T: SimTime> {
    Atomic(Box<dyn DynamicAtomic<T>>),
    Coupled(Box<CoupledModel<T>>),
}

impl<T: SimTime> Model<T> {
    /// Wrap a typed atomic model under the given ID
    pub fn atomic<M: Atomic<Time = T>>(id: impl Into<ModelId>, model: M) -> Self {
        Model::Atomic(Box::new(AtomicAdapter::new(id, model)))
    }

    pub fn coupled(model: CoupledModel<T>) -> Self {
        Model::Coupled(Box::new(model))
    }

    pub fn id(&self) -> &ModelId {
        match self {
            Model::Atomic(model) => model.id(),
            Model::Coupled(model) => model.id(),
        }
    }

    pub fn input_ports(&self) -> Vec<PortId> {
        match self {
            Model::Atomic(model) => model.input_ports(),
            Model::Coupled(model) => model.input_ports().to_vec(),
        }
    }

    pub fn output_ports(&self) -> Vec<PortId> {
        match self {
            Model::Atomic(model) => model.output_ports(),
            Model::Coupled(model) => model.output_ports().to_vec(),
        }
    }

    /// Erased bags with an empty entry per declared input port
    pub fn empty_inputs(&self) -> ErasedBags {
        match self {
            Model::Atomic(model) => model.empty_inputs(),
            Model::Coupled(model) => ErasedBags::with_ports(model.input_ports()),
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Model::Atomic(_))
    }

    pub fn is_coupled(&self) -> bool {
        matches!(self, Model::Coupled(_))
    }

    pub fn as_atomic(&self) -> Option<&dyn DynamicAtomic<T>> {
        match self {
            Model::Atomic(model) => Some(&**model),
            _ => None,
        }
    }

    pub fn as_atomic_mut(&mut self) -> Option<&mut (dyn DynamicAtomic<T> + 'static)> {
        match self {
            Model::Atomic(model) => Some(&mut **model),
            _ => None,
        }
    }

    pub fn as_coupled(&self) -> Option<&CoupledModel<T>> {
        match self {
            Model::Coupled(model) => Some(&**model),
            _ => None,
        }
    }

    pub fn as_coupled_mut(&mut self) -> Option<&mut CoupledModel<T>> {
        match self {
            Model::Coupled(model) => Some(&mut **model),
            _ => None,
        }
    }

    /// Borrow the concrete atomic model of type `M`
    pub fn downcast_atomic<M: Atomic<Time = T>>(&self) -> Option<&M> {
        self.as_atomic()?.as_any().downcast_ref::<M>()
    }
}

impl<T: SimTime> std::fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Atomic(model) => f.debug_tuple("Atomic").field(model.id()).finish(),
            Model::Coupled(model) => f.debug_tuple("Coupled").field(model.id()).finish(),
        }
    }
}
