use super::delay_buffer::{DelayBuffer, DelayPolicy};
use super::scenario::{CellId, CellMap};
use crate::core::errors::{CompositionError, ModelError};
use crate::core::models::{Atomic, InputBags, OutputBags};
use crate::core::types::SimTime;
use crate::core::values::Port;
use log::warn;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// State published by a cell, tagged with its location
#[derive(Debug, Clone, PartialEq)]
pub struct CellMessage<C, S> {
    pub location: C,
    pub state: S,
}

/// Input port shared by every cell of a lattice
pub struct CellInputPort<C, S>(PhantomData<fn() -> (C, S)>);

impl<C: CellId, S: Clone + Send + Sync + 'static> Port for CellInputPort<C, S> {
    type Message = CellMessage<C, S>;
}

/// Output port shared by every cell of a lattice
pub struct CellOutputPort<C, S>(PhantomData<fn() -> (C, S)>);

impl<C: CellId, S: Clone + Send + Sync + 'static> Port for CellOutputPort<C, S> {
    type Message = CellMessage<C, S>;
}

/// Last known state of a neighbor and its influence on the cell
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborState<S, V> {
    pub state: S,
    pub vicinity: V,
}

/// Behaviour of a cell
pub trait CellLogic<T, C, S, V>: Send + 'static {
    /// Next state of the cell given its neighborhood
    fn local_computation(&self, location: &C, state: &S, neighborhood: &BTreeMap<C, NeighborState<S, V>>) -> S;

    /// Delay before `state` becomes observable by the neighbors
    fn output_delay(&self, state: &S) -> T;
}

/// Cell-DEVS atomic model.
///
/// Every state change is scheduled in the delay buffer at
/// `clock + output_delay(state)` and published when that time is reached.
/// A change with an infinite output delay is never published.
/// The initial state is published at time zero.
pub struct Cell<T: SimTime, C, S, V, L> {
    location: C,
    clock: T,
    state: S,
    neighborhood: BTreeMap<C, NeighborState<S, V>>,
    buffer: Box<dyn DelayBuffer<T, S>>,
    logic: L,
}

impl<T, C, S, V, L> Cell<T, C, S, V, L>
where
    T: SimTime,
    C: CellId,
    S: Clone + PartialEq + Send + Sync + 'static,
    V: Send + 'static,
    L: CellLogic<T, C, S, V>,
{
    /// Build a cell from its scenario data
    pub fn new(map: CellMap<C, S, V>, policy: DelayPolicy, logic: L) -> Result<Self, CompositionError> {
        let CellMap {
            location,
            state,
            vicinity,
            mut neighbors,
        } = map;

        let mut neighborhood = BTreeMap::new();
        for (neighbor, weight) in vicinity {
            let neighbor_state = neighbors
                .remove(&neighbor)
                .ok_or_else(|| CompositionError::UnknownNeighbor {
                    cell: format!("{:?}", location),
                    neighbor: format!("{:?}", neighbor),
                })?;
            neighborhood.insert(
                neighbor,
                NeighborState {
                    state: neighbor_state,
                    vicinity: weight,
                },
            );
        }

        let mut buffer = policy.build::<T, S>();
        buffer.add_to_buffer(state.clone(), T::zero());

        Ok(Self {
            location,
            clock: T::zero(),
            state,
            neighborhood,
            buffer,
            logic,
        })
    }

    pub fn location(&self) -> &C {
        &self.location
    }

    /// Local simulation clock
    pub fn clock(&self) -> T {
        self.clock
    }

    pub fn neighborhood(&self) -> &BTreeMap<C, NeighborState<S, V>> {
        &self.neighborhood
    }

    pub fn buffer(&self) -> &dyn DelayBuffer<T, S> {
        self.buffer.as_ref()
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }
}

impl<T, C, S, V, L> Atomic for Cell<T, C, S, V, L>
where
    T: SimTime,
    C: CellId,
    S: Clone + PartialEq + Send + Sync + 'static,
    V: Send + 'static,
    L: CellLogic<T, C, S, V>,
{
    type Time = T;
    type Input = (CellInputPort<C, S>,);
    type Output = (CellOutputPort<C, S>,);
    type State = S;

    fn state(&self) -> &S {
        &self.state
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        let next = self.buffer.next_timeout();
        if !next.is_infinite() {
            self.clock = next;
        }
        self.buffer.pop_buffer();
        Ok(())
    }

    fn external_transition(&mut self, elapsed: T, inputs: InputBags<Self>) -> Result<(), ModelError> {
        self.clock = self.clock + elapsed;

        for message in inputs.0.iter() {
            match self.neighborhood.get_mut(&message.location) {
                Some(neighbor) => neighbor.state = message.state.clone(),
                None => warn!(
                    "Cell {:?} ignored a message from {:?}, which is not in its neighborhood",
                    self.location, message.location
                ),
            }
        }

        let next_state = self
            .logic
            .local_computation(&self.location, &self.state, &self.neighborhood);
        if next_state != self.state {
            // an infinite delay keeps the change private to the cell
            let delay = self.logic.output_delay(&next_state);
            if !delay.is_infinite() {
                self.buffer.add_to_buffer(next_state.clone(), self.clock + delay);
            }
            self.state = next_state;
        }
        Ok(())
    }

    fn confluence_transition(&mut self, _elapsed: T, inputs: InputBags<Self>) -> Result<(), ModelError> {
        self.internal_transition()?;
        self.external_transition(T::zero(), inputs)
    }

    fn output(&self) -> Result<OutputBags<Self>, ModelError> {
        let mut bags = OutputBags::<Self>::default();
        for state in self.buffer.next_states() {
            bags.0.push(CellMessage {
                location: self.location.clone(),
                state: state.clone(),
            });
        }
        Ok(bags)
    }

    fn time_advance(&self) -> T {
        let next = self.buffer.next_timeout();
        if next.is_infinite() {
            T::infinity()
        } else {
            next - self.clock
        }
    }
}
