//! Cell-DEVS specialization: cells, delay buffers, scenarios and lattices

pub mod cell;
pub mod cells_coupled;
pub mod delay_buffer;
pub mod grid;
pub mod scenario;

pub use cell::{Cell, CellInputPort, CellLogic, CellMessage, CellOutputPort, NeighborState};
pub use cells_coupled::{CellsCoupled, GridCoupled};
pub use delay_buffer::{DelayBuffer, DelayPolicy, InertialDelayBuffer, TransportDelayBuffer};
pub use grid::{CellPosition, GridScenario, GridScenarioData, Neighborhood};
pub use scenario::{CellId, CellMap, ExplicitScenario, Scenario};
