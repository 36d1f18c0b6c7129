#[macro_use]
mod macros;

pub mod celldevs;
pub mod core;

// Re-export commonly used types
pub use crate::celldevs::{
    Cell, CellLogic, CellMessage, CellPosition, CellsCoupled, DelayBuffer, DelayPolicy, GridCoupled, GridScenario,
    Neighborhood, Scenario,
};
pub use crate::core::config::{CompositionConfig, ConcurrencyMode};
pub use crate::core::errors::{CompositionError, ModelError};
pub use crate::core::models::{Atomic, CoupledModel, Model, Passive};
pub use crate::core::types::{ModelId, SimTime};
pub use crate::core::values::{MessageBag, Port, PortId, PortSet};
