pub mod atomic;
pub mod coupled;
pub mod model;
pub mod passive;
pub mod registry;

pub use atomic::{Atomic, AtomicAdapter, DynamicAtomic, InputBags, OutputBags};
pub use coupled::{CoupledModel, RoutedMessages};
pub use model::Model;
pub use passive::{Passive, PassiveInput};
pub use registry::{ModelCounts, ModelRegistry};
