pub mod bridge;
pub mod erased;
pub mod message_bag;
pub mod port;

// Re-export all public types
pub use bridge::PortSet;
pub use erased::{ErasedBag, ErasedBags};
pub use message_bag::MessageBag;
pub use port::{Port, PortId};
