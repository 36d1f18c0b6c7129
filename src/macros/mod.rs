//! Declarative macros shared by the crate.

#[macro_use]
pub mod port_macros;
