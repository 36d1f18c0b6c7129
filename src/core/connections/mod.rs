pub mod coupling_validator;
pub mod links;

pub use coupling_validator::CouplingValidator;
pub use links::{ExternalInputCoupling, ExternalOutputCoupling, InternalCoupling};
