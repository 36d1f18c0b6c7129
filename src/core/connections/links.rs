use crate::core::types::ModelId;
use crate::core::values::PortId;

/// External input coupling: parent input port -> child input port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalInputCoupling {
    pub from_port: PortId,
    pub to_model: ModelId,
    pub to_port: PortId,
}

impl ExternalInputCoupling {
    pub fn new(from_port: PortId, to_model: impl Into<ModelId>, to_port: PortId) -> Self {
        Self {
            from_port,
            to_model: to_model.into(),
            to_port,
        }
    }
}

impl std::fmt::Display for ExternalInputCoupling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}.{}", self.from_port, self.to_model, self.to_port)
    }
}

/// External output coupling: child output port -> parent output port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalOutputCoupling {
    pub from_model: ModelId,
    pub from_port: PortId,
    pub to_port: PortId,
}

impl ExternalOutputCoupling {
    pub fn new(from_model: impl Into<ModelId>, from_port: PortId, to_port: PortId) -> Self {
        Self {
            from_model: from_model.into(),
            from_port,
            to_port,
        }
    }
}

impl std::fmt::Display for ExternalOutputCoupling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} -> {}", self.from_model, self.from_port, self.to_port)
    }
}

/// Internal coupling: child output port -> sibling input port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalCoupling {
    pub from_model: ModelId,
    pub from_port: PortId,
    pub to_model: ModelId,
    pub to_port: PortId,
}

impl InternalCoupling {
    pub fn new(
        from_model: impl Into<ModelId>,
        from_port: PortId,
        to_model: impl Into<ModelId>,
        to_port: PortId,
    ) -> Self {
        Self {
            from_model: from_model.into(),
            from_port,
            to_model: to_model.into(),
            to_port,
        }
    }
}

impl std::fmt::Display for InternalCoupling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_model, self.from_port, self.to_model, self.to_port
        )
    }
}
