use super::types::ModelId;

/// Errors raised while composing a coupled model.
///
/// All of them prevent the model from entering simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionError {
    /// A model with the same ID is already registered
    DuplicateModel(ModelId),
    /// A coupling failed validation
    InvalidLink { kind: &'static str, link: String },
    /// Delay policy identifier is not recognized
    UnknownDelayPolicy(String),
    /// The cell factory refused to build a cell
    CellConstruction { cell: String, reason: String },
    /// The scenario lists a cell but has no data for it
    MissingCellData(String),
    /// A vicinity names a location absent from the scenario
    UnknownNeighbor { cell: String, neighbor: String },
    /// Malformed scenario description
    InvalidScenario(String),
    /// Rayon thread pool could not be created
    ThreadPool(String),
}

impl std::fmt::Display for CompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionError::DuplicateModel(id) => write!(f, "Model with ID '{}' already exists", id),
            CompositionError::InvalidLink { kind, link } => write!(f, "Invalid {} link: {}", kind, link),
            CompositionError::UnknownDelayPolicy(id) => write!(f, "Unknown delay buffer policy '{}'", id),
            CompositionError::CellConstruction { cell, reason } => {
                write!(f, "Failed to build cell '{}': {}", cell, reason)
            }
            CompositionError::MissingCellData(cell) => write!(f, "Scenario has no data for cell '{}'", cell),
            CompositionError::UnknownNeighbor { cell, neighbor } => {
                write!(f, "Cell '{}' has neighbor '{}' which is not part of the scenario", cell, neighbor)
            }
            CompositionError::InvalidScenario(msg) => write!(f, "Invalid scenario: {}", msg),
            CompositionError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for CompositionError {}

/// Errors raised while a model is being driven
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The operation is never legal for this model
    ContractViolation { model: String, operation: &'static str },
    /// Routing referenced a child that is not registered
    UnknownModel(ModelId),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ContractViolation { model, operation } => {
                write!(f, "{} called on {}", operation, model)
            }
            ModelError::UnknownModel(id) => write!(f, "Model '{}' not found", id),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_error_messages() {
        let err = CompositionError::UnknownDelayPolicy("hybrid".to_string());
        assert_eq!(err.to_string(), "Unknown delay buffer policy 'hybrid'");

        let err = CompositionError::CellConstruction {
            cell: "cell_0_0".to_string(),
            reason: "negative capacity".to_string(),
        };
        assert!(err.to_string().contains("cell_0_0"));
        assert!(err.to_string().contains("negative capacity"));
    }

    #[test]
    fn test_model_error_messages() {
        let err = ModelError::ContractViolation {
            model: "passive".to_string(),
            operation: "internal transition",
        };
        assert_eq!(err.to_string(), "internal transition called on passive");
    }
}
