use super::config::ConfigError;
use crate::core::layout::binner::LayoutError;
use crate::core::models::well::WellCoordinate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EngineError {
    #[error("Well {well} has an invalid concentration: {value}")]
    InvalidConcentration { well: WellCoordinate, value: f64 },

    #[error("No bin found for well {well} (value {value})")]
    NoBinFound { well: WellCoordinate, value: f64 },

    #[error("{required} wells do not fit on a destination plate with capacity {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("No eligible wells to plan")]
    EmptyInput,

    #[error("Well {well} has no discrete value but discrete binning is configured")]
    MissingDiscreteValue { well: WellCoordinate },

    #[error("Well {well} has invalid supplied volumes: {reason}")]
    InvalidSuppliedVolume {
        well: WellCoordinate,
        reason: &'static str,
    },

    #[error("Well {well} lies outside the {rows}x{columns} destination plate")]
    WellOutOfBounds {
        well: WellCoordinate,
        rows: usize,
        columns: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<LayoutError> for EngineError {
    fn from(error: LayoutError) -> Self {
        match error {
            LayoutError::CapacityExceeded { required, capacity } => {
                Self::CapacityExceeded { required, capacity }
            }
            LayoutError::WellOutOfBounds {
                well,
                rows,
                columns,
            } => Self::WellOutOfBounds {
                well,
                rows,
                columns,
            },
        }
    }
}
