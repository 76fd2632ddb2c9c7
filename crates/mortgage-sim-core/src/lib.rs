pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::SimulationError;
pub use types::*;

/// Standard result type for all mortgage-sim operations
pub type SimulationResult<T> = Result<T, SimulationError>;
