use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic degenerate: {context} is not representable")]
    ArithmeticDegenerate { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Column overflow: {column} cannot store {value}")]
    ColumnOverflow { column: String, value: Decimal },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SimulationError {
    pub(crate) fn degenerate(context: impl Into<String>) -> Self {
        SimulationError::ArithmeticDegenerate {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::SerializationError(e.to_string())
    }
}
