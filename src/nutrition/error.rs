//! Engine precondition errors

use thiserror::Error;

use super::nutrient::Nutrient;

/// Input that violates the engine's preconditions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    #[error("final yield must be a positive number, got {0}")]
    InvalidFinalYield(f64),

    #[error("number of portions must be at least 1")]
    InvalidPortionCount,

    #[error("declared added sugars must be a non-negative number, got {0}")]
    InvalidAddedSugars(f64),

    #[error("ingredient '{name}' has invalid quantity {quantity}")]
    InvalidQuantity { name: String, quantity: f64 },

    #[error("ingredient '{name}' has invalid {nutrient} amount {value}")]
    InvalidNutrient {
        name: String,
        nutrient: Nutrient,
        value: f64,
    },
}

/// Result type for engine operations
pub type NutritionResultOf<T> = Result<T, NutritionError>;
