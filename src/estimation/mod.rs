//! Added-sugar estimation
//!
//! The engine takes the recipe's added sugars as an input. This module helps
//! the caller arrive at that number: pure sugars count in full, food-table
//! profiles are used when they declare added sugars, and everything else is
//! asked of a [`SugarEstimator`].

pub mod coordinator;
pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::labeling::normalize_name;
use crate::nutrition::IngredientLine;

pub use coordinator::EstimationCoordinator;
pub use gemini::{GeminiEstimator, RetryPolicy};

#[derive(Error, Debug)]
pub enum EstimationError {
    #[error("Sugar estimation is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("Estimation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Estimation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Estimation service is throttling requests; gave up after {attempts} attempts")]
    Throttled { attempts: u32 },

    #[error("Estimation was superseded by a newer request")]
    Superseded,

    #[error("Estimation task failed: {0}")]
    Task(String),
}

pub type EstimationResult<T> = Result<T, EstimationError>;

/// Something that can guess sugar content for a quantity of a named food
#[async_trait]
pub trait SugarEstimator: Send + Sync {
    /// Grams of added sugars in `quantity_g` grams of `name`
    async fn estimate_added_sugars(&self, name: &str, quantity_g: f64) -> EstimationResult<f64>;

    /// Grams of total sugars in `quantity_g` grams of `name`
    async fn estimate_total_sugars(&self, name: &str, quantity_g: f64) -> EstimationResult<f64>;
}

/// Where an ingredient's added-sugar figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarSource {
    PureSugar,
    Profile,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientSugar {
    pub name: String,
    pub quantity_g: f64,
    pub added_sugars_g: f64,
    pub source: SugarSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedSugarsEstimate {
    pub ingredients: Vec<IngredientSugar>,
    /// Sum for the whole recipe, one decimal
    pub total_g: f64,
}

/// Sugar sold as an ingredient ("Açúcar refinado", "açúcar mascavo", ...)
pub fn is_pure_sugar(name: &str) -> bool {
    normalize_name(name).starts_with("acucar")
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Added sugars contributed by one ingredient line
pub async fn resolve_ingredient(
    line: &IngredientLine,
    estimator: &dyn SugarEstimator,
) -> EstimationResult<IngredientSugar> {
    let (added_sugars_g, source) = if is_pure_sugar(&line.name) {
        (line.quantity_g, SugarSource::PureSugar)
    } else if line.nutrients_per_100g.added_sugars > 0.0 {
        (
            line.nutrients_per_100g.added_sugars * line.quantity_g / 100.0,
            SugarSource::Profile,
        )
    } else {
        let estimate = estimator
            .estimate_added_sugars(&line.name, line.quantity_g)
            .await?;
        // never more sugar than the ingredient weighs
        (estimate.clamp(0.0, line.quantity_g), SugarSource::Estimated)
    };

    tracing::debug!(
        "Added sugars for '{}': {:.2}g ({:?})",
        line.name,
        added_sugars_g,
        source
    );

    Ok(IngredientSugar {
        name: line.name.clone(),
        quantity_g: line.quantity_g,
        added_sugars_g,
        source,
    })
}

/// Resolve every line in order and total the recipe
pub async fn estimate_recipe_added_sugars(
    lines: &[IngredientLine],
    estimator: &dyn SugarEstimator,
) -> EstimationResult<AddedSugarsEstimate> {
    let mut ingredients = Vec::with_capacity(lines.len());
    for line in lines {
        ingredients.push(resolve_ingredient(line, estimator).await?);
    }

    let total: f64 = ingredients.iter().map(|i| i.added_sugars_g).sum();

    Ok(AddedSugarsEstimate {
        ingredients,
        total_g: round_one_decimal(total),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns a fixed fraction of the quantity, optionally after a delay
    pub struct FixedEstimator {
        pub fraction: f64,
        pub delay: Duration,
        pub calls: AtomicUsize,
    }

    impl FixedEstimator {
        pub fn new(fraction: f64) -> Self {
            Self {
                fraction,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn slow(fraction: f64, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(fraction)
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SugarEstimator for FixedEstimator {
        async fn estimate_added_sugars(&self, _name: &str, quantity_g: f64) -> EstimationResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(quantity_g * self.fraction)
        }

        async fn estimate_total_sugars(&self, name: &str, quantity_g: f64) -> EstimationResult<f64> {
            self.estimate_added_sugars(name, quantity_g).await
        }
    }
}
