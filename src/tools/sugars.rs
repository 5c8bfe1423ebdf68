//! Added sugars MCP Tool

use serde::Serialize;

use crate::estimation::{AddedSugarsEstimate, EstimationCoordinator, EstimationError};
use crate::nutrition::IngredientLine;

/// Response for estimate_added_sugars
#[derive(Debug, Serialize)]
pub struct EstimateAddedSugarsResponse {
    #[serde(flatten)]
    pub estimate: AddedSugarsEstimate,
    pub message: String,
}

/// Estimate the recipe's added sugars; `coordinator` is `None` when no estimator is configured
pub async fn estimate_added_sugars(
    coordinator: Option<&EstimationCoordinator>,
    ingredients: Vec<IngredientLine>,
) -> Result<EstimateAddedSugarsResponse, String> {
    if ingredients.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }
    if let Some(line) = ingredients
        .iter()
        .find(|l| !l.quantity_g.is_finite() || l.quantity_g <= 0.0)
    {
        return Err(format!(
            "Ingredient '{}' has invalid quantity {}",
            line.name, line.quantity_g
        ));
    }

    let coordinator = coordinator.ok_or_else(|| EstimationError::NotConfigured.to_string())?;

    let estimate = coordinator
        .estimate(ingredients)
        .await
        .map_err(|e| e.to_string())?;

    let message = format!(
        "Estimated {:.1}g of added sugars across {} ingredients. Review before using as added_sugars_g.",
        estimate.total_g,
        estimate.ingredients.len()
    );

    Ok(EstimateAddedSugarsResponse { estimate, message })
}
