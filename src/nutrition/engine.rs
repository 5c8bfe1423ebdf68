//! Nutrition calculation orchestrator
//!
//! Runs aggregation, %VD, rounding and front-label classification for one
//! recipe and returns a single immutable [`NutritionResult`].

use serde::{Deserialize, Serialize};

use super::aggregation::{compute_totals, per_100g, per_portion};
use super::daily_value::{compute_daily_values, DailyValuePercent};
use super::error::{NutritionError, NutritionResultOf};
use super::front_label::{classify_front_label, FrontLabelFlags};
use super::input::{IngredientLine, RecipeContext};
use super::nutrient::NutrientValues;
use super::rounding::{round_values, DisplayValues};
use super::tables::RegulatoryTables;

/// Display strings for both declared bases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayBundle {
    pub per_portion: DisplayValues,
    pub per_100g: DisplayValues,
}

/// Everything a label needs, computed from one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionResult {
    /// Raw recipe totals with derived energy
    pub totals_recipe: NutrientValues,
    /// Declared (zero rule + rounding) values for one portion
    pub per_portion: NutrientValues,
    /// Declared (zero rule + rounding) values for 100 g/ml
    pub per_100g: NutrientValues,
    /// %VD from unrounded per-portion values
    pub vd_percent: DailyValuePercent,
    pub display_values: DisplayBundle,
    pub front_label: FrontLabelFlags,
}

/// Stateless calculator bound to a set of regulatory tables
#[derive(Debug, Clone, Default)]
pub struct NutritionEngine {
    tables: RegulatoryTables,
}

impl NutritionEngine {
    pub fn new(tables: RegulatoryTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RegulatoryTables {
        &self.tables
    }

    /// Compute the full nutrition result for a recipe
    pub fn calculate(
        &self,
        ingredients: &[IngredientLine],
        context: &RecipeContext,
    ) -> NutritionResultOf<NutritionResult> {
        validate(ingredients, context)?;

        tracing::debug!(
            "Calculating nutrition: {} ingredients, yield {}g, {} portions",
            ingredients.len(),
            context.final_yield_g,
            context.num_portions
        );

        let totals = compute_totals(ingredients, context.added_sugars_g);
        let portion_raw = per_portion(&totals, context.num_portions)?;
        let per_100g_raw = per_100g(&totals, context.final_yield_g)?;

        let vd_percent = compute_daily_values(&portion_raw, &self.tables.daily_values);

        let portion = round_values(&portion_raw, &self.tables.zero_limits);
        let hundred = round_values(&per_100g_raw, &self.tables.zero_limits);

        let front_label =
            classify_front_label(&per_100g_raw, context.product_type, &self.tables.front_label);

        Ok(NutritionResult {
            totals_recipe: totals,
            per_portion: portion.rounded,
            per_100g: hundred.rounded,
            vd_percent,
            display_values: DisplayBundle {
                per_portion: portion.display,
                per_100g: hundred.display,
            },
            front_label,
        })
    }
}

/// Calculate with the Brazilian regulatory tables
pub fn calculate_nutrition(
    ingredients: &[IngredientLine],
    context: &RecipeContext,
) -> NutritionResultOf<NutritionResult> {
    NutritionEngine::default().calculate(ingredients, context)
}

fn validate(ingredients: &[IngredientLine], context: &RecipeContext) -> NutritionResultOf<()> {
    if !context.final_yield_g.is_finite() || context.final_yield_g <= 0.0 {
        return Err(NutritionError::InvalidFinalYield(context.final_yield_g));
    }
    if context.num_portions == 0 {
        return Err(NutritionError::InvalidPortionCount);
    }
    if !context.added_sugars_g.is_finite() || context.added_sugars_g < 0.0 {
        return Err(NutritionError::InvalidAddedSugars(context.added_sugars_g));
    }

    for line in ingredients {
        if !line.quantity_g.is_finite() || line.quantity_g <= 0.0 {
            return Err(NutritionError::InvalidQuantity {
                name: line.name.clone(),
                quantity: line.quantity_g,
            });
        }
        if let Some((nutrient, value)) = line.nutrients_per_100g.first_invalid() {
            return Err(NutritionError::InvalidNutrient {
                name: line.name.clone(),
                nutrient,
                value,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::input::ProductType;
    use crate::nutrition::nutrient::{Nutrient, NutrientProfile};
    use crate::nutrition::rounding::apply_rounding_rules;

    const EPS: f64 = 1e-9;

    fn context(final_yield_g: f64, num_portions: u32, added_sugars_g: f64) -> RecipeContext {
        RecipeContext {
            final_yield_g,
            num_portions,
            added_sugars_g,
            product_type: ProductType::Solid,
        }
    }

    fn scenario_a_line() -> IngredientLine {
        IngredientLine::new(
            "Mistura base",
            100.0,
            NutrientProfile {
                carbohydrates: 50.0,
                proteins: 10.0,
                total_fat: 5.0,
                saturated_fat: 1.0,
                fiber: 2.0,
                sodium: 100.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_single_ingredient_reference_recipe() {
        let result = calculate_nutrition(&[scenario_a_line()], &context(100.0, 1, 0.0)).unwrap();

        assert!((result.totals_recipe.energy_kcal - 285.0).abs() < EPS);
        assert!((result.totals_recipe.energy_kj - 1197.0).abs() < EPS);
        assert_eq!(result.per_portion.energy_kcal, 285.0);
        assert_eq!(result.per_portion.energy_kj, 1197.0);
        assert_eq!(result.display_values.per_portion.energy_kj, "1197");
        assert_eq!(result.per_100g.carbohydrates, 50.0);
        assert_eq!(result.display_values.per_100g.carbohydrates, "50");
        assert_eq!(result.display_values.per_100g.sodium, "100");
        assert_eq!(result.front_label, FrontLabelFlags::default());
    }

    #[test]
    fn test_insignificant_saturated_fat() {
        let line = IngredientLine::new(
            "Farinha de arroz",
            100.0,
            NutrientProfile {
                carbohydrates: 80.0,
                saturated_fat: 0.15,
                ..Default::default()
            },
        );
        let result = calculate_nutrition(&[line], &context(100.0, 1, 0.0)).unwrap();

        assert_eq!(result.per_portion.saturated_fat, 0.0);
        assert_eq!(result.display_values.per_portion.saturated_fat, "0");
        assert_eq!(result.display_values.per_100g.saturated_fat, "0");
        assert!(!result.front_label.high_saturated_fat);
        // %VD keeps the unrounded figure
        assert!((result.vd_percent.saturated_fat - 0.75).abs() < EPS);
    }

    #[test]
    fn test_added_sugars_threshold_end_to_end() {
        let line = IngredientLine::new("Massa", 100.0, NutrientProfile::default());

        let at_limit = calculate_nutrition(&[line.clone()], &context(100.0, 1, 15.0)).unwrap();
        assert!(at_limit.front_label.high_added_sugars);

        let below = calculate_nutrition(&[line], &context(100.0, 1, 14.99)).unwrap();
        assert!(!below.front_label.high_added_sugars);
    }

    #[test]
    fn test_energy_consistent_at_every_basis() {
        let lines = vec![
            scenario_a_line(),
            IngredientLine::new(
                "Óleo de soja",
                13.0,
                NutrientProfile {
                    total_fat: 100.0,
                    saturated_fat: 15.2,
                    trans_fat: 0.4,
                    ..Default::default()
                },
            ),
        ];
        let result = calculate_nutrition(&lines, &context(95.0, 3, 2.0)).unwrap();

        let t = &result.totals_recipe;
        let kcal = t.carbohydrates * 4.0 + t.proteins * 4.0 + t.total_fat * 9.0;
        assert!((t.energy_kcal - kcal).abs() < EPS);
        assert!((t.energy_kj - kcal * 4.2).abs() < EPS);

        // declared kJ always follows declared kcal
        for declared in [&result.per_portion, &result.per_100g] {
            let expected = apply_rounding_rules(declared.energy_kcal * 4.2, Nutrient::EnergyKj.unit());
            assert_eq!(declared.energy_kj, expected);
        }
    }

    #[test]
    fn test_display_bundle_is_stable() {
        let result = calculate_nutrition(&[scenario_a_line()], &context(240.0, 7, 4.4)).unwrap();
        assert_eq!(
            DisplayValues::from_rounded(&result.per_portion),
            result.display_values.per_portion
        );
        assert_eq!(
            DisplayValues::from_rounded(&result.per_100g),
            result.display_values.per_100g
        );
    }

    #[test]
    fn test_empty_ingredient_list() {
        let result = calculate_nutrition(&[], &context(100.0, 1, 0.0)).unwrap();
        assert_eq!(result.per_portion, NutrientValues::zero());
        assert_eq!(result.display_values.per_portion.energy_kcal, "0");
    }

    #[test]
    fn test_preconditions() {
        let lines = vec![scenario_a_line()];
        assert_eq!(
            calculate_nutrition(&lines, &context(0.0, 1, 0.0)),
            Err(NutritionError::InvalidFinalYield(0.0))
        );
        assert_eq!(
            calculate_nutrition(&lines, &context(100.0, 0, 0.0)),
            Err(NutritionError::InvalidPortionCount)
        );
        assert_eq!(
            calculate_nutrition(&lines, &context(100.0, 1, -1.0)),
            Err(NutritionError::InvalidAddedSugars(-1.0))
        );

        let bad_qty = IngredientLine::new("Sal", 0.0, NutrientProfile::default());
        assert!(matches!(
            calculate_nutrition(&[bad_qty], &context(100.0, 1, 0.0)),
            Err(NutritionError::InvalidQuantity { .. })
        ));

        let bad_profile = IngredientLine::new(
            "Sal",
            1.0,
            NutrientProfile {
                sodium: -3.0,
                ..Default::default()
            },
        );
        assert_eq!(
            calculate_nutrition(&[bad_profile], &context(100.0, 1, 0.0)),
            Err(NutritionError::InvalidNutrient {
                name: "Sal".to_string(),
                nutrient: Nutrient::Sodium,
                value: -3.0,
            })
        );
    }

    #[test]
    fn test_result_roundtrips_through_json() {
        let result = calculate_nutrition(&[scenario_a_line()], &context(100.0, 2, 1.0)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: NutritionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
