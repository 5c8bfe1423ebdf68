//! Recipe aggregation
//!
//! Sums weighted ingredient contributions and scales the totals to the
//! per-portion and per-100g bases. Energy is derived from macronutrients at
//! each basis separately, never carried over from another basis.

use serde::{Deserialize, Serialize};

use super::error::{NutritionError, NutritionResultOf};
use super::input::IngredientLine;
use super::nutrient::NutrientValues;

/// kcal per gram of carbohydrate
pub const KCAL_PER_G_CARBOHYDRATE: f64 = 4.0;
/// kcal per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// kJ per kcal as used on Brazilian labels
pub const KJ_PER_KCAL: f64 = 4.2;

/// Energy derived from macronutrients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub kcal: f64,
    pub kj: f64,
}

/// Derive energy from carbohydrates, proteins and total fat
pub fn compute_energy(values: &NutrientValues) -> Energy {
    let kcal = values.carbohydrates * KCAL_PER_G_CARBOHYDRATE
        + values.proteins * KCAL_PER_G_PROTEIN
        + values.total_fat * KCAL_PER_G_FAT;

    Energy {
        kcal,
        kj: kcal * KJ_PER_KCAL,
    }
}

fn with_energy(mut values: NutrientValues) -> NutrientValues {
    let energy = compute_energy(&values);
    values.energy_kcal = energy.kcal;
    values.energy_kj = energy.kj;
    values
}

/// Sum ingredient contributions into recipe totals.
///
/// Added sugars is the declared amount, not the sum of ingredient profiles.
/// Ingredient energy fields are ignored.
pub fn compute_totals(ingredients: &[IngredientLine], added_sugars_g: f64) -> NutrientValues {
    let mut totals: NutrientValues = ingredients
        .iter()
        .map(|line| line.nutrients_per_100g.scale(line.quantity_g / 100.0))
        .sum();

    totals.added_sugars = added_sugars_g;
    with_energy(totals)
}

/// Divide recipe totals into one portion
pub fn per_portion(totals: &NutrientValues, num_portions: u32) -> NutritionResultOf<NutrientValues> {
    if num_portions == 0 {
        return Err(NutritionError::InvalidPortionCount);
    }
    let portions = f64::from(num_portions);
    Ok(with_energy(totals.map_nutrients(|v| v / portions)))
}

/// Normalize recipe totals to 100 g (or 100 ml) of finished product
pub fn per_100g(totals: &NutrientValues, final_yield_g: f64) -> NutritionResultOf<NutrientValues> {
    if !final_yield_g.is_finite() || final_yield_g <= 0.0 {
        return Err(NutritionError::InvalidFinalYield(final_yield_g));
    }
    Ok(with_energy(totals.map_nutrients(|v| (v / final_yield_g) * 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::nutrient::NutrientProfile;

    const EPS: f64 = 1e-9;

    fn bread_dough() -> Vec<IngredientLine> {
        vec![
            IngredientLine::new(
                "Farinha de trigo",
                500.0,
                NutrientProfile {
                    carbohydrates: 75.1,
                    proteins: 9.8,
                    total_fat: 1.4,
                    saturated_fat: 0.3,
                    fiber: 2.3,
                    sodium: 1.0,
                    added_sugars: 40.0,
                    energy_kcal: 360.0,
                    ..Default::default()
                },
            ),
            IngredientLine::new(
                "Manteiga com sal",
                50.0,
                NutrientProfile {
                    proteins: 0.4,
                    total_fat: 82.4,
                    saturated_fat: 48.0,
                    trans_fat: 2.9,
                    sodium: 579.0,
                    ..Default::default()
                },
            ),
        ]
    }

    fn assert_energy_consistent(values: &NutrientValues) {
        let kcal = values.carbohydrates * 4.0 + values.proteins * 4.0 + values.total_fat * 9.0;
        assert!((values.energy_kcal - kcal).abs() < EPS);
        assert!((values.energy_kj - values.energy_kcal * 4.2).abs() < EPS);
    }

    #[test]
    fn test_energy_from_macros() {
        let values = NutrientValues {
            carbohydrates: 50.0,
            proteins: 10.0,
            total_fat: 5.0,
            ..Default::default()
        };
        let energy = compute_energy(&values);
        assert!((energy.kcal - 285.0).abs() < EPS);
        assert!((energy.kj - 1197.0).abs() < EPS);
    }

    #[test]
    fn test_totals_weight_by_quantity() {
        let totals = compute_totals(&bread_dough(), 0.0);
        assert!((totals.carbohydrates - 375.5).abs() < EPS);
        assert!((totals.total_fat - (7.0 + 41.2)).abs() < EPS);
        assert!((totals.sodium - (5.0 + 289.5)).abs() < EPS);
        assert!((totals.trans_fat - 1.45).abs() < EPS);
        assert_energy_consistent(&totals);
    }

    #[test]
    fn test_added_sugars_is_override() {
        for declared in [0.0, 12.5, 300.0] {
            let totals = compute_totals(&bread_dough(), declared);
            assert_eq!(totals.added_sugars, declared);
        }
    }

    #[test]
    fn test_ingredient_energy_is_ignored() {
        let totals = compute_totals(&bread_dough(), 0.0);
        // 360 kcal/100g on the flour profile would give 1800 kcal if summed
        assert_energy_consistent(&totals);
        assert!((totals.energy_kcal - 1800.0).abs() > 1.0);
    }

    #[test]
    fn test_empty_recipe_is_all_zero() {
        let totals = compute_totals(&[], 3.0);
        assert_eq!(totals.carbohydrates, 0.0);
        assert_eq!(totals.energy_kcal, 0.0);
        assert_eq!(totals.added_sugars, 3.0);
    }

    #[test]
    fn test_per_portion_recomputes_energy() {
        let totals = compute_totals(&bread_dough(), 20.0);
        let portion = per_portion(&totals, 12).unwrap();
        assert!((portion.carbohydrates - totals.carbohydrates / 12.0).abs() < EPS);
        assert!((portion.added_sugars - 20.0 / 12.0).abs() < EPS);
        assert_energy_consistent(&portion);
    }

    #[test]
    fn test_per_100g_recomputes_energy() {
        let totals = compute_totals(&bread_dough(), 20.0);
        let per100 = per_100g(&totals, 480.0).unwrap();
        assert!((per100.sodium - (totals.sodium / 480.0) * 100.0).abs() < EPS);
        assert_energy_consistent(&per100);
    }

    #[test]
    fn test_invalid_divisors_fail_fast() {
        let totals = compute_totals(&bread_dough(), 0.0);
        assert_eq!(per_portion(&totals, 0), Err(NutritionError::InvalidPortionCount));
        assert_eq!(per_100g(&totals, 0.0), Err(NutritionError::InvalidFinalYield(0.0)));
        assert!(per_100g(&totals, -10.0).is_err());
        assert!(per_100g(&totals, f64::INFINITY).is_err());
    }
}
