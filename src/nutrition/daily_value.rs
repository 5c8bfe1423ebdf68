//! Percent daily value (%VD)
//!
//! Always computed from unrounded per-portion values. Nothing here rounds;
//! [`format_daily_value`] is the presentation step.

use serde::{Deserialize, Serialize};

use super::nutrient::{Nutrient, NutrientValues};
use super::tables::ReferenceDailyValues;

/// %VD per nutrient. Total sugars has no reference and is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyValuePercent {
    pub energy_kcal: f64,
    pub energy_kj: f64,
    pub carbohydrates: f64,
    pub added_sugars: f64,
    pub proteins: f64,
    pub total_fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

impl DailyValuePercent {
    /// `None` when no reference value is established (total sugars)
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::EnergyKcal => Some(self.energy_kcal),
            Nutrient::EnergyKj => Some(self.energy_kj),
            Nutrient::Carbohydrates => Some(self.carbohydrates),
            Nutrient::TotalSugars => None,
            Nutrient::AddedSugars => Some(self.added_sugars),
            Nutrient::Proteins => Some(self.proteins),
            Nutrient::TotalFat => Some(self.total_fat),
            Nutrient::SaturatedFat => Some(self.saturated_fat),
            Nutrient::TransFat => Some(self.trans_fat),
            Nutrient::Fiber => Some(self.fiber),
            Nutrient::Sodium => Some(self.sodium),
        }
    }
}

/// Divide each per-portion value by its reference daily intake
pub fn compute_daily_values(
    per_portion: &NutrientValues,
    reference: &ReferenceDailyValues,
) -> DailyValuePercent {
    let pct = |value: f64, reference: f64| (value / reference) * 100.0;

    DailyValuePercent {
        energy_kcal: pct(per_portion.energy_kcal, reference.energy_kcal),
        energy_kj: pct(per_portion.energy_kj, reference.energy_kj),
        carbohydrates: pct(per_portion.carbohydrates, reference.carbohydrates),
        added_sugars: pct(per_portion.added_sugars, reference.added_sugars),
        proteins: pct(per_portion.proteins, reference.proteins),
        total_fat: pct(per_portion.total_fat, reference.total_fat),
        saturated_fat: pct(per_portion.saturated_fat, reference.saturated_fat),
        trans_fat: pct(per_portion.trans_fat, reference.trans_fat),
        fiber: pct(per_portion.fiber, reference.fiber),
        sodium: pct(per_portion.sodium, reference.sodium),
    }
}

/// Label text for a %VD cell: nearest integer, or `**` when not established
pub fn format_daily_value(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{:.0}", value.round()),
        None => "**".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_percentages() {
        let portion = NutrientValues {
            energy_kcal: 285.0,
            energy_kj: 1197.0,
            carbohydrates: 50.0,
            added_sugars: 5.0,
            proteins: 10.0,
            total_fat: 5.0,
            saturated_fat: 1.0,
            trans_fat: 0.1,
            fiber: 2.0,
            sodium: 100.0,
            total_sugars: 9.0,
        };
        let dv = compute_daily_values(&portion, &ReferenceDailyValues::IN_75_2020);
        assert!((dv.energy_kcal - 14.25).abs() < EPS);
        assert!((dv.energy_kj - 14.25).abs() < EPS);
        assert!((dv.carbohydrates - 50.0 / 3.0).abs() < EPS);
        assert!((dv.added_sugars - 10.0).abs() < EPS);
        assert!((dv.sodium - 5.0).abs() < EPS);
        assert!((dv.trans_fat - 5.0).abs() < EPS);
        assert_eq!(dv.get(Nutrient::TotalSugars), None);
    }

    #[test]
    fn test_not_rounded_internally() {
        let portion = NutrientValues {
            proteins: 0.3,
            ..Default::default()
        };
        let dv = compute_daily_values(&portion, &ReferenceDailyValues::IN_75_2020);
        // 0.3 g protein would be declared as 0 g, %VD still reflects it
        assert!((dv.proteins - 0.6).abs() < EPS);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_daily_value(Some(14.25)), "14");
        assert_eq!(format_daily_value(Some(16.6667)), "17");
        assert_eq!(format_daily_value(Some(0.0)), "0");
        assert_eq!(format_daily_value(None), "**");
    }
}
