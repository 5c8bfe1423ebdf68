//! Rounding, zero rule and display formatting
//!
//! Declared values go through two stages: the zero rule first (insignificant
//! amounts become exactly 0), then magnitude-tiered rounding. Display strings
//! are a pure function of the rounded value.

use serde::{Deserialize, Serialize};

use super::aggregation::KJ_PER_KCAL;
use super::nutrient::{Nutrient, NutrientUnit, NutrientValues};
use super::tables::ZeroLimits;

/// Declare a nutrient as zero when it is at or below its insignificance limit
pub fn apply_zero_rule(value: f64, nutrient: Nutrient, limits: &ZeroLimits) -> f64 {
    match limits.limit_for(nutrient) {
        Some(limit) if value <= limit => 0.0,
        _ => value,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Magnitude-tiered rounding.
///
/// - `>= 10`: nearest integer
/// - `[1, 10)`: one decimal
/// - `< 1`: one decimal for grams, two decimals for mg, kcal and kJ
pub fn apply_rounding_rules(value: f64, unit: NutrientUnit) -> f64 {
    if value >= 10.0 {
        return value.round();
    }

    if value >= 1.0 {
        return round_to(value, 1);
    }

    match unit {
        NutrientUnit::Grams => round_to(value, 1),
        NutrientUnit::Milligrams | NutrientUnit::Kcal | NutrientUnit::Kj => round_to(value, 2),
    }
}

/// Zero rule followed by rounding: the amount as declared on the label
pub fn declare_value(value: f64, nutrient: Nutrient, limits: &ZeroLimits) -> f64 {
    apply_rounding_rules(apply_zero_rule(value, nutrient, limits), nutrient.unit())
}

/// Render a value the way it is printed on the label
pub fn format_display_value(value: f64, unit: NutrientUnit) -> String {
    let rounded = apply_rounding_rules(value, unit);

    if rounded == 0.0 {
        return "0".to_string();
    }

    if rounded.fract() == 0.0 {
        return format!("{:.0}", rounded);
    }

    if rounded >= 1.0 {
        return format!("{:.1}", rounded);
    }

    match unit {
        NutrientUnit::Grams => format!("{:.1}", rounded),
        _ => {
            let two = format!("{:.2}", rounded);
            if two.ends_with('0') {
                format!("{:.1}", rounded)
            } else {
                two
            }
        }
    }
}

/// Display strings for every declared nutrient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValues {
    pub energy_kcal: String,
    pub energy_kj: String,
    pub carbohydrates: String,
    pub total_sugars: String,
    pub added_sugars: String,
    pub proteins: String,
    pub total_fat: String,
    pub saturated_fat: String,
    pub trans_fat: String,
    pub fiber: String,
    pub sodium: String,
}

impl DisplayValues {
    /// Format every field of an already-rounded set
    pub fn from_rounded(rounded: &NutrientValues) -> Self {
        let fmt = |n: Nutrient| format_display_value(rounded.get(n), n.unit());
        Self {
            energy_kcal: fmt(Nutrient::EnergyKcal),
            energy_kj: fmt(Nutrient::EnergyKj),
            carbohydrates: fmt(Nutrient::Carbohydrates),
            total_sugars: fmt(Nutrient::TotalSugars),
            added_sugars: fmt(Nutrient::AddedSugars),
            proteins: fmt(Nutrient::Proteins),
            total_fat: fmt(Nutrient::TotalFat),
            saturated_fat: fmt(Nutrient::SaturatedFat),
            trans_fat: fmt(Nutrient::TransFat),
            fiber: fmt(Nutrient::Fiber),
            sodium: fmt(Nutrient::Sodium),
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> &str {
        match nutrient {
            Nutrient::EnergyKcal => &self.energy_kcal,
            Nutrient::EnergyKj => &self.energy_kj,
            Nutrient::Carbohydrates => &self.carbohydrates,
            Nutrient::TotalSugars => &self.total_sugars,
            Nutrient::AddedSugars => &self.added_sugars,
            Nutrient::Proteins => &self.proteins,
            Nutrient::TotalFat => &self.total_fat,
            Nutrient::SaturatedFat => &self.saturated_fat,
            Nutrient::TransFat => &self.trans_fat,
            Nutrient::Fiber => &self.fiber,
            Nutrient::Sodium => &self.sodium,
        }
    }
}

/// Declared numeric values plus their display strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedValues {
    pub rounded: NutrientValues,
    pub display: DisplayValues,
}

/// Apply zero rule and rounding to a full set of raw values.
///
/// kJ is derived from the declared kcal so the printed pair always agrees.
pub fn round_values(values: &NutrientValues, limits: &ZeroLimits) -> RoundedValues {
    let mut rounded = NutrientValues::zero();

    for nutrient in Nutrient::ALL.iter().filter(|n| **n != Nutrient::EnergyKj) {
        rounded.set(*nutrient, declare_value(values.get(*nutrient), *nutrient, limits));
    }
    rounded.energy_kj = apply_rounding_rules(rounded.energy_kcal * KJ_PER_KCAL, NutrientUnit::Kj);

    let display = DisplayValues::from_rounded(&rounded);
    RoundedValues { rounded, display }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ZeroLimits = ZeroLimits::IN_75_2020;

    #[test]
    fn test_zero_rule_thresholds_inclusive() {
        assert_eq!(apply_zero_rule(4.0, Nutrient::EnergyKcal, &LIMITS), 0.0);
        assert_eq!(apply_zero_rule(4.01, Nutrient::EnergyKcal, &LIMITS), 4.01);
        assert_eq!(apply_zero_rule(0.5, Nutrient::Proteins, &LIMITS), 0.0);
        assert_eq!(apply_zero_rule(0.2, Nutrient::TransFat, &LIMITS), 0.0);
        assert_eq!(apply_zero_rule(0.21, Nutrient::TransFat, &LIMITS), 0.21);
        assert_eq!(apply_zero_rule(5.0, Nutrient::Sodium, &LIMITS), 0.0);
    }

    #[test]
    fn test_sugars_never_zeroed() {
        assert_eq!(apply_zero_rule(0.1, Nutrient::TotalSugars, &LIMITS), 0.1);
        assert_eq!(apply_zero_rule(0.1, Nutrient::AddedSugars, &LIMITS), 0.1);
    }

    #[test]
    fn test_zero_rule_idempotent() {
        for value in [0.0, 0.15, 0.2, 0.5, 0.7, 3.9, 4.0, 12.0] {
            for nutrient in Nutrient::ALL {
                let once = apply_zero_rule(value, nutrient, &LIMITS);
                assert_eq!(apply_zero_rule(once, nutrient, &LIMITS), once);
            }
        }
    }

    #[test]
    fn test_rounding_tiers() {
        assert_eq!(apply_rounding_rules(12.4, NutrientUnit::Grams), 12.0);
        assert_eq!(apply_rounding_rules(12.5, NutrientUnit::Grams), 13.0);
        assert_eq!(apply_rounding_rules(3.46, NutrientUnit::Grams), 3.5);
        assert_eq!(apply_rounding_rules(4.96, NutrientUnit::Grams), 5.0);
        assert_eq!(apply_rounding_rules(0.46, NutrientUnit::Grams), 0.5);
        assert_eq!(apply_rounding_rules(0.456, NutrientUnit::Milligrams), 0.46);
        assert_eq!(apply_rounding_rules(0.404, NutrientUnit::Kcal), 0.4);
    }

    #[test]
    fn test_rounding_idempotent() {
        let samples = [0.0, 0.04, 0.15, 0.456, 0.96, 0.999, 1.05, 3.46, 9.96, 10.5, 123.4];
        for unit in [NutrientUnit::Grams, NutrientUnit::Milligrams, NutrientUnit::Kcal, NutrientUnit::Kj] {
            for value in samples {
                let once = apply_rounding_rules(value, unit);
                assert_eq!(apply_rounding_rules(once, unit), once, "{} {:?}", value, unit);
            }
        }
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format_display_value(0.0, NutrientUnit::Grams), "0");
        assert_eq!(format_display_value(285.0, NutrientUnit::Kcal), "285");
        assert_eq!(format_display_value(12.4, NutrientUnit::Grams), "12");
        assert_eq!(format_display_value(3.46, NutrientUnit::Grams), "3.5");
        assert_eq!(format_display_value(3.0, NutrientUnit::Grams), "3");
        assert_eq!(format_display_value(0.96, NutrientUnit::Grams), "1");
        assert_eq!(format_display_value(0.3, NutrientUnit::Grams), "0.3");
        assert_eq!(format_display_value(0.456, NutrientUnit::Milligrams), "0.46");
        assert_eq!(format_display_value(0.1, NutrientUnit::Milligrams), "0.1");
        assert_eq!(format_display_value(0.001, NutrientUnit::Milligrams), "0");
    }

    #[test]
    fn test_zero_rule_before_rounding() {
        // 0.3 g fat would round to "0.3" but is insignificant
        assert_eq!(declare_value(0.3, Nutrient::TotalFat, &LIMITS), 0.0);
        assert_eq!(declare_value(0.3, Nutrient::TotalSugars, &LIMITS), 0.3);
    }

    #[test]
    fn test_kj_follows_rounded_kcal() {
        let values = NutrientValues {
            energy_kcal: 123.4,
            energy_kj: 518.28,
            ..Default::default()
        };
        let out = round_values(&values, &LIMITS);
        assert_eq!(out.rounded.energy_kcal, 123.0);
        assert_eq!(out.rounded.energy_kj, 517.0);
        assert_eq!(out.display.energy_kj, "517");
    }

    #[test]
    fn test_insignificant_energy_zeroes_kj() {
        let values = NutrientValues {
            energy_kcal: 3.9,
            energy_kj: 16.38,
            ..Default::default()
        };
        let out = round_values(&values, &LIMITS);
        assert_eq!(out.rounded.energy_kcal, 0.0);
        assert_eq!(out.rounded.energy_kj, 0.0);
        assert_eq!(out.display.energy_kj, "0");
    }

    #[test]
    fn test_display_is_stable_on_second_pass() {
        let raw = NutrientValues {
            energy_kcal: 187.33,
            energy_kj: 786.786,
            carbohydrates: 27.46,
            total_sugars: 0.44,
            added_sugars: 3.333,
            proteins: 4.96,
            total_fat: 6.78,
            saturated_fat: 0.15,
            trans_fat: 0.27,
            fiber: 1.04,
            sodium: 212.6,
        };
        let first = round_values(&raw, &LIMITS);
        let again = DisplayValues::from_rounded(&first.rounded);
        assert_eq!(again, first.display);
        for nutrient in Nutrient::ALL {
            let v = first.rounded.get(nutrient);
            assert_eq!(apply_rounding_rules(v, nutrient.unit()), v);
        }
        assert_eq!(first.display.saturated_fat, "0");
        assert_eq!(first.display.trans_fat, "0.3");
        assert_eq!(first.display.fiber, "1");
        assert_eq!(first.display.total_sugars, "0.4");
    }
}
