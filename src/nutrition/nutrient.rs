//! Nutrient catalogue and value containers
//!
//! Every table, rounding rule and reference value is keyed by [`Nutrient`].

use std::fmt;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Unit a nutrient is declared in on the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientUnit {
    Grams,
    Milligrams,
    Kcal,
    Kj,
}

impl NutrientUnit {
    /// Symbol printed after the value on the label
    pub fn symbol(&self) -> &'static str {
        match self {
            NutrientUnit::Grams => "g",
            NutrientUnit::Milligrams => "mg",
            NutrientUnit::Kcal => "kcal",
            NutrientUnit::Kj => "kJ",
        }
    }
}

/// Nutrients declared on the Brazilian nutrition facts table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    EnergyKcal,
    EnergyKj,
    Carbohydrates,
    TotalSugars,
    AddedSugars,
    Proteins,
    TotalFat,
    SaturatedFat,
    TransFat,
    Fiber,
    Sodium,
}

impl Nutrient {
    /// All nutrients in label order
    pub const ALL: [Nutrient; 11] = [
        Nutrient::EnergyKcal,
        Nutrient::EnergyKj,
        Nutrient::Carbohydrates,
        Nutrient::TotalSugars,
        Nutrient::AddedSugars,
        Nutrient::Proteins,
        Nutrient::TotalFat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::Fiber,
        Nutrient::Sodium,
    ];

    pub fn unit(&self) -> NutrientUnit {
        match self {
            Nutrient::EnergyKcal => NutrientUnit::Kcal,
            Nutrient::EnergyKj => NutrientUnit::Kj,
            Nutrient::Sodium => NutrientUnit::Milligrams,
            _ => NutrientUnit::Grams,
        }
    }

    /// Serialized key (matches the field names of [`NutrientValues`])
    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::EnergyKcal => "energy_kcal",
            Nutrient::EnergyKj => "energy_kj",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::TotalSugars => "total_sugars",
            Nutrient::AddedSugars => "added_sugars",
            Nutrient::Proteins => "proteins",
            Nutrient::TotalFat => "total_fat",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::TransFat => "trans_fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sodium => "sodium",
        }
    }

    /// Row label used on the printed table
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::EnergyKcal | Nutrient::EnergyKj => "Valor energético",
            Nutrient::Carbohydrates => "Carboidratos",
            Nutrient::TotalSugars => "Açúcares totais",
            Nutrient::AddedSugars => "Açúcares adicionados",
            Nutrient::Proteins => "Proteínas",
            Nutrient::TotalFat => "Gorduras totais",
            Nutrient::SaturatedFat => "Gorduras saturadas",
            Nutrient::TransFat => "Gorduras trans",
            Nutrient::Fiber => "Fibra alimentar",
            Nutrient::Sodium => "Sódio",
        }
    }

    /// Whether the value is derived from macronutrients instead of summed
    pub fn is_energy(&self) -> bool {
        matches!(self, Nutrient::EnergyKcal | Nutrient::EnergyKj)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Amounts for every declared nutrient (g, mg, kcal or kJ per [`Nutrient::unit`])
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct NutrientValues {
    pub energy_kcal: f64,
    pub energy_kj: f64,
    pub carbohydrates: f64,
    pub total_sugars: f64,
    pub added_sugars: f64,
    pub proteins: f64,
    pub total_fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

/// Per-100 g/ml composition of a food, as taken from the food table.
///
/// Missing keys deserialize to zero. The energy fields are kept for reference
/// only; recipe energy is always derived from macronutrients.
pub type NutrientProfile = NutrientValues;

impl NutrientValues {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::EnergyKcal => self.energy_kcal,
            Nutrient::EnergyKj => self.energy_kj,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::TotalSugars => self.total_sugars,
            Nutrient::AddedSugars => self.added_sugars,
            Nutrient::Proteins => self.proteins,
            Nutrient::TotalFat => self.total_fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::TransFat => self.trans_fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sodium => self.sodium,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        let slot = match nutrient {
            Nutrient::EnergyKcal => &mut self.energy_kcal,
            Nutrient::EnergyKj => &mut self.energy_kj,
            Nutrient::Carbohydrates => &mut self.carbohydrates,
            Nutrient::TotalSugars => &mut self.total_sugars,
            Nutrient::AddedSugars => &mut self.added_sugars,
            Nutrient::Proteins => &mut self.proteins,
            Nutrient::TotalFat => &mut self.total_fat,
            Nutrient::SaturatedFat => &mut self.saturated_fat,
            Nutrient::TransFat => &mut self.trans_fat,
            Nutrient::Fiber => &mut self.fiber,
            Nutrient::Sodium => &mut self.sodium,
        };
        *slot = value;
    }

    /// Apply `f` to every non-energy nutrient. Energy fields are reset to zero
    /// and must be derived again by the caller.
    pub fn map_nutrients<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        let mut out = Self::zero();
        for nutrient in Nutrient::ALL.iter().filter(|n| !n.is_energy()) {
            out.set(*nutrient, f(self.get(*nutrient)));
        }
        out
    }

    /// Scale every non-energy nutrient by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map_nutrients(|v| v * multiplier)
    }

    /// Add another set of values to this one, field by field
    pub fn add(&self, other: &NutrientValues) -> Self {
        let mut out = Self::zero();
        for nutrient in Nutrient::ALL {
            out.set(nutrient, self.get(nutrient) + other.get(nutrient));
        }
        out
    }

    /// First nutrient whose amount is negative or not finite
    pub fn first_invalid(&self) -> Option<(Nutrient, f64)> {
        Nutrient::ALL
            .iter()
            .map(|n| (*n, self.get(*n)))
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
    }
}

impl std::ops::Add for NutrientValues {
    type Output = NutrientValues;

    fn add(self, other: NutrientValues) -> NutrientValues {
        NutrientValues::add(&self, &other)
    }
}

impl std::iter::Sum for NutrientValues {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientValues::zero(), |acc, n| acc + n)
    }
}
