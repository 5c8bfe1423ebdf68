//! Regulatory constant tables
//!
//! Reference daily values (IN 75/2020 Annex II), "insignificant amount"
//! limits for the zero rule (IN 75/2020 Annex IV) and front-of-package
//! thresholds (IN 75/2020 Annex XV). All tables are immutable values handed
//! to the engine; nothing here is global mutable state.

use serde::{Deserialize, Serialize};

use super::input::ProductType;
use super::nutrient::Nutrient;

/// Reference daily intakes used for %VD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDailyValues {
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

impl ReferenceDailyValues {
    pub const IN_75_2020: Self = Self {
        energy_kcal: 2000.0,
        energy_kj: 8400.0,
        carbohydrates: 300.0,
        added_sugars: 50.0,
        proteins: 50.0,
        total_fat: 65.0,
        saturated_fat: 20.0,
        trans_fat: 2.0,
        fiber: 25.0,
        sodium: 2000.0,
    };

    /// Reference amount for a nutrient. Total sugars has none.
    pub fn reference_for(&self, nutrient: Nutrient) -> Option<f64> {
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

/// Amounts at or below which a nutrient is declared as zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroLimits {
    pub energy_kcal: f64,
    pub carbohydrates: f64,
    pub proteins: f64,
    pub total_fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

impl ZeroLimits {
    pub const IN_75_2020: Self = Self {
        energy_kcal: 4.0,
        carbohydrates: 0.5,
        proteins: 0.5,
        total_fat: 0.5,
        saturated_fat: 0.2,
        trans_fat: 0.2,
        fiber: 0.5,
        sodium: 5.0,
    };

    /// Limit for a nutrient. Sugars and kJ have no zero rule of their own.
    pub fn limit_for(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::EnergyKcal => Some(self.energy_kcal),
            Nutrient::Carbohydrates => Some(self.carbohydrates),
            Nutrient::Proteins => Some(self.proteins),
            Nutrient::TotalFat => Some(self.total_fat),
            Nutrient::SaturatedFat => Some(self.saturated_fat),
            Nutrient::TransFat => Some(self.trans_fat),
            Nutrient::Fiber => Some(self.fiber),
            Nutrient::Sodium => Some(self.sodium),
            Nutrient::EnergyKj | Nutrient::TotalSugars | Nutrient::AddedSugars => None,
        }
    }
}

/// Per-100 g/ml amounts that trigger a "high in" mark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontLabelThresholds {
    pub added_sugars: f64,
    pub saturated_fat: f64,
    pub sodium: f64,
}

/// Threshold sets by product type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontLabelLimits {
    pub solid: FrontLabelThresholds,
    pub liquid: FrontLabelThresholds,
}

impl FrontLabelLimits {
    pub const IN_75_2020: Self = Self {
        solid: FrontLabelThresholds {
            added_sugars: 15.0,
            saturated_fat: 6.0,
            sodium: 600.0,
        },
        liquid: FrontLabelThresholds {
            added_sugars: 7.5,
            saturated_fat: 3.0,
            sodium: 300.0,
        },
    };

    pub fn for_product(&self, product_type: ProductType) -> &FrontLabelThresholds {
        match product_type {
            ProductType::Solid => &self.solid,
            ProductType::Liquid => &self.liquid,
        }
    }
}

/// Complete set of regulatory tables consumed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryTables {
    pub daily_values: ReferenceDailyValues,
    pub zero_limits: ZeroLimits,
    pub front_label: FrontLabelLimits,
}

impl RegulatoryTables {
    /// Tables in force under RDC 429/2020 and IN 75/2020
    pub const BRAZIL: Self = Self {
        daily_values: ReferenceDailyValues::IN_75_2020,
        zero_limits: ZeroLimits::IN_75_2020,
        front_label: FrontLabelLimits::IN_75_2020,
    };
}

impl Default for RegulatoryTables {
    fn default() -> Self {
        Self::BRAZIL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sugars_has_no_reference() {
        let dv = ReferenceDailyValues::IN_75_2020;
        assert_eq!(dv.reference_for(Nutrient::TotalSugars), None);
        assert_eq!(dv.reference_for(Nutrient::Sodium), Some(2000.0));
        assert_eq!(dv.reference_for(Nutrient::EnergyKj), Some(8400.0));
    }

    #[test]
    fn test_sugars_have_no_zero_limit() {
        let limits = ZeroLimits::IN_75_2020;
        assert_eq!(limits.limit_for(Nutrient::TotalSugars), None);
        assert_eq!(limits.limit_for(Nutrient::AddedSugars), None);
        assert_eq!(limits.limit_for(Nutrient::SaturatedFat), Some(0.2));
        assert_eq!(limits.limit_for(Nutrient::EnergyKcal), Some(4.0));
    }

    #[test]
    fn test_front_label_selection() {
        let limits = FrontLabelLimits::IN_75_2020;
        assert_eq!(limits.for_product(ProductType::Solid).sodium, 600.0);
        assert_eq!(limits.for_product(ProductType::Liquid).added_sugars, 7.5);
    }
}
