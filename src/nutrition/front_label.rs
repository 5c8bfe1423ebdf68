//! Front-of-package "ALTO EM" classifier (RDC 429/2020)

use serde::{Deserialize, Serialize};

use super::input::ProductType;
use super::nutrient::NutrientValues;
use super::tables::FrontLabelLimits;

pub const WARNING_ADDED_SUGARS: &str = "ALTO EM AÇÚCARES ADICIONADOS";
pub const WARNING_SATURATED_FAT: &str = "ALTO EM GORDURAS SATURADAS";
pub const WARNING_SODIUM: &str = "ALTO EM SÓDIO";

/// Which "high in" marks the package must carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontLabelFlags {
    pub high_added_sugars: bool,
    pub high_saturated_fat: bool,
    pub high_sodium: bool,
}

impl FrontLabelFlags {
    pub fn any(&self) -> bool {
        self.high_added_sugars || self.high_saturated_fat || self.high_sodium
    }

    /// Warning texts in the order they appear on the mark
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.high_added_sugars {
            out.push(WARNING_ADDED_SUGARS);
        }
        if self.high_saturated_fat {
            out.push(WARNING_SATURATED_FAT);
        }
        if self.high_sodium {
            out.push(WARNING_SODIUM);
        }
        out
    }
}

/// Compare raw per-100g values with the thresholds for the product type.
/// Each flag is set when the value meets or exceeds its threshold.
pub fn classify_front_label(
    per_100g: &NutrientValues,
    product_type: ProductType,
    limits: &FrontLabelLimits,
) -> FrontLabelFlags {
    let thresholds = limits.for_product(product_type);

    FrontLabelFlags {
        high_added_sugars: per_100g.added_sugars >= thresholds.added_sugars,
        high_saturated_fat: per_100g.saturated_fat >= thresholds.saturated_fat,
        high_sodium: per_100g.sodium >= thresholds.sodium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: FrontLabelLimits = FrontLabelLimits::IN_75_2020;

    fn per_100g(added_sugars: f64, saturated_fat: f64, sodium: f64) -> NutrientValues {
        NutrientValues {
            added_sugars,
            saturated_fat,
            sodium,
            ..Default::default()
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let flags = classify_front_label(&per_100g(15.0, 0.0, 0.0), ProductType::Solid, &LIMITS);
        assert!(flags.high_added_sugars);
    }

    #[test]
    fn test_just_below_boundary() {
        let flags = classify_front_label(&per_100g(14.99, 0.0, 0.0), ProductType::Solid, &LIMITS);
        assert!(!flags.high_added_sugars);
        assert!(!flags.any());
    }

    #[test]
    fn test_liquid_thresholds() {
        let flags = classify_front_label(&per_100g(7.5, 3.0, 299.9), ProductType::Liquid, &LIMITS);
        assert!(flags.high_added_sugars);
        assert!(flags.high_saturated_fat);
        assert!(!flags.high_sodium);

        let solid = classify_front_label(&per_100g(7.5, 3.0, 299.9), ProductType::Solid, &LIMITS);
        assert_eq!(solid, FrontLabelFlags::default());
    }

    #[test]
    fn test_flags_are_independent() {
        let flags = classify_front_label(&per_100g(0.0, 0.0, 600.0), ProductType::Solid, &LIMITS);
        assert_eq!(
            flags,
            FrontLabelFlags {
                high_added_sugars: false,
                high_saturated_fat: false,
                high_sodium: true,
            }
        );
        assert_eq!(flags.warnings(), vec![WARNING_SODIUM]);
    }

    #[test]
    fn test_all_warnings_order() {
        let flags = classify_front_label(&per_100g(20.0, 8.0, 900.0), ProductType::Solid, &LIMITS);
        assert_eq!(
            flags.warnings(),
            vec![WARNING_ADDED_SUGARS, WARNING_SATURATED_FAT, WARNING_SODIUM]
        );
    }
}
