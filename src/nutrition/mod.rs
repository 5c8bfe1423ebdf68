//! Nutrition labeling engine
//!
//! Aggregates ingredient profiles into recipe totals, applies the IN 75/2020
//! zero rule and rounding, computes %VD and classifies the RDC 429/2020
//! front-of-package marks.

pub mod aggregation;
pub mod daily_value;
pub mod engine;
pub mod error;
pub mod front_label;
pub mod input;
pub mod nutrient;
pub mod presentation;
pub mod rounding;
pub mod tables;

pub use aggregation::{compute_energy, compute_totals, per_100g, per_portion, Energy};
pub use daily_value::{compute_daily_values, format_daily_value, DailyValuePercent};
pub use engine::{calculate_nutrition, DisplayBundle, NutritionEngine, NutritionResult};
pub use error::{NutritionError, NutritionResultOf};
pub use front_label::{classify_front_label, FrontLabelFlags};
pub use input::{IngredientLine, ProductType, RecipeContext};
pub use nutrient::{Nutrient, NutrientProfile, NutrientUnit, NutrientValues};
pub use presentation::{NutritionTable, PortionInfo, TableRow};
pub use rounding::{
    apply_rounding_rules, apply_zero_rule, declare_value, format_display_value, round_values,
    DisplayValues, RoundedValues,
};
pub use tables::{
    FrontLabelLimits, FrontLabelThresholds, ReferenceDailyValues, RegulatoryTables, ZeroLimits,
};
