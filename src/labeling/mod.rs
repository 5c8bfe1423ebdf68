//! Label helpers that sit beside the nutrition engine:
//! allergen declaration and reference portion presets.

pub mod allergens;
pub mod portions;

pub use allergens::{infer_allergens, normalize_name, Allergen, AllergenDeclaration};
pub use portions::{find_portion_category, PortionCategory, PORTION_CATEGORIES};
