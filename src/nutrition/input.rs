//! Engine inputs: ingredient lines and recipe context

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::nutrient::NutrientProfile;

/// Physical state of the finished product; selects front-label thresholds
/// and whether portions are declared in g or ml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Solid,
    Liquid,
}

impl ProductType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "solid" | "solido" | "sólido" => Some(ProductType::Solid),
            "liquid" | "liquido" | "líquido" => Some(ProductType::Liquid),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProductType::Solid => "solid",
            ProductType::Liquid => "liquid",
        }
    }

    /// Unit of the declared portion and of the "per 100" basis
    pub fn portion_unit(&self) -> &'static str {
        match self {
            ProductType::Solid => "g",
            ProductType::Liquid => "ml",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Solid => "Sólido",
            ProductType::Liquid => "Líquido",
        }
    }
}

/// One ingredient of a recipe with its per-100 composition snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct IngredientLine {
    pub name: String,
    /// Quantity used, in grams or milliliters
    pub quantity_g: f64,
    /// Code of the food-table entry the profile was copied from
    #[serde(default)]
    pub food_code: Option<String>,
    #[serde(default)]
    pub nutrients_per_100g: NutrientProfile,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, quantity_g: f64, nutrients_per_100g: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            quantity_g,
            food_code: None,
            nutrients_per_100g,
        }
    }

    pub fn with_food_code(mut self, code: impl Into<String>) -> Self {
        self.food_code = Some(code.into());
        self
    }
}

/// Recipe-level metadata the calculation depends on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RecipeContext {
    /// Weight (or volume) of the finished recipe after cooking
    pub final_yield_g: f64,
    pub num_portions: u32,
    /// Added sugars for the whole recipe, supplied by the caller
    #[serde(default)]
    pub added_sugars_g: f64,
    #[serde(default)]
    pub product_type: ProductType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_parse() {
        assert_eq!(ProductType::parse("solid"), Some(ProductType::Solid));
        assert_eq!(ProductType::parse(" Líquido "), Some(ProductType::Liquid));
        assert_eq!(ProductType::parse("gas"), None);
    }

    #[test]
    fn test_context_defaults() {
        let ctx: RecipeContext =
            serde_json::from_str(r#"{"final_yield_g": 500, "num_portions": 10}"#).unwrap();
        assert_eq!(ctx.added_sugars_g, 0.0);
        assert_eq!(ctx.product_type, ProductType::Solid);
    }

    #[test]
    fn test_ingredient_line_json() {
        let line: IngredientLine = serde_json::from_str(
            r#"{"name": "Farinha de trigo", "quantity_g": 250, "nutrients_per_100g": {"carbohydrates": 75.1}}"#,
        )
        .unwrap();
        assert_eq!(line.food_code, None);
        assert_eq!(line.nutrients_per_100g.carbohydrates, 75.1);
        assert_eq!(line.nutrients_per_100g.proteins, 0.0);
    }
}
