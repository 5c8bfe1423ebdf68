//! Label calculation MCP Tools
//!
//! Stateless tools: nutrition table, front-label check, allergens and portions.

use serde::Serialize;

use crate::labeling::{
    infer_allergens as infer, Allergen, AllergenDeclaration, PortionCategory, PORTION_CATEGORIES,
};
use crate::nutrition::{
    classify_front_label as classify, FrontLabelFlags, IngredientLine, NutrientValues,
    NutritionEngine, NutritionResult, NutritionTable, PortionInfo, ProductType, RecipeContext,
};

/// Response for calculate_nutrition
#[derive(Debug, Serialize)]
pub struct CalculateNutritionResponse {
    pub result: NutritionResult,
    pub table: NutritionTable,
    pub table_text: String,
}

/// Response for classify_front_label
#[derive(Debug, Serialize)]
pub struct FrontLabelResponse {
    pub product_type: ProductType,
    pub flags: FrontLabelFlags,
    pub warnings: Vec<&'static str>,
}

/// Response for infer_allergens
#[derive(Debug, Serialize)]
pub struct InferAllergensResponse {
    pub contains: Vec<AllergenSummary>,
    pub may_contain: Vec<AllergenSummary>,
    pub statements: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AllergenSummary {
    pub key: Allergen,
    pub name: &'static str,
}

impl From<Allergen> for AllergenSummary {
    fn from(allergen: Allergen) -> Self {
        Self {
            key: allergen,
            name: allergen.display_name(),
        }
    }
}

/// Response for list_portion_categories
#[derive(Debug, Serialize)]
pub struct ListPortionCategoriesResponse {
    pub categories: Vec<PortionCategory>,
    pub count: usize,
}

/// Portion from explicit values, falling back to the recipe's share of the yield
pub fn resolve_portion(
    portion_size_g: Option<f64>,
    household_measure: Option<String>,
    context: &RecipeContext,
) -> PortionInfo {
    let size = portion_size_g
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or_else(|| context.final_yield_g / f64::from(context.num_portions.max(1)));

    PortionInfo::new(size, household_measure.unwrap_or_default(), context.product_type)
}

/// Run the engine and lay out the nutrition facts table
pub fn calculate_nutrition(
    engine: &NutritionEngine,
    ingredients: &[IngredientLine],
    context: &RecipeContext,
    portion: &PortionInfo,
) -> Result<CalculateNutritionResponse, String> {
    let result = engine
        .calculate(ingredients, context)
        .map_err(|e| format!("Invalid recipe: {}", e))?;

    let table = NutritionTable::from_result(&result, portion);
    let table_text = table.render_text();

    Ok(CalculateNutritionResponse {
        result,
        table,
        table_text,
    })
}

/// Check raw per-100 g values against the front-label thresholds
pub fn classify_front_label(
    engine: &NutritionEngine,
    per_100g: &NutrientValues,
    product_type: ProductType,
) -> Result<FrontLabelResponse, String> {
    for (name, value) in [
        ("added_sugars", per_100g.added_sugars),
        ("saturated_fat", per_100g.saturated_fat),
        ("sodium", per_100g.sodium),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a non-negative number, got {}", name, value));
        }
    }

    let flags = classify(per_100g, product_type, &engine.tables().front_label);

    Ok(FrontLabelResponse {
        product_type,
        flags,
        warnings: flags.warnings(),
    })
}

/// Parse allergen keys given by the caller
pub fn parse_allergens(keys: &[String]) -> Result<Vec<Allergen>, String> {
    keys.iter()
        .map(|k| Allergen::parse(k).ok_or_else(|| format!("Unknown allergen: {}", k)))
        .collect()
}

/// Infer allergens from ingredient names and build the declaration
pub fn infer_allergens(
    ingredient_names: &[String],
    may_contain: &[String],
) -> Result<InferAllergensResponse, String> {
    let may_contain = parse_allergens(may_contain)?;
    let declaration = AllergenDeclaration::new(infer(ingredient_names), may_contain);

    Ok(InferAllergensResponse {
        statements: declaration.statements(),
        contains: declaration.contains.into_iter().map(Into::into).collect(),
        may_contain: declaration.may_contain.into_iter().map(Into::into).collect(),
    })
}

pub fn list_portion_categories() -> ListPortionCategoriesResponse {
    ListPortionCategoriesResponse {
        categories: PORTION_CATEGORIES.to_vec(),
        count: PORTION_CATEGORIES.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::NutrientProfile;

    fn context() -> RecipeContext {
        RecipeContext {
            final_yield_g: 600.0,
            num_portions: 12,
            added_sugars_g: 0.0,
            product_type: ProductType::Solid,
        }
    }

    #[test]
    fn test_portion_defaults_to_yield_share() {
        let portion = resolve_portion(None, None, &context());
        assert_eq!(portion.size, 50.0);
        assert_eq!(portion.header(), "Porção de 50g");

        let portion = resolve_portion(Some(30.0), Some("3 unidades".to_string()), &context());
        assert_eq!(portion.header(), "Porção de 30g (3 unidades)");
    }

    #[test]
    fn test_calculate_reports_invalid_input() {
        let engine = NutritionEngine::default();
        let mut ctx = context();
        ctx.num_portions = 0;
        let err = calculate_nutrition(&engine, &[], &ctx, &resolve_portion(None, None, &ctx))
            .unwrap_err();
        assert!(err.contains("number of portions"));
    }

    #[test]
    fn test_calculate_builds_table() {
        let engine = NutritionEngine::default();
        let lines = vec![IngredientLine::new(
            "Fubá",
            500.0,
            NutrientProfile {
                carbohydrates: 79.1,
                proteins: 7.2,
                total_fat: 1.9,
                fiber: 4.7,
                ..Default::default()
            },
        )];
        let ctx = context();
        let out = calculate_nutrition(&engine, &lines, &ctx, &resolve_portion(None, None, &ctx))
            .unwrap();
        assert_eq!(out.table.rows.len(), 10);
        assert!(out.table_text.contains("INFORMAÇÃO NUTRICIONAL"));
    }

    #[test]
    fn test_classify_liquid() {
        let engine = NutritionEngine::default();
        let values = NutrientValues {
            added_sugars: 8.0,
            ..Default::default()
        };
        let out = classify_front_label(&engine, &values, ProductType::Liquid).unwrap();
        assert!(out.flags.high_added_sugars);
        assert_eq!(out.warnings, vec!["ALTO EM AÇÚCARES ADICIONADOS"]);

        let bad = NutrientValues {
            sodium: -1.0,
            ..Default::default()
        };
        assert!(classify_front_label(&engine, &bad, ProductType::Solid).is_err());
    }

    #[test]
    fn test_infer_with_may_contain() {
        let names = vec!["Ovos caipira".to_string(), "Manteiga".to_string()];
        let out = infer_allergens(&names, &["amendoim".to_string(), "ovos".to_string()]).unwrap();
        let contains: Vec<Allergen> = out.contains.iter().map(|a| a.key).collect();
        assert_eq!(contains, vec![Allergen::Ovos, Allergen::Leite]);
        assert_eq!(out.may_contain.len(), 1);
        assert_eq!(
            out.statements,
            vec![
                "ALÉRGICOS: CONTÉM OVOS, LEITE.".to_string(),
                "ALÉRGICOS: PODE CONTER AMENDOIM.".to_string(),
            ]
        );

        assert!(infer_allergens(&names, &["mostarda".to_string()]).is_err());
    }

    #[test]
    fn test_portion_categories_listed() {
        let out = list_portion_categories();
        assert_eq!(out.count, 20);
        assert_eq!(out.categories[0].key, "paes");
    }
}
