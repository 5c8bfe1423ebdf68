//! Utility to print the nutrition label of a recipe file
//!
//! Usage: calculate_label <recipe.json> [--json]
//!
//! The file holds `ingredients`, `context` and optionally `portion_size_g`
//! and `household_measure`, the same shape the calculate_nutrition tool takes.
//! Prints the nutrition table, allergen statements and the JSON result;
//! `--json` prints only the JSON result.

use serde::Deserialize;

use rotulagem::labeling::AllergenDeclaration;
use rotulagem::nutrition::{IngredientLine, NutritionTable, RecipeContext};
use rotulagem::tools::labels::resolve_portion;

#[derive(Debug, Deserialize)]
struct RecipeFile {
    ingredients: Vec<IngredientLine>,
    context: RecipeContext,
    portion_size_g: Option<f64>,
    household_measure: Option<String>,
}

fn render(recipe: RecipeFile, json_only: bool) -> Result<String, Box<dyn std::error::Error>> {
    let result = rotulagem::nutrition::calculate_nutrition(&recipe.ingredients, &recipe.context)?;
    let json = serde_json::to_string_pretty(&result)?;
    if json_only {
        return Ok(json);
    }

    let portion = resolve_portion(recipe.portion_size_g, recipe.household_measure, &recipe.context);
    let mut out = NutritionTable::from_result(&result, &portion).render_text();
    out.push('\n');

    let names: Vec<&str> = recipe.ingredients.iter().map(|l| l.name.as_str()).collect();
    for statement in AllergenDeclaration::from_ingredients(&names, Vec::new()).statements() {
        out.push_str(&statement);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&json);
    Ok(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: calculate_label <recipe.json> [--json]");
        std::process::exit(2);
    };
    let json_only = args.iter().skip(2).any(|a| a == "--json");

    let recipe: RecipeFile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    println!("{}", render(recipe, json_only)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotulagem::nutrition::NutritionResult;

    const RECIPE: &str = r#"{
        "ingredients": [
            {"name": "Farinha de trigo", "quantity_g": 500,
             "nutrients_per_100g": {"carbohydrates": 75.1, "proteins": 9.8, "total_fat": 1.4}},
            {"name": "Leite integral", "quantity_g": 300,
             "nutrients_per_100g": {"carbohydrates": 4.7, "proteins": 3.2, "total_fat": 3.3, "sodium": 43}}
        ],
        "context": {"final_yield_g": 750, "num_portions": 15},
        "household_measure": "1 fatia"
    }"#;

    #[test]
    fn test_prints_table_and_json() {
        let recipe: RecipeFile = serde_json::from_str(RECIPE).unwrap();
        let out = render(recipe, false).unwrap();

        assert!(out.contains("INFORMAÇÃO NUTRICIONAL"));
        assert!(out.contains("Porção de 50g (1 fatia)"));
        assert!(out.contains("ALÉRGICOS: CONTÉM"));

        let json_start = out.find("\n{").unwrap() + 1;
        let result: NutritionResult = serde_json::from_str(&out[json_start..]).unwrap();
        assert!(result.totals_recipe.carbohydrates > 0.0);
    }

    #[test]
    fn test_json_only() {
        let recipe: RecipeFile = serde_json::from_str(RECIPE).unwrap();
        let out = render(recipe, true).unwrap();

        assert!(out.starts_with('{'));
        assert!(!out.contains("INFORMAÇÃO NUTRICIONAL"));
        let _: NutritionResult = serde_json::from_str(&out).unwrap();
    }
}
