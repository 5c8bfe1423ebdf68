//! Recipe MCP Tools
//!
//! Save, fetch, list and delete labeled recipes.

use serde::Serialize;

use super::labels::parse_allergens;
use crate::db::Database;
use crate::labeling::AllergenDeclaration;
use crate::models::{Recipe, RecipeCreate, RecipeDetail};
use crate::nutrition::{NutritionEngine, NutritionTable, ProductType};

/// Response for save_recipe
#[derive(Debug, Serialize)]
pub struct SaveRecipeResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub warnings: Vec<&'static str>,
    pub allergen_statements: Vec<String>,
}

/// Full recipe with its printable table
#[derive(Debug, Serialize)]
pub struct RecipeLabel {
    #[serde(flatten)]
    pub detail: RecipeDetail,
    pub table: Option<NutritionTable>,
    pub allergen_statements: Vec<String>,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub product_type: ProductType,
    pub num_portions: u32,
    pub portion_size_g: f64,
    pub created_at: String,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub count: usize,
    pub limit: i64,
    pub offset: i64,
}

/// Response for delete_recipe
#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

/// Calculate, infer allergens and store a recipe
pub fn save_recipe(
    db: &Database,
    engine: &NutritionEngine,
    mut data: RecipeCreate,
    may_contain: &[String],
) -> Result<SaveRecipeResponse, String> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    if !data.portion_size_g.is_finite() || data.portion_size_g <= 0.0 {
        return Err("portion_size_g must be greater than 0".to_string());
    }

    let nutrition = engine
        .calculate(&data.ingredients, &data.context())
        .map_err(|e| format!("Invalid recipe: {}", e))?;

    let names: Vec<&str> = data.ingredients.iter().map(|l| l.name.as_str()).collect();
    let allergens = AllergenDeclaration::from_ingredients(&names, parse_allergens(may_contain)?);

    let detail = db
        .with_conn_mut(|conn| Recipe::save(conn, &data, &nutrition, &allergens))
        .map_err(|e| format!("Failed to save recipe: {}", e))?;

    Ok(SaveRecipeResponse {
        id: detail.recipe.id,
        name: detail.recipe.name,
        created_at: detail.recipe.created_at,
        warnings: nutrition.front_label.warnings(),
        allergen_statements: allergens.statements(),
    })
}

/// Get a recipe with its stored label
pub fn get_recipe(db: &Database, id: i64) -> Result<Option<RecipeLabel>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let detail = Recipe::get_detail(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    Ok(detail.map(|detail| {
        let table = detail
            .nutrition
            .as_ref()
            .map(|result| NutritionTable::from_result(result, &detail.recipe.portion()));
        let allergen_statements = detail.allergens.statements();
        RecipeLabel {
            detail,
            table,
            allergen_statements,
        }
    }))
}

/// List recipes, newest first
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let summaries: Vec<RecipeSummary> = recipes
        .into_iter()
        .map(|r| RecipeSummary {
            id: r.id,
            name: r.name,
            category: r.category,
            product_type: r.product_type,
            num_portions: r.num_portions,
            portion_size_g: r.portion_size_g,
            created_at: r.created_at,
        })
        .collect();

    Ok(ListRecipesResponse {
        count: summaries.len(),
        recipes: summaries,
        limit,
        offset,
    })
}

/// Delete a recipe and everything stored with it
pub fn delete_recipe(db: &Database, id: i64) -> Result<DeleteRecipeResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id).map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    Ok(DeleteRecipeResponse {
        success: true,
        id,
        message: format!("Recipe {} deleted", id),
    })
}
