//! Ingredient line snapshots
//!
//! Each saved line keeps the per-100g composition it was calculated with.

use rusqlite::{params, Connection, Row};

use crate::db::DbResult;
use crate::nutrition::{IngredientLine, NutrientProfile};

fn from_row(row: &Row) -> rusqlite::Result<(String, Option<String>, f64, String)> {
    Ok((
        row.get("name")?,
        row.get("food_code")?,
        row.get("quantity_g")?,
        row.get("nutrients_json")?,
    ))
}

/// Replace the lines of a recipe with `lines`, keeping their order
pub fn replace_lines(conn: &Connection, recipe_id: i64, lines: &[IngredientLine]) -> DbResult<()> {
    conn.execute("DELETE FROM ingredient_lines WHERE recipe_id = ?1", [recipe_id])?;

    let mut stmt = conn.prepare(
        r#"
        INSERT INTO ingredient_lines (recipe_id, position, food_code, name, quantity_g, nutrients_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )?;

    for (position, line) in lines.iter().enumerate() {
        let nutrients = serde_json::to_string(&line.nutrients_per_100g)?;
        stmt.execute(params![
            recipe_id,
            position as i64,
            line.food_code,
            line.name,
            line.quantity_g,
            nutrients,
        ])?;
    }

    Ok(())
}

/// Lines of a recipe in their saved order
pub fn lines_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<IngredientLine>> {
    let mut stmt = conn.prepare(
        "SELECT name, food_code, quantity_g, nutrients_json FROM ingredient_lines
         WHERE recipe_id = ?1 ORDER BY position",
    )?;

    let rows = stmt
        .query_map([recipe_id], from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(name, food_code, quantity_g, json)| {
            let nutrients: NutrientProfile = serde_json::from_str(&json)?;
            Ok(IngredientLine {
                name,
                quantity_g,
                food_code,
                nutrients_per_100g: nutrients,
            })
        })
        .collect()
}
