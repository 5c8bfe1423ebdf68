//! Stored engine output and allergen declaration

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DbResult;
use crate::labeling::AllergenDeclaration;
use crate::nutrition::{FrontLabelFlags, NutritionResult};

/// Insert or replace the computed nutrition of a recipe
pub fn store_nutrition(conn: &Connection, recipe_id: i64, result: &NutritionResult) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO nutrition_totals (
            recipe_id, totals_json, per_portion_json, per_100g_json, vd_json, display_json,
            high_added_sugars, high_saturated_fat, high_sodium, calculated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
        "#,
        params![
            recipe_id,
            serde_json::to_string(&result.totals_recipe)?,
            serde_json::to_string(&result.per_portion)?,
            serde_json::to_string(&result.per_100g)?,
            serde_json::to_string(&result.vd_percent)?,
            serde_json::to_string(&result.display_values)?,
            result.front_label.high_added_sugars as i32,
            result.front_label.high_saturated_fat as i32,
            result.front_label.high_sodium as i32,
        ],
    )?;
    Ok(())
}

/// Computed nutrition of a recipe, if it was stored
pub fn load_nutrition(conn: &Connection, recipe_id: i64) -> DbResult<Option<NutritionResult>> {
    let row = conn
        .query_row(
            "SELECT totals_json, per_portion_json, per_100g_json, vd_json, display_json,
                    high_added_sugars, high_saturated_fat, high_sodium
             FROM nutrition_totals WHERE recipe_id = ?1",
            [recipe_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i32>(5)? != 0,
                    row.get::<_, i32>(6)? != 0,
                    row.get::<_, i32>(7)? != 0,
                ))
            },
        )
        .optional()?;

    let Some((totals, portion, per_100g, vd, display, sugars, sat_fat, sodium)) = row else {
        return Ok(None);
    };

    Ok(Some(NutritionResult {
        totals_recipe: serde_json::from_str(&totals)?,
        per_portion: serde_json::from_str(&portion)?,
        per_100g: serde_json::from_str(&per_100g)?,
        vd_percent: serde_json::from_str(&vd)?,
        display_values: serde_json::from_str(&display)?,
        front_label: FrontLabelFlags {
            high_added_sugars: sugars,
            high_saturated_fat: sat_fat,
            high_sodium: sodium,
        },
    }))
}

pub fn store_allergens(
    conn: &Connection,
    recipe_id: i64,
    declaration: &AllergenDeclaration,
) -> DbResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO recipe_allergens (recipe_id, contains_json, may_contain_json)
         VALUES (?1, ?2, ?3)",
        params![
            recipe_id,
            serde_json::to_string(&declaration.contains)?,
            serde_json::to_string(&declaration.may_contain)?,
        ],
    )?;
    Ok(())
}

/// Stored declaration; empty when none was saved
pub fn load_allergens(conn: &Connection, recipe_id: i64) -> DbResult<AllergenDeclaration> {
    let row = conn
        .query_row(
            "SELECT contains_json, may_contain_json FROM recipe_allergens WHERE recipe_id = ?1",
            [recipe_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    match row {
        Some((contains, may_contain)) => Ok(AllergenDeclaration {
            contains: serde_json::from_str(&contains)?,
            may_contain: serde_json::from_str(&may_contain)?,
        }),
        None => Ok(AllergenDeclaration::default()),
    }
}
