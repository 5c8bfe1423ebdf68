//! Recipe model
//!
//! A saved recipe with its ingredient snapshot, computed label and allergens.

use rmcp::schemars;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::{ingredient_line, label_data};
use crate::db::{DbError, DbResult};
use crate::labeling::AllergenDeclaration;
use crate::nutrition::{IngredientLine, NutritionResult, PortionInfo, ProductType, RecipeContext};

/// Recipe header as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub product_type: ProductType,
    pub final_yield_g: f64,
    pub portion_size_g: f64,
    pub household_measure: String,
    pub num_portions: u32,
    pub added_sugars_g: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for saving a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub product_type: ProductType,
    pub final_yield_g: f64,
    pub portion_size_g: f64,
    #[serde(default)]
    pub household_measure: String,
    pub num_portions: u32,
    #[serde(default)]
    pub added_sugars_g: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeCreate {
    pub fn context(&self) -> RecipeContext {
        RecipeContext {
            final_yield_g: self.final_yield_g,
            num_portions: self.num_portions,
            added_sugars_g: self.added_sugars_g,
            product_type: self.product_type,
        }
    }

    pub fn portion(&self) -> PortionInfo {
        PortionInfo::new(self.portion_size_g, self.household_measure.clone(), self.product_type)
    }
}

/// Recipe with everything needed to print its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientLine>,
    pub nutrition: Option<NutritionResult>,
    pub allergens: AllergenDeclaration,
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let product_type: String = row.get("product_type")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            product_type: ProductType::parse(&product_type).unwrap_or_default(),
            final_yield_g: row.get("final_yield_g")?,
            portion_size_g: row.get("portion_size_g")?,
            household_measure: row.get("household_measure")?,
            num_portions: row.get("num_portions")?,
            added_sugars_g: row.get("added_sugars_g")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn context(&self) -> RecipeContext {
        RecipeContext {
            final_yield_g: self.final_yield_g,
            num_portions: self.num_portions,
            added_sugars_g: self.added_sugars_g,
            product_type: self.product_type,
        }
    }

    pub fn portion(&self) -> PortionInfo {
        PortionInfo::new(self.portion_size_g, self.household_measure.clone(), self.product_type)
    }

    /// Save a recipe with its computed label in one transaction
    pub fn save(
        conn: &mut Connection,
        data: &RecipeCreate,
        nutrition: &NutritionResult,
        allergens: &AllergenDeclaration,
    ) -> DbResult<RecipeDetail> {
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO recipes (
                name, category, product_type, final_yield_g, portion_size_g,
                household_measure, num_portions, added_sugars_g, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.name,
                data.category,
                data.product_type.to_db_str(),
                data.final_yield_g,
                data.portion_size_g,
                data.household_measure,
                data.num_portions,
                data.added_sugars_g,
                data.notes,
            ],
        )?;
        let id = tx.last_insert_rowid();

        ingredient_line::replace_lines(&tx, id, &data.ingredients)?;
        label_data::store_nutrition(&tx, id, nutrition)?;
        label_data::store_allergens(&tx, id, allergens)?;

        tx.commit()?;
        tracing::info!("Saved recipe {} ('{}')", id, data.name);

        Self::get_detail(conn, id)?.ok_or(DbError::NotFound(id))
    }

    /// Get a recipe header by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a recipe with its lines, stored nutrition and allergens
    pub fn get_detail(conn: &Connection, id: i64) -> DbResult<Option<RecipeDetail>> {
        let Some(recipe) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        Ok(Some(RecipeDetail {
            ingredients: ingredient_line::lines_for_recipe(conn, id)?,
            nutrition: label_data::load_nutrition(conn, id)?,
            allergens: label_data::load_allergens(conn, id)?,
            recipe,
        }))
    }

    /// List recipes, newest first, optionally filtered by name or category
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let recipes = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM recipes WHERE name LIKE ?1 OR category LIKE ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                )?;
                let pattern = format!("%{}%", q);
                let rows = stmt
                    .query_map(params![pattern, limit, offset], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM recipes ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                )?;
                let rows = stmt
                    .query_map(params![limit, offset], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(recipes)
    }

    /// Delete a recipe; lines, nutrition and allergens go with it
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
