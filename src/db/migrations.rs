//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: recipes, ingredient snapshots, computed label data
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- RECIPES
        -- Recipe header and the context the label was computed with
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT,                       -- portion category key, e.g. "paes"
            product_type TEXT NOT NULL DEFAULT 'solid'
                CHECK(product_type IN ('solid', 'liquid')),
            final_yield_g REAL NOT NULL CHECK(final_yield_g > 0),
            portion_size_g REAL NOT NULL CHECK(portion_size_g > 0),
            household_measure TEXT NOT NULL DEFAULT '',
            num_portions INTEGER NOT NULL CHECK(num_portions >= 1),
            added_sugars_g REAL NOT NULL DEFAULT 0,

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_name ON recipes(name);
        CREATE INDEX idx_recipes_created ON recipes(created_at);

        -- ============================================
        -- INGREDIENT LINES
        -- Composition is copied at save time so later food-table
        -- changes never alter a saved label
        -- ============================================
        CREATE TABLE ingredient_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            food_code TEXT,
            name TEXT NOT NULL,
            quantity_g REAL NOT NULL CHECK(quantity_g > 0),
            nutrients_json TEXT NOT NULL         -- per 100 g snapshot
        );

        CREATE INDEX idx_ingredient_lines_recipe ON ingredient_lines(recipe_id);

        -- ============================================
        -- NUTRITION TOTALS
        -- Engine output at save time (one row per recipe)
        -- ============================================
        CREATE TABLE nutrition_totals (
            recipe_id INTEGER PRIMARY KEY REFERENCES recipes(id) ON DELETE CASCADE,
            totals_json TEXT NOT NULL,
            per_portion_json TEXT NOT NULL,
            per_100g_json TEXT NOT NULL,
            vd_json TEXT NOT NULL,
            display_json TEXT NOT NULL,
            high_added_sugars INTEGER NOT NULL DEFAULT 0,
            high_saturated_fat INTEGER NOT NULL DEFAULT 0,
            high_sodium INTEGER NOT NULL DEFAULT 0,
            calculated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- ALLERGENS
        -- ============================================
        CREATE TABLE recipe_allergens (
            recipe_id INTEGER PRIMARY KEY REFERENCES recipes(id) ON DELETE CASCADE,
            contains_json TEXT NOT NULL DEFAULT '[]',
            may_contain_json TEXT NOT NULL DEFAULT '[]'
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
