//! RotulagemBR Library
//!
//! Brazilian nutrition labeling: nutrition facts table, %VD, front-label
//! warnings and allergen declarations for recipes.

pub mod build_info;
pub mod config;
pub mod db;
pub mod estimation;
pub mod labeling;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
