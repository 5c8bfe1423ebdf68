//! Data models
//!
//! Saved recipes and the label data computed for them.

mod ingredient_line;
mod label_data;
mod recipe;

pub use recipe::{Recipe, RecipeCreate, RecipeDetail};
