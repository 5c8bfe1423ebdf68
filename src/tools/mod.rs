//! MCP tool implementations

pub mod labels;
pub mod recipes;
pub mod reports;
pub mod status;
pub mod sugars;
