//! MCP Server Implementation
//!
//! Implements the MCP server handler for RotulagemBR.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::db::Database;
use crate::estimation::{EstimationCoordinator, GeminiEstimator};
use crate::models::RecipeCreate;
use crate::nutrition::{IngredientLine, NutrientValues, NutritionEngine, ProductType, RecipeContext};
use crate::tools::status::StatusTracker;
use crate::tools::{labels, recipes, reports, sugars};

/// RotulagemBR MCP Service
#[derive(Clone)]
pub struct RotulagemService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    database_path: PathBuf,
    engine: NutritionEngine,
    coordinator: Option<Arc<EstimationCoordinator>>,
    tool_router: ToolRouter<RotulagemService>,
}

impl RotulagemService {
    pub fn new(config: &AppConfig, database: Database) -> Self {
        let coordinator = match GeminiEstimator::new(&config.estimation) {
            Ok(estimator) => Some(Arc::new(EstimationCoordinator::new(Arc::new(estimator)))),
            Err(e) => {
                tracing::info!("Added sugars estimation disabled: {}", e);
                None
            }
        };

        let status_tracker = StatusTracker::new(config.database_path.clone(), coordinator.is_some());

        Self {
            status_tracker: Arc::new(Mutex::new(status_tracker)),
            database,
            database_path: config.database_path.clone(),
            engine: NutritionEngine::default(),
            coordinator,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateNutritionParams {
    /// Ingredient lines with quantity used and composition per 100 g
    pub ingredients: Vec<IngredientLine>,
    /// Final yield, number of portions, recipe added sugars and product type
    pub context: RecipeContext,
    /// Declared portion in g or ml; defaults to final_yield_g / num_portions
    pub portion_size_g: Option<f64>,
    /// Household measure, e.g. "1 fatia"
    pub household_measure: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyFrontLabelParams {
    /// Unrounded values per 100 g (or 100 ml) of finished product
    pub per_100g: NutrientValues,
    #[serde(default)]
    pub product_type: ProductType,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InferAllergensParams {
    pub ingredient_names: Vec<String>,
    /// Allergen keys for cross-contamination ("PODE CONTER")
    #[serde(default)]
    pub may_contain: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateAddedSugarsParams {
    pub ingredients: Vec<IngredientLine>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveRecipeParams {
    #[serde(flatten)]
    pub recipe: RecipeCreate,
    #[serde(default)]
    pub may_contain: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Filter by name or category
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportLabelPdfParams {
    pub id: i64,
    /// Output file; defaults to reports/rotulo_<id>.pdf next to the database
    pub output_path: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RotulagemService {
    // --- Status ---

    #[tool(description = "Get the current status of the RotulagemBR service including build info, database status, and process information")]
    async fn rotulagem_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for producing a Brazilian nutrition label. Call this before using the labeling tools for the first time.")]
    fn labeling_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LABELING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LABELING_INSTRUCTIONS)]))
    }

    // --- Label calculation ---

    #[tool(description = "Calculate the nutrition facts table (per portion, per 100 g and %VD) and front-label warnings for a recipe. Nothing is saved.")]
    fn calculate_nutrition(&self, Parameters(p): Parameters<CalculateNutritionParams>) -> Result<CallToolResult, McpError> {
        let portion = labels::resolve_portion(p.portion_size_g, p.household_measure, &p.context);
        let result = labels::calculate_nutrition(&self.engine, &p.ingredients, &p.context, &portion)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Check unrounded per-100 g values against the ALTO EM front-label thresholds (added sugars, saturated fat, sodium)")]
    fn classify_front_label(&self, Parameters(p): Parameters<ClassifyFrontLabelParams>) -> Result<CallToolResult, McpError> {
        let result = labels::classify_front_label(&self.engine, &p.per_100g, p.product_type)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Infer the allergens declared under RDC 26/2015 from ingredient names and build the ALÉRGICOS statements")]
    fn infer_allergens(&self, Parameters(p): Parameters<InferAllergensParams>) -> Result<CallToolResult, McpError> {
        let result = labels::infer_allergens(&p.ingredient_names, &p.may_contain)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the reference portion categories with portion size and household measure")]
    fn list_portion_categories(&self) -> Result<CallToolResult, McpError> {
        to_json(&labels::list_portion_categories())
    }

    #[tool(description = "Estimate the recipe's added sugars. Sugar ingredients count in full, declared profiles are used as-is, the rest is estimated by a language model. A newer call cancels a running one.")]
    async fn estimate_added_sugars(&self, Parameters(p): Parameters<EstimateAddedSugarsParams>) -> Result<CallToolResult, McpError> {
        let result = sugars::estimate_added_sugars(self.coordinator.as_deref(), p.ingredients)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Recipes ---

    #[tool(description = "Calculate and save a recipe together with its nutrition label and allergen declaration")]
    fn save_recipe(&self, Parameters(p): Parameters<SaveRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::save_recipe(&self.database, &self.engine, p.recipe, &p.may_contain)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a saved recipe with ingredients, stored label, nutrition table and allergen statements")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(label) => to_json(&label),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Recipe not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List saved recipes, newest first, with optional name/category filter and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved recipe with its ingredients, label and allergens")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Reports ---

    #[tool(description = "Export the label of a saved recipe as an A4 PDF report")]
    async fn export_label_pdf(&self, Parameters(p): Parameters<ExportLabelPdfParams>) -> Result<CallToolResult, McpError> {
        let output_path = match p.output_path {
            Some(path) => path,
            None => self.default_report_path(p.id),
        };

        let result = reports::export_label_pdf(&self.database, &self.engine, p.id, &output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

impl RotulagemService {
    fn default_report_path(&self, id: i64) -> String {
        let base = self
            .database_path
            .parent()
            .map(|p| p.join("reports"))
            .unwrap_or_else(|| PathBuf::from("reports"));
        base.join(format!("rotulo_{}.pdf", id)).display().to_string()
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RotulagemService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "rotulagem".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("RotulagemBR".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "RotulagemBR - Brazilian nutrition labeling (IN 75/2020, RDC 429/2020, RDC 26/2015). \
                 IMPORTANT: Call labeling_instructions before the first label. \
                 Preview: calculate_nutrition, classify_front_label, infer_allergens, list_portion_categories. \
                 Added sugars: estimate_added_sugars (needs GEMINI_API_KEY). \
                 Recipes: save/get/list/delete_recipe. \
                 Reports: export_label_pdf."
                    .into(),
            ),
        }
    }
}
