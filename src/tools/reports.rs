//! Label report generation
//!
//! A4 PDF with recipe info, ingredient list, nutrition facts table,
//! front-label marks and allergen statements.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::*;
use serde::Serialize;

use crate::db::Database;
use crate::labeling::AllergenDeclaration;
use crate::models::{Recipe, RecipeDetail};
use crate::nutrition::{
    IngredientLine, NutritionEngine, NutritionResult, NutritionTable, PortionInfo, ProductType,
};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 102, 51);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);
const COLOR_WARNING: (u8, u8, u8) = (192, 0, 0);

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 25.0;

const REGULATIONS: &str = "Baseado em: RDC 429/2020, IN 75/2020, RDC 359/2003, RDC 26/2015";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateLabelResponse {
    pub success: bool,
    pub file_path: String,
    pub recipe_id: Option<i64>,
    pub pages: usize,
    pub message: String,
}

/// Everything printed on the report
#[derive(Debug, Clone)]
pub struct LabelReport {
    pub recipe_id: Option<i64>,
    pub name: String,
    pub category: Option<String>,
    pub product_type: ProductType,
    pub final_yield_g: f64,
    pub num_portions: u32,
    pub portion: PortionInfo,
    pub ingredients: Vec<IngredientLine>,
    pub nutrition: NutritionResult,
    pub allergens: AllergenDeclaration,
}

impl LabelReport {
    /// Use the stored nutrition, recalculating when none was saved
    pub fn from_detail(detail: RecipeDetail, engine: &NutritionEngine) -> Result<Self, String> {
        let nutrition = match detail.nutrition {
            Some(result) => result,
            None => engine
                .calculate(&detail.ingredients, &detail.recipe.context())
                .map_err(|e| format!("Invalid recipe: {}", e))?,
        };

        Ok(Self {
            recipe_id: Some(detail.recipe.id),
            portion: detail.recipe.portion(),
            name: detail.recipe.name,
            category: detail.recipe.category,
            product_type: detail.recipe.product_type,
            final_yield_g: detail.recipe.final_yield_g,
            num_portions: detail.recipe.num_portions,
            ingredients: detail.ingredients,
            nutrition,
            allergens: detail.allergens,
        })
    }
}

// ============================================================================
// Drawing helpers
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y1), false), (Point::new(x2, y2), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

fn add_box(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: (u8, u8, u8)) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(1.0);

    let rect = Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        is_closed: true,
    };
    layer.add_line(rect);
}

fn format_grams(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Splits long text into lines of at most `width` characters
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Page cursor that starts a new page when the bottom margin is reached
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> Cursor<'a> {
    fn ensure(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - 20.0;
            self.pages += 1;
        }
    }
}

// ============================================================================
// Report Generation
// ============================================================================

/// Write the label report for `report` to `output_path`
pub fn generate_label_report(
    report: &LabelReport,
    output_path: &str,
) -> Result<GenerateLabelResponse, String> {
    let (doc, page1, layer1) = PdfDocument::new(
        format!("Rotulagem - {}", report.name),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let mut c = Cursor {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: PAGE_HEIGHT - 20.0,
        pages: 1,
    };
    let unit = report.product_type.portion_unit();

    // Title
    add_text(&c.layer, &font_bold, "RotulagemBR", Mm(MARGIN_LEFT), Mm(c.y), 20.0, COLOR_TITLE);
    c.y -= 10.0;
    add_text(&c.layer, &font_bold, &report.name, Mm(MARGIN_LEFT), Mm(c.y), 14.0, COLOR_BLACK);
    c.y -= 6.0;

    let subtitle = match &report.category {
        Some(category) => format!("Categoria: {} | Tipo: {}", category, report.product_type.label()),
        None => format!("Tipo: {}", report.product_type.label()),
    };
    add_text(&c.layer, &font, &subtitle, Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_GRAY);
    c.y -= 6.0;
    add_line(&c.layer, Mm(MARGIN_LEFT), Mm(c.y), Mm(195.0), Mm(c.y), COLOR_GRAY, 0.5);
    c.y -= 8.0;

    // Recipe info
    add_text(&c.layer, &font_bold, "INFORMAÇÕES DA RECEITA", Mm(MARGIN_LEFT), Mm(c.y), 12.0, COLOR_BLACK);
    c.y -= 7.0;
    let info = [
        format!("Rendimento final: {}{}", format_grams(report.final_yield_g), unit),
        format!(
            "Porção: {}{} ({})",
            format_grams(report.portion.size),
            unit,
            report.portion.household_measure
        ),
        format!("Número de porções: {}", report.num_portions),
    ];
    for line in &info {
        add_text(&c.layer, &font, line, Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_BLACK);
        c.y -= 5.5;
    }
    c.y -= 4.0;

    // Ingredients
    c.ensure(12.0);
    add_text(&c.layer, &font_bold, "INGREDIENTES", Mm(MARGIN_LEFT), Mm(c.y), 12.0, COLOR_BLACK);
    c.y -= 7.0;
    for ingredient in &report.ingredients {
        c.ensure(5.0);
        let text = format!("- {}: {}g", ingredient.name, format_grams(ingredient.quantity_g));
        add_text(&c.layer, &font, &text, Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_BLACK);
        c.y -= 5.0;
    }
    c.y -= 5.0;

    // Nutrition table
    let table = NutritionTable::from_result(&report.nutrition, &report.portion);
    c.ensure(15.0 + 5.5 * table.rows.len() as f32 + 20.0);

    add_text(&c.layer, &font_bold, &table.title, Mm(MARGIN_LEFT), Mm(c.y), 12.0, COLOR_BLACK);
    c.y -= 6.0;
    add_text(&c.layer, &font, &table.portion_header, Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_BLACK);
    c.y -= 6.0;

    let columns = [MARGIN_LEFT, 80.0, 130.0, 150.0];
    let per_100_header = format!("Por {}", table.per_100_header);
    let headers = ["Nutriente", "Por Porção", "%VD(*)", per_100_header.as_str()];
    for (x, header) in columns.iter().zip(headers.iter()) {
        add_text(&c.layer, &font_bold, header, Mm(*x), Mm(c.y), 9.0, COLOR_BLACK);
    }
    c.y -= 2.0;
    add_line(&c.layer, Mm(MARGIN_LEFT), Mm(c.y), Mm(195.0), Mm(c.y), COLOR_BLACK, 0.8);
    c.y -= 4.5;

    for row in &table.rows {
        let label_x = if row.indented { MARGIN_LEFT + 4.0 } else { MARGIN_LEFT };
        add_text(&c.layer, &font, &row.label, Mm(label_x), Mm(c.y), 9.0, COLOR_BLACK);
        add_text(&c.layer, &font, &row.per_portion, Mm(columns[1]), Mm(c.y), 9.0, COLOR_BLACK);
        add_text(&c.layer, &font, &row.daily_value, Mm(columns[2]), Mm(c.y), 9.0, COLOR_BLACK);
        add_text(&c.layer, &font, &row.per_100g, Mm(columns[3]), Mm(c.y), 9.0, COLOR_BLACK);
        c.y -= 1.5;
        add_line(&c.layer, Mm(MARGIN_LEFT), Mm(c.y), Mm(195.0), Mm(c.y), COLOR_GRAY, 0.3);
        c.y -= 4.0;
    }
    c.y -= 2.0;
    for line in wrap(&table.footnote, 110) {
        add_text(&c.layer, &font, &line, Mm(MARGIN_LEFT), Mm(c.y), 7.0, COLOR_GRAY);
        c.y -= 3.5;
    }
    c.y -= 6.0;

    // Front label
    c.ensure(12.0 + 8.0 * table.warnings.len() as f32);
    add_text(&c.layer, &font_bold, "ROTULAGEM FRONTAL - LUPA", Mm(MARGIN_LEFT), Mm(c.y), 12.0, COLOR_BLACK);
    c.y -= 8.0;
    if table.warnings.is_empty() {
        add_text(
            &c.layer,
            &font,
            "Não requer rotulagem frontal de advertência.",
            Mm(MARGIN_LEFT),
            Mm(c.y),
            10.0,
            COLOR_BLACK,
        );
        c.y -= 8.0;
    } else {
        let height = 8.0 * table.warnings.len() as f32 + 2.0;
        add_box(&c.layer, MARGIN_LEFT, c.y - height + 6.0, 90.0, height, COLOR_BLACK);
        for warning in &table.warnings {
            add_text(&c.layer, &font_bold, warning, Mm(MARGIN_LEFT + 4.0), Mm(c.y), 11.0, COLOR_WARNING);
            c.y -= 8.0;
        }
        c.y -= 4.0;
    }

    // Allergens
    let statements = report.allergens.statements();
    c.ensure(12.0 + 6.0 * statements.len().max(1) as f32);
    add_text(&c.layer, &font_bold, "ALERGÊNICOS", Mm(MARGIN_LEFT), Mm(c.y), 12.0, COLOR_BLACK);
    c.y -= 7.0;
    if statements.is_empty() {
        add_text(&c.layer, &font, "Nenhum alergênico identificado.", Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_BLACK);
        c.y -= 6.0;
    }
    for statement in &statements {
        for line in wrap(statement, 90) {
            add_text(&c.layer, &font_bold, &line, Mm(MARGIN_LEFT), Mm(c.y), 10.0, COLOR_BLACK);
            c.y -= 5.0;
        }
    }

    // Footer
    c.ensure(14.0);
    c.y -= 6.0;
    add_line(&c.layer, Mm(MARGIN_LEFT), Mm(c.y), Mm(195.0), Mm(c.y), COLOR_GRAY, 0.5);
    c.y -= 5.0;
    add_text(&c.layer, &font, REGULATIONS, Mm(MARGIN_LEFT), Mm(c.y), 8.0, COLOR_GRAY);
    c.y -= 4.0;
    let now = chrono::Local::now().format("%d/%m/%Y %H:%M").to_string();
    add_text(
        &c.layer,
        &font,
        &format!("Gerado por RotulagemBR em {}", now),
        Mm(MARGIN_LEFT),
        Mm(c.y),
        8.0,
        COLOR_GRAY,
    );

    let pages = c.pages;

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    tracing::info!("Label report for '{}' written to {}", report.name, output_path);

    Ok(GenerateLabelResponse {
        success: true,
        file_path: output_path.to_string(),
        recipe_id: report.recipe_id,
        pages,
        message: format!("Label report generated for '{}'", report.name),
    })
}

/// Export the label of a saved recipe
pub fn export_label_pdf(
    db: &Database,
    engine: &NutritionEngine,
    id: i64,
    output_path: &str,
) -> Result<GenerateLabelResponse, String> {
    let conn = db.get_conn().map_err(|e| e.to_string())?;

    let detail = Recipe::get_detail(&conn, id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Recipe not found with id: {}", id))?;

    let report = LabelReport::from_detail(detail, engine)?;
    generate_label_report(&report, output_path)
}
