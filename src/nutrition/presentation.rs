//! Nutrition facts table layout
//!
//! Pure formatting over an already computed [`NutritionResult`]. Shared by the
//! MCP tools, the `calculate_label` binary and the PDF export.

use serde::{Deserialize, Serialize};

use super::daily_value::format_daily_value;
use super::engine::NutritionResult;
use super::input::ProductType;
use super::nutrient::Nutrient;
use super::rounding::DisplayValues;

pub const TABLE_TITLE: &str = "INFORMAÇÃO NUTRICIONAL";

pub const TABLE_FOOTNOTE: &str = "(*) % Valores Diários de referência com base em uma dieta de \
2.000 kcal ou 8.400 kJ. Seus valores diários podem ser maiores ou menores dependendo de suas \
necessidades energéticas. (**) VD não estabelecido.";

/// Declared portion printed in the table header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionInfo {
    /// Portion size in g (solids) or ml (liquids)
    pub size: f64,
    /// Household measure, e.g. "1 fatia"
    pub household_measure: String,
    pub product_type: ProductType,
}

impl PortionInfo {
    pub fn new(size: f64, household_measure: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            size,
            household_measure: household_measure.into(),
            product_type,
        }
    }

    /// "Porção de 50g (1 fatia)"
    pub fn header(&self) -> String {
        let size = if self.size.fract() == 0.0 {
            format!("{:.0}", self.size)
        } else {
            format!("{:.1}", self.size)
        };
        let unit = self.product_type.portion_unit();

        if self.household_measure.trim().is_empty() {
            format!("Porção de {}{}", size, unit)
        } else {
            format!("Porção de {}{} ({})", size, unit, self.household_measure.trim())
        }
    }
}

/// One printed line of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    /// Sub-items (sugars under carbohydrates, fat fractions under total fat)
    pub indented: bool,
    pub per_portion: String,
    pub daily_value: String,
    pub per_100g: String,
}

/// Rows in printed order: (nutrient, indented). Energy covers kcal and kJ.
const ROWS: [(Nutrient, bool); 10] = [
    (Nutrient::EnergyKcal, false),
    (Nutrient::Carbohydrates, false),
    (Nutrient::TotalSugars, true),
    (Nutrient::AddedSugars, true),
    (Nutrient::Proteins, false),
    (Nutrient::TotalFat, false),
    (Nutrient::SaturatedFat, true),
    (Nutrient::TransFat, true),
    (Nutrient::Fiber, false),
    (Nutrient::Sodium, false),
];

fn cell(display: &DisplayValues, nutrient: Nutrient) -> String {
    if nutrient.is_energy() {
        format!("{} kcal = {} kJ", display.energy_kcal, display.energy_kj)
    } else {
        format!("{} {}", display.get(nutrient), nutrient.unit().symbol())
    }
}

/// Ready-to-print nutrition facts table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTable {
    pub title: String,
    pub portion_header: String,
    pub per_100_header: String,
    pub rows: Vec<TableRow>,
    pub warnings: Vec<String>,
    pub footnote: String,
}

impl NutritionTable {
    pub fn from_result(result: &NutritionResult, portion: &PortionInfo) -> Self {
        let rows = ROWS
            .iter()
            .map(|(nutrient, indented)| TableRow {
                label: nutrient.label().to_string(),
                indented: *indented,
                per_portion: cell(&result.display_values.per_portion, *nutrient),
                daily_value: format_daily_value(result.vd_percent.get(*nutrient)),
                per_100g: cell(&result.display_values.per_100g, *nutrient),
            })
            .collect();

        Self {
            title: TABLE_TITLE.to_string(),
            portion_header: portion.header(),
            per_100_header: format!("100 {}", portion.product_type.portion_unit()),
            rows,
            warnings: result
                .front_label
                .warnings()
                .into_iter()
                .map(String::from)
                .collect(),
            footnote: TABLE_FOOTNOTE.to_string(),
        }
    }

    /// Plain-text rendering for terminals and tool output
    pub fn render_text(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count() + if r.indented { 2 } else { 0 })
            .max()
            .unwrap_or(0)
            .max("Nutriente".len());
        let portion_width = self
            .rows
            .iter()
            .map(|r| r.per_portion.chars().count())
            .max()
            .unwrap_or(0)
            .max("Porção".chars().count());

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&self.portion_header);
        out.push('\n');
        out.push_str(&format!(
            "{:<lw$}  {:>pw$}  {:>6}  {}\n",
            "Nutriente",
            "Porção",
            "%VD(*)",
            self.per_100_header,
            lw = label_width,
            pw = portion_width
        ));

        for row in &self.rows {
            let label = if row.indented {
                format!("  {}", row.label)
            } else {
                row.label.clone()
            };
            out.push_str(&format!(
                "{:<lw$}  {:>pw$}  {:>6}  {}\n",
                label,
                row.per_portion,
                row.daily_value,
                row.per_100g,
                lw = label_width,
                pw = portion_width
            ));
        }

        out.push_str(&self.footnote);
        out.push('\n');

        if !self.warnings.is_empty() {
            out.push('\n');
            for warning in &self.warnings {
                out.push_str(warning);
                out.push('\n');
            }
        }

        out
    }
}
