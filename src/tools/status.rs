//! RotulagemBR Status Tool
//!
//! Provides runtime status information and the labeling guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Labeling workflow instructions for AI assistants
pub const LABELING_INSTRUCTIONS: &str = r#"
# RotulagemBR Labeling Instructions

This guide explains how to produce a Brazilian nutrition label (IN 75/2020, RDC 429/2020,
RDC 26/2015) with the RotulagemBR tools.

## Overview

A label needs:
1. **Ingredient lines** - name, quantity used (g or ml) and the composition per 100 g
   (usually copied from the TACO table)
2. **Recipe context** - final yield after cooking, number of portions, added sugars for the
   whole recipe and whether the product is solid or liquid
3. **Portion info** - portion size and household measure (see `list_portion_categories`)

---

## Ingredient composition

All composition values are **per 100 g** (or 100 ml) of the ingredient:

| Field | Unit |
|-------|------|
| carbohydrates, total_sugars, added_sugars, proteins | g |
| total_fat, saturated_fat, trans_fat, fiber | g |
| sodium | **mg** |

Energy fields on ingredients are ignored. Energy is always derived:
4 kcal/g carbohydrate, 4 kcal/g protein, 9 kcal/g fat, and 1 kcal = 4.2 kJ.

---

## Final yield

`final_yield_g` is the weight of the **finished** product, after cooking losses or water
gains. It is NOT the sum of ingredient weights unless nothing is lost. The per-100 g column
and the front-label check depend on it.

---

## Added sugars

The engine never guesses added sugars; `added_sugars_g` is the recipe total you supply.
To get a starting figure call `estimate_added_sugars`:
- ingredients named "açúcar ..." count 100% of their weight
- ingredients whose composition declares added sugars use that value
- everything else is estimated by the language model (only when GEMINI_API_KEY is set)

Review the estimate before saving.

---

## What the engine does

1. Sums ingredient contributions and derives energy
2. Divides into one portion and normalizes to 100 g of finished product
3. %VD from **unrounded** per-portion values (2000 kcal diet)
4. Zero rule, then rounding, for the declared values
5. Front-label "ALTO EM" marks from **unrounded** per-100 g values:

| Nutrient | Solid (per 100 g) | Liquid (per 100 ml) |
|----------|-------------------|---------------------|
| Added sugars | ≥ 15 g | ≥ 7.5 g |
| Saturated fat | ≥ 6 g | ≥ 3 g |
| Sodium | ≥ 600 mg | ≥ 300 mg |

---

## Allergens

`infer_allergens` matches ingredient names against RDC 26/2015 keyword lists. Matching ignores
case and accents. Cross-contamination ("PODE CONTER") cannot be inferred; pass it explicitly as
`may_contain` when saving.

---

## Typical workflow

1. `list_portion_categories` to pick the portion and household measure
2. `estimate_added_sugars` with the ingredient lines (optional)
3. `calculate_nutrition` to preview the table
4. `save_recipe` to store recipe, computed label and allergens
5. `export_label_pdf` with the recipe id to produce the A4 report

## Important notes

- Quantities must be positive; a recipe needs at least one portion and a positive yield
- Total sugars has no daily reference; its %VD shows as "**"
- Saved recipes keep the composition snapshot they were calculated with
"#;

/// Runtime status of the RotulagemBR service
#[derive(Debug, Clone, Serialize)]
pub struct RotulagemStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Whether the sugar estimator has an API key
    pub estimation_configured: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    estimation_configured: bool,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, estimation_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            estimation_configured,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> RotulagemStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        RotulagemStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            estimation_configured: self.estimation_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/rotulagem.db"), false);
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(!status.estimation_configured);
    }
}
