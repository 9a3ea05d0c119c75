//! Painting and wood-polishing estimators.
//!
//! Everything here is pure: rates come from [`tables`], and the server
//! recomputes totals instead of trusting what a form posts back.

pub mod currency;
pub mod painting;
pub mod tables;
pub mod wood;

use serde::Serialize;
use tables::{AreaOption, PaintOption};

#[derive(Debug, Serialize)]
pub struct BrandPaintsView {
    pub slug: &'static str,
    pub name: &'static str,
    pub paints: &'static [PaintOption],
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: &'static str,
    pub brands: Vec<BrandPaintsView>,
}

#[derive(Debug, Serialize)]
pub struct FinishBrandView {
    pub brand: &'static str,
    pub options: &'static [PaintOption],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishTypeView {
    pub finish_type: &'static str,
    pub brands: Vec<FinishBrandView>,
}

/// Everything the multi-step forms need to render their choices.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorOptions {
    pub carpet_area_options: &'static [AreaOption],
    pub buildup_area_options: &'static [AreaOption],
    pub paint_options: Vec<CategoryView>,
    pub wood_finish_options: Vec<FinishTypeView>,
}

pub fn options() -> CalculatorOptions {
    let paint_options = tables::PAINT_OPTIONS
        .iter()
        .map(|&(category, brands)| CategoryView {
            category,
            brands: brands
                .iter()
                .map(|&(slug, paints)| BrandPaintsView {
                    slug,
                    name: tables::brand_name(slug),
                    paints,
                })
                .collect(),
        })
        .collect();

    let wood_finish_options = tables::WOOD_FINISH_OPTIONS
        .iter()
        .map(|&(finish_type, brands)| FinishTypeView {
            finish_type,
            brands: brands
                .iter()
                .map(|&(brand, options)| FinishBrandView { brand, options })
                .collect(),
        })
        .collect();

    CalculatorOptions {
        carpet_area_options: tables::CARPET_AREA_OPTIONS,
        buildup_area_options: tables::BUILDUP_AREA_OPTIONS,
        paint_options,
        wood_finish_options,
    }
}
