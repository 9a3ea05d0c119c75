use super::currency::format_rupees;
use super::tables::{brand_name, paint_name, parse_rate, range_floor, AreaType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintingType {
    Interior,
    Exterior,
    Both,
}

impl PaintingType {
    pub fn includes_interior(self) -> bool {
        matches!(self, PaintingType::Interior | PaintingType::Both)
    }

    pub fn includes_exterior(self) -> bool {
        matches!(self, PaintingType::Exterior | PaintingType::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Fresh,
    Repainting,
}

impl WorkType {
    pub fn label(self) -> &'static str {
        match self {
            WorkType::Fresh => "Fresh Painting",
            WorkType::Repainting => "Repainting",
        }
    }
}

/// A paint chosen from the table: category, brand slug and the rate value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaintChoice {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, rename = "type")]
    pub rate: String,
}

impl PaintChoice {
    pub fn is_chosen(&self) -> bool {
        !self.rate.trim().is_empty()
    }

    pub fn display_name(&self) -> String {
        format!(
            "{} - {}",
            brand_name(&self.brand),
            paint_name(&self.category, &self.brand, &self.rate)
        )
    }
}

/// Inputs of the painting estimator, as collected by the multi-step form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingInput {
    pub painting_type: PaintingType,
    #[serde(default)]
    pub work_type: Option<WorkType>,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub area_type: Option<AreaType>,
    #[serde(default)]
    pub interior_paint: PaintChoice,
    /// The ceiling gets its own paint; its area is taken off the walls.
    #[serde(default, alias = "samePaintForCeiling")]
    pub separate_ceiling_paint: bool,
    #[serde(default)]
    pub ceiling_paint: PaintChoice,
    #[serde(default)]
    pub exterior_work_type: Option<WorkType>,
    #[serde(default)]
    pub exterior_paint: PaintChoice,
    #[serde(default)]
    pub roof_area: f64,
    #[serde(default)]
    pub roof_paint: PaintChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorSection {
    pub work_type: Option<WorkType>,
    pub area: f64,
    pub wall_area: f64,
    pub wall_paint: String,
    pub wall_cost: f64,
    pub ceiling_paint: Option<String>,
    pub ceiling_area: Option<f64>,
    pub ceiling_cost: f64,
    pub total: f64,
    pub total_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExteriorSection {
    pub work_type: Option<WorkType>,
    pub area: f64,
    pub wall_paint: String,
    pub wall_cost: f64,
    pub roof_area: Option<f64>,
    pub roof_paint: Option<String>,
    pub roof_cost: f64,
    pub total: f64,
    pub total_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingEstimate {
    pub painting_type: PaintingType,
    pub interior: Option<InteriorSection>,
    pub exterior: Option<ExteriorSection>,
    pub grand_total: f64,
    pub grand_total_formatted: String,
}

fn ceiling_floor(area: f64, area_type: Option<AreaType>) -> f64 {
    area_type
        .and_then(|kind| range_floor(kind, area))
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Wall area left after the ceiling is taken out, when the ceiling is priced
/// separately; otherwise the full area.
pub fn display_area(area: f64, area_type: Option<AreaType>, separate_ceiling: bool) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    if separate_ceiling {
        area - ceiling_floor(area, area_type)
    } else {
        area
    }
}

pub fn interior_price(
    area: f64,
    rate: &str,
    area_type: Option<AreaType>,
    separate_ceiling: bool,
) -> f64 {
    let rate = parse_rate(rate);
    if area <= 0.0 || rate == 0.0 {
        return 0.0;
    }
    display_area(area, area_type, separate_ceiling) * rate
}

pub fn ceiling_price(area: f64, rate: &str, area_type: Option<AreaType>) -> f64 {
    let rate = parse_rate(rate);
    if area <= 0.0 || rate == 0.0 {
        return 0.0;
    }
    ceiling_floor(area, area_type) * rate
}

pub fn exterior_price(area: f64, rate: &str) -> f64 {
    surface_price(area, rate)
}

pub fn roof_price(roof_area: f64, rate: &str) -> f64 {
    surface_price(roof_area, rate)
}

fn surface_price(area: f64, rate: &str) -> f64 {
    let rate = parse_rate(rate);
    if area <= 0.0 || rate == 0.0 {
        return 0.0;
    }
    area * rate
}

/// Computes every section of the painting estimate from the raw form input.
pub fn estimate(input: &PaintingInput) -> PaintingEstimate {
    let interior = input.painting_type.includes_interior().then(|| {
        let wall_cost = interior_price(
            input.area,
            &input.interior_paint.rate,
            input.area_type,
            input.separate_ceiling_paint,
        );
        let with_ceiling = input.separate_ceiling_paint && input.ceiling_paint.is_chosen();
        let ceiling_cost = if with_ceiling {
            ceiling_price(input.area, &input.ceiling_paint.rate, input.area_type)
        } else {
            0.0
        };
        let total = wall_cost + ceiling_cost;
        InteriorSection {
            work_type: input.work_type,
            area: input.area,
            wall_area: display_area(input.area, input.area_type, input.separate_ceiling_paint),
            wall_paint: input.interior_paint.display_name(),
            wall_cost,
            ceiling_paint: with_ceiling.then(|| input.ceiling_paint.display_name()),
            ceiling_area: with_ceiling.then(|| ceiling_floor(input.area, input.area_type)),
            ceiling_cost,
            total,
            total_formatted: format_rupees(total),
        }
    });

    let exterior = input.painting_type.includes_exterior().then(|| {
        let wall_cost = exterior_price(input.area, &input.exterior_paint.rate);
        let with_roof = input.roof_paint.is_chosen();
        let roof_cost = if with_roof {
            roof_price(input.roof_area, &input.roof_paint.rate)
        } else {
            0.0
        };
        let total = wall_cost + roof_cost;
        ExteriorSection {
            work_type: input.exterior_work_type,
            area: input.area,
            wall_paint: input.exterior_paint.display_name(),
            wall_cost,
            roof_area: with_roof.then_some(input.roof_area),
            roof_paint: with_roof.then(|| input.roof_paint.display_name()),
            roof_cost,
            total,
            total_formatted: format_rupees(total),
        }
    });

    let grand_total = interior.as_ref().map_or(0.0, |s| s.total)
        + exterior.as_ref().map_or(0.0, |s| s.total);

    PaintingEstimate {
        painting_type: input.painting_type,
        interior,
        exterior,
        grand_total,
        grand_total_formatted: format_rupees(grand_total),
    }
}
