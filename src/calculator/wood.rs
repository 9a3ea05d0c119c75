use super::currency::format_rupees;
use super::tables::{parse_rate, wood_finish};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

pub const DOOR_AREA_SQFT: f64 = 65.0;
pub const WINDOW_AREA_SQFT: f64 = 30.0;
pub const WALL_PANEL_AREA_SQFT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Area,
    Items,
}

impl InputMethod {
    pub fn label(self) -> &'static str {
        match self {
            InputMethod::Area => "Direct Area",
            InputMethod::Items => "Item Count",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCounts {
    #[serde(default)]
    pub doors: u32,
    #[serde(default)]
    pub windows: u32,
    #[serde(default)]
    pub wall_panels: u32,
    #[serde(default)]
    pub furniture_area: f64,
}

impl ItemCounts {
    pub fn door_area(&self) -> f64 {
        f64::from(self.doors) * DOOR_AREA_SQFT
    }

    pub fn window_area(&self) -> f64 {
        f64::from(self.windows) * WINDOW_AREA_SQFT
    }

    pub fn wall_panel_area(&self) -> f64 {
        f64::from(self.wall_panels) * WALL_PANEL_AREA_SQFT
    }

    pub fn total_area(&self) -> f64 {
        self.door_area() + self.window_area() + self.wall_panel_area() + self.furniture_area.max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WoodInput {
    pub input_method: InputMethod,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub item_counts: ItemCounts,
    pub finish_type: String,
    pub finish_brand: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WoodEstimate {
    pub input_method: InputMethod,
    pub total_area: f64,
    pub item_counts: Option<ItemCounts>,
    pub finish_type: String,
    pub finish_brand: String,
    pub finish_name: String,
    pub rate: f64,
    pub total: f64,
    pub total_formatted: String,
}

pub fn total_area(method: InputMethod, area: f64, counts: &ItemCounts) -> f64 {
    match method {
        InputMethod::Area => area.max(0.0),
        InputMethod::Items => counts.total_area(),
    }
}

pub fn polishing_cost(method: InputMethod, area: f64, counts: &ItemCounts, rate: f64) -> f64 {
    total_area(method, area, counts) * rate
}

/// Prices the job from the finish table; the rate never comes from the client.
pub fn estimate(input: &WoodInput) -> Result<WoodEstimate> {
    let finish = wood_finish(&input.finish_type, &input.finish_brand).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown wood finish: {} ({})",
            input.finish_type, input.finish_brand
        ))
    })?;
    let rate = parse_rate(finish.value);
    let area = total_area(input.input_method, input.area, &input.item_counts);
    let total = area * rate;

    Ok(WoodEstimate {
        input_method: input.input_method,
        total_area: area,
        item_counts: (input.input_method == InputMethod::Items).then_some(input.item_counts),
        finish_type: input.finish_type.clone(),
        finish_brand: input.finish_brand.clone(),
        finish_name: finish.name.to_string(),
        rate,
        total,
        total_formatted: format_rupees(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_areas_add_up() {
        let counts = ItemCounts {
            doors: 2,
            windows: 3,
            wall_panels: 1,
            furniture_area: 20.0,
        };
        assert_eq!(total_area(InputMethod::Items, 999.0, &counts), 320.0);
        assert_eq!(total_area(InputMethod::Area, 150.0, &counts), 150.0);
        assert_eq!(polishing_cost(InputMethod::Items, 0.0, &counts, 80.0), 25600.0);
    }

    #[test]
    fn estimate_uses_table_rate() {
        let input = WoodInput {
            input_method: InputMethod::Area,
            area: 100.0,
            item_counts: ItemCounts::default(),
            finish_type: "Polyester Pigment".to_string(),
            finish_brand: "ICA".to_string(),
        };
        let estimate = estimate(&input).unwrap();
        assert_eq!(estimate.rate, 650.0);
        assert_eq!(estimate.total, 65000.0);
        assert_eq!(estimate.total_formatted, "₹65,000");
        assert!(estimate.item_counts.is_none());
    }

    #[test]
    fn unknown_finish_is_rejected() {
        let input = WoodInput {
            input_method: InputMethod::Area,
            area: 100.0,
            item_counts: ItemCounts::default(),
            finish_type: "Gold Leaf".to_string(),
            finish_brand: "ICA".to_string(),
        };
        assert!(matches!(estimate(&input), Err(AppError::BadRequest(_))));
    }
}
