use super::{
    is_valid_category, is_valid_size_unit, is_valid_sub_category, SHEEN_LEVELS, SURFACE_TYPES,
    USAGE_TYPES,
};
use crate::types::Product;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static UNIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)[LK]$").expect("static suffix pattern"));

const DEFAULT_CATEGORY: &str = "Interior & Exterior Both";
const DEFAULT_SHEEN: &str = "Mat";
const DEFAULT_SURFACE: &str = "Interior Wall";
const DEFAULT_USAGE: &str = "Home";
const DEFAULT_SIZE_UNIT: &str = "L";
const DEFAULT_SIZES: &[&str] = &["1", "4", "10", "20"];

/// Pre-filled values for the "new product" form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDefaults {
    pub category: String,
    pub sub_category: String,
    pub size_unit: String,
    pub sheen_level: String,
    pub surface_type: String,
    pub usage: String,
    pub available_sizes: Vec<String>,
}

impl Default for ProductDefaults {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            sub_category: String::new(),
            size_unit: DEFAULT_SIZE_UNIT.to_string(),
            sheen_level: DEFAULT_SHEEN.to_string(),
            surface_type: DEFAULT_SURFACE.to_string(),
            usage: DEFAULT_USAGE.to_string(),
            available_sizes: DEFAULT_SIZES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Occurrence counts in first-seen order.
fn tally<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

/// Most frequent value; ties go to whichever appeared first.
fn most_common<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in tally(values) {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn valid_or<'a>(value: Option<&'a str>, allowed: impl Fn(&str) -> bool, fallback: &'a str) -> String {
    value.filter(|v| allowed(v)).unwrap_or(fallback).to_string()
}

pub fn product_defaults(products: &[Product]) -> ProductDefaults {
    if products.is_empty() {
        return ProductDefaults::default();
    }

    let category = most_common(products.iter().map(|p| p.category.as_str()));
    let sub_category = most_common(
        products
            .iter()
            .filter_map(|p| p.sub_category.as_deref())
            .filter(|s| !s.is_empty()),
    );
    let sheen = most_common(products.iter().map(|p| p.sheen_level.as_str()));
    let surface = most_common(products.iter().map(|p| p.surface_type.as_str()));
    let usage = most_common(products.iter().map(|p| p.usage.as_str()));
    let size_unit = most_common(
        products
            .iter()
            .map(|p| p.size_unit.as_str())
            .filter(|s| !s.is_empty()),
    );

    let mut sizes = tally(products.iter().flat_map(|p| {
        p.prices
            .iter()
            .filter(|(_, price)| **price > 0.0)
            .map(|(key, _)| key.trim())
            .filter(|key| !key.is_empty())
    }));
    sizes.sort_by(|a, b| b.1.cmp(&a.1));
    let available_sizes: Vec<String> = if sizes.is_empty() {
        DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()
    } else {
        sizes
            .into_iter()
            .map(|(key, _)| UNIT_SUFFIX.replace(key, "$1").into_owned())
            .collect()
    };

    ProductDefaults {
        category: valid_or(category, is_valid_category, DEFAULT_CATEGORY),
        sub_category: valid_or(sub_category, is_valid_sub_category, ""),
        size_unit: valid_or(size_unit, is_valid_size_unit, DEFAULT_SIZE_UNIT),
        sheen_level: valid_or(sheen, |v| SHEEN_LEVELS.contains(&v), DEFAULT_SHEEN),
        surface_type: valid_or(surface, |v| SURFACE_TYPES.contains(&v), DEFAULT_SURFACE),
        usage: valid_or(usage, |v| USAGE_TYPES.contains(&v), DEFAULT_USAGE),
        available_sizes,
    }
}
