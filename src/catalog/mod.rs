//! Fixed product vocabularies shared by the admin API, the public filters
//! and the seeder.

pub mod defaults;
pub mod quantity;

use serde::Serialize;

pub const CATEGORY_OPTIONS: &[&str] = &[
    "Interior",
    "Exterior",
    "Interior & Exterior Both",
    "Wood Finish",
    "Metal Finish",
    "Wood & Metal Finish",
    "Tile & Grout",
    "Waterproof",
];

pub const SUB_CATEGORY_OPTIONS: &[&str] = &[
    "Putty (Base Material)",
    "Economy",
    "Premium",
    "Luxury",
    "Ultra Luxury",
    "Tool",
    "Texture",
    "Waterproof Chemical",
    "Adhesive",
];

pub const SHEEN_LEVELS: &[&str] = &["Ultra Matt", "Mat", "Low Sheen", "High Sheen"];
pub const SURFACE_TYPES: &[&str] = &["Interior Wall", "Exterior Wall", "Wood", "Metal"];
pub const USAGE_TYPES: &[&str] = &["Home", "Commercial"];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SizeUnitOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SIZE_UNIT_OPTIONS: &[SizeUnitOption] = &[
    SizeUnitOption {
        value: "L",
        label: "Liter (L)",
    },
    SizeUnitOption {
        value: "K",
        label: "KG (K)",
    },
];

/// Price keys the admin form edits directly.
pub const STANDARD_PRICE_KEYS: &[&str] = &["1L", "4L", "10L", "20L"];

pub fn is_valid_category(value: &str) -> bool {
    CATEGORY_OPTIONS.contains(&value)
}

pub fn is_valid_sub_category(value: &str) -> bool {
    SUB_CATEGORY_OPTIONS.contains(&value)
}

pub fn is_valid_size_unit(value: &str) -> bool {
    SIZE_UNIT_OPTIONS.iter().any(|unit| unit.value == value)
}

const BRAND_SORT_INDEX: &[(&str, usize)] = &[
    ("asian-paints", 0),
    ("sherwin-williams", 1),
    ("nerolac", 2),
    ("kansai-nerolac", 2),
    ("berger", 3),
    ("berger-paints", 3),
    ("jsw", 4),
    ("jsw-paints", 4),
    ("birla-opus", 5),
    ("dulux", 6),
    ("jk-maxx", 7),
    ("shalimar", 8),
    ("nippon", 9),
    ("nippon-paint", 9),
    ("mrf-paints", 10),
    ("ral", 11),
    ("ncs", 12),
];

/// Position of a brand in listings. Unknown slugs sort after every known one.
pub fn brand_sort_index(slug: &str) -> usize {
    BRAND_SORT_INDEX
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|&(_, index)| index)
        .unwrap_or(usize::MAX)
}

/// Stable sort by display order, so brands sharing an index keep their
/// incoming order.
pub fn sort_brands<T, F>(items: &mut [T], slug_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| brand_sort_index(slug_of(item)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_an_index() {
        assert_eq!(brand_sort_index("nerolac"), brand_sort_index("kansai-nerolac"));
        assert_eq!(brand_sort_index("berger-paints"), 3);
        assert_eq!(brand_sort_index("unknown-brand"), usize::MAX);
    }

    #[test]
    fn sorts_unknown_brands_last() {
        let mut slugs = vec!["dulux", "acme", "asian-paints", "kansai-nerolac"];
        sort_brands(&mut slugs, |s| s);
        assert_eq!(slugs, vec!["asian-paints", "kansai-nerolac", "dulux", "acme"]);
    }

    #[test]
    fn vocabularies() {
        assert!(is_valid_category("Wood & Metal Finish"));
        assert!(!is_valid_category("wood finish"));
        assert!(is_valid_sub_category("Putty (Base Material)"));
        assert!(is_valid_size_unit("K"));
        assert!(!is_valid_size_unit("G"));
    }
}
