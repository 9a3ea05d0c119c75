use crate::types::Prices;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SIZED_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(g)?\s*[LKP]+$").expect("static size pattern")
});
static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*$").expect("static number pattern"));
static HAS_UNIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[LKP]").expect("static unit pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuantityRange {
    #[serde(rename = "lt1")]
    LessThanOne,
    #[serde(rename = "1-5")]
    OneToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "11-20")]
    ElevenToTwenty,
    #[serde(rename = "21-30")]
    TwentyOneToThirty,
    #[serde(rename = "31-40")]
    ThirtyOneToForty,
    #[serde(rename = "41-50")]
    FortyOneToFifty,
    #[serde(rename = "50+")]
    FiftyPlus,
}

impl QuantityRange {
    pub const ALL: [QuantityRange; 8] = [
        QuantityRange::LessThanOne,
        QuantityRange::OneToFive,
        QuantityRange::SixToTen,
        QuantityRange::ElevenToTwenty,
        QuantityRange::TwentyOneToThirty,
        QuantityRange::ThirtyOneToForty,
        QuantityRange::FortyOneToFifty,
        QuantityRange::FiftyPlus,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.value() == value)
    }

    pub fn value(self) -> &'static str {
        match self {
            QuantityRange::LessThanOne => "lt1",
            QuantityRange::OneToFive => "1-5",
            QuantityRange::SixToTen => "6-10",
            QuantityRange::ElevenToTwenty => "11-20",
            QuantityRange::TwentyOneToThirty => "21-30",
            QuantityRange::ThirtyOneToForty => "31-40",
            QuantityRange::FortyOneToFifty => "41-50",
            QuantityRange::FiftyPlus => "50+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuantityRange::LessThanOne => "< 1",
            other => other.value(),
        }
    }

    /// Ranges are half-open on whole numbers, except `50+` which also
    /// admits exactly 50.
    pub fn contains(self, quantity: f64) -> bool {
        match self {
            QuantityRange::LessThanOne => quantity < 1.0,
            QuantityRange::OneToFive => (1.0..6.0).contains(&quantity),
            QuantityRange::SixToTen => (6.0..11.0).contains(&quantity),
            QuantityRange::ElevenToTwenty => (11.0..21.0).contains(&quantity),
            QuantityRange::TwentyOneToThirty => (21.0..31.0).contains(&quantity),
            QuantityRange::ThirtyOneToForty => (31.0..41.0).contains(&quantity),
            QuantityRange::FortyOneToFifty => (41.0..51.0).contains(&quantity),
            QuantityRange::FiftyPlus => quantity >= 50.0,
        }
    }
}

fn parse_size_part(part: &str, key_has_unit: bool) -> Option<f64> {
    let trimmed = part.trim();
    if let Some(caps) = SIZED_PART.captures(trimmed) {
        let number: f64 = caps[1].parse().ok()?;
        return Some(if caps.get(2).is_some() {
            number / 1000.0
        } else {
            number
        });
    }
    // "20" in "20 & 50L" borrows the unit from the rest of the key
    if key_has_unit {
        if let Some(caps) = BARE_NUMBER.captures(trimmed) {
            return caps[1].parse().ok();
        }
    }
    None
}

/// Numeric sizes (litres or kilograms) a product is sold in. Keys priced at
/// zero are skipped.
pub fn size_values(prices: &Prices) -> Vec<f64> {
    let mut values = Vec::new();
    for (key, price) in prices {
        if *price == 0.0 || price.is_nan() {
            continue;
        }
        let has_unit = HAS_UNIT.is_match(key);
        values.extend(
            key.split(['&', ','])
                .filter_map(|part| parse_size_part(part, has_unit)),
        );
    }
    values
}

pub fn has_size_in_range(prices: &Prices, range: QuantityRange) -> bool {
    size_values(prices).into_iter().any(|v| range.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(entries: &[(&str, f64)]) -> Prices {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn parses_units_grams_and_shared_units() {
        let mut values = size_values(&prices(&[("1L", 10.0), ("500gK", 5.0), ("20 & 50L", 9.0)]));
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, vec![0.5, 1.0, 20.0, 50.0]);
    }

    #[test]
    fn bare_numbers_without_a_unit_are_ignored() {
        assert!(size_values(&prices(&[("20", 100.0)])).is_empty());
        assert!(size_values(&prices(&[("4L", 0.0)])).is_empty());
    }

    #[test]
    fn range_membership() {
        let p = prices(&[("4L", 1700.0), ("50L", 9000.0)]);
        assert!(has_size_in_range(&p, QuantityRange::OneToFive));
        assert!(has_size_in_range(&p, QuantityRange::FortyOneToFifty));
        assert!(has_size_in_range(&p, QuantityRange::FiftyPlus));
        assert!(!has_size_in_range(&p, QuantityRange::SixToTen));
        assert!(!has_size_in_range(&Prices::new(), QuantityRange::LessThanOne));
    }

    #[test]
    fn parse_round_trips_values() {
        for range in QuantityRange::ALL {
            assert_eq!(QuantityRange::parse(range.value()), Some(range));
        }
        assert_eq!(QuantityRange::parse("7-9"), None);
        assert_eq!(QuantityRange::LessThanOne.label(), "< 1");
    }
}
