//! Static price tables used by the estimators.

use serde::{Deserialize, Serialize};

/// A selectable house-size range. `value` is the paintable surface (sq.ft)
/// that the range stands for.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AreaOption {
    pub label: &'static str,
    pub value: u32,
}

/// A paint product with its rate (rupees per sq.ft) kept as the decimal
/// string the forms submit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaintOption {
    pub value: &'static str,
    pub name: &'static str,
}

/// How the customer expressed the size of the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Carpet,
    Buildup,
    /// Paintable area entered directly; no range lookup applies.
    Painting,
}

pub const CARPET_AREA_OPTIONS: &[AreaOption] = &[
    AreaOption { label: "1000-1200 Sq. ft.", value: 2500 },
    AreaOption { label: "1201 - 1500 Sq. Ft.", value: 3000 },
    AreaOption { label: "1501 - 1800 Sq. ft.", value: 3500 },
    AreaOption { label: "1800 - 2200 Sq. ft.", value: 4200 },
    AreaOption { label: "2201 - 2600 Sq. ft.", value: 4900 },
    AreaOption { label: "2601 - 3000 Sq. ft.", value: 5700 },
    AreaOption { label: "3001 - 3500 Sq. ft.", value: 6400 },
    AreaOption { label: "3501 - 4000 Sq. ft.", value: 7200 },
    AreaOption { label: "4000 - 4500 Sq. ft.", value: 7900 },
    AreaOption { label: "4501 - 5000 Sq. ft.", value: 8800 },
    AreaOption { label: "5001 - 5500 Sq. ft.", value: 9600 },
    AreaOption { label: "5501 - 6000 Sq. ft.", value: 10500 },
    AreaOption { label: "6001 - 6500 Sq. ft.", value: 11400 },
    AreaOption { label: "6501 - 7000 Sq. ft.", value: 12300 },
    AreaOption { label: "7001 - 7500 Sq. ft.", value: 13100 },
    AreaOption { label: "7501 - 8000 Sq. ft.", value: 14000 },
    AreaOption { label: "8001 - 8500 Sq. ft.", value: 14800 },
    AreaOption { label: "8500 - 9000 Sq. ft.", value: 15700 },
    AreaOption { label: "9001 - 9500 Sq. ft.", value: 16600 },
    AreaOption { label: "9501 - 10000 Sq. ft", value: 17500 },
    AreaOption { label: "10001 - 11000 Sq. ft", value: 19000 },
    AreaOption { label: "11001 - 12000 Sq. ft.", value: 21000 },
    AreaOption { label: "12001 - 13000 Sq. ft.", value: 23000 },
    AreaOption { label: "13001 - 14000 Sq. ft.", value: 25000 },
    AreaOption { label: "14001 - 15000 Sq. ft.", value: 27000 },
    AreaOption { label: "15001 - 16000 Sq. ft.", value: 29000 },
    AreaOption { label: "16001 - 17000 Sq. ft.", value: 31000 },
    AreaOption { label: "17001 - 18000 Sq. ft.", value: 32000 },
    AreaOption { label: "18001 - 19000 Sq. ft.", value: 34000 },
    AreaOption { label: "19001 - 20000 Sq. ft", value: 35000 },
];

pub const BUILDUP_AREA_OPTIONS: &[AreaOption] = &[
    AreaOption { label: "1000-1200 Sq. ft.", value: 2200 },
    AreaOption { label: "1201 - 1500 Sq. Ft.", value: 2650 },
    AreaOption { label: "1501 - 1800 Sq. ft.", value: 3100 },
    AreaOption { label: "1800 - 2200 Sq. ft.", value: 3700 },
    AreaOption { label: "2201 - 2600 Sq. ft.", value: 4200 },
    AreaOption { label: "2601 - 3000 Sq. ft.", value: 4900 },
    AreaOption { label: "3001 - 3500 Sq. ft.", value: 5600 },
    AreaOption { label: "3501 - 4000 Sq. ft.", value: 6300 },
    AreaOption { label: "4000 - 4500 Sq. ft.", value: 7000 },
    AreaOption { label: "4501 - 5000 Sq. ft.", value: 7700 },
    AreaOption { label: "5001 - 5500 Sq. ft.", value: 8500 },
    AreaOption { label: "5501 - 6000 Sq. ft.", value: 9250 },
    AreaOption { label: "6001 - 6500 Sq. ft.", value: 10000 },
    AreaOption { label: "6501 - 7000 Sq. ft.", value: 10750 },
    AreaOption { label: "7001 - 7500 Sq. ft.", value: 11550 },
    AreaOption { label: "7501 - 8000 Sq. ft.", value: 12350 },
    AreaOption { label: "8001 - 8500 Sq. ft.", value: 13100 },
    AreaOption { label: "8500 - 9000 Sq. ft.", value: 13900 },
    AreaOption { label: "9001 - 9500 Sq. ft.", value: 14700 },
    AreaOption { label: "9501 - 10000 Sq. ft", value: 15550 },
    AreaOption { label: "10001 - 11000 Sq. ft", value: 17000 },
    AreaOption { label: "11001 - 12000 Sq. ft.", value: 18500 },
    AreaOption { label: "12001 - 13000 Sq. ft.", value: 20000 },
    AreaOption { label: "13001 - 14000 Sq. ft.", value: 21750 },
    AreaOption { label: "14001 - 15000 Sq. ft.", value: 23300 },
    AreaOption { label: "15001 - 16000 Sq. ft.", value: 25000 },
    AreaOption { label: "16001 - 17000 Sq. ft.", value: 26550 },
    AreaOption { label: "17001 - 18000 Sq. ft.", value: 28200 },
    AreaOption { label: "18001 - 19000 Sq. ft.", value: 30000 },
    AreaOption { label: "19001 - 20000 Sq. ft", value: 31500 },
];

pub type BrandPaints = (&'static str, &'static [PaintOption]);
pub type CategoryPaints = (&'static str, &'static [BrandPaints]);

const fn p(value: &'static str, name: &'static str) -> PaintOption {
    PaintOption { value, name }
}

pub const PAINT_OPTIONS: &[CategoryPaints] = &[
    (
        "economical",
        &[
            (
                "asian-paints",
                &[
                    p("22", "Tractor Emulsion (Recommended)"),
                    p("23", "Tractor Emulsion Advance"),
                    p("23", "Tractor Emulsion Shyne"),
                    p("21", "Tractor Emulsion Sparc"),
                    p("21.5", "Tractor Emulsion Sparc Advance"),
                ],
            ),
            (
                "dulux",
                &[
                    p("22", "Promise Interior (Recommended)"),
                    p("21", "Promise Interior Smart Choice"),
                    p("23", "Dulux Promise Sheen Interior"),
                ],
            ),
            (
                "nerolac",
                &[
                    p("22", "Nerolac Beauty Smooth Finish"),
                    p("22", "Nerolac Beauty Little Master"),
                ],
            ),
            (
                "berger",
                &[
                    p("22", "Berger Bison Acrylic Emulsion"),
                    p("23", "Berger Bison Glow Acrylic Emulsion"),
                ],
            ),
            (
                "shalimar",
                &[
                    p("20", "Shalimar Master Acrylic Emulsion"),
                    p("20", "Shalimar No. 1 Silk Acrylic Emulsion"),
                ],
            ),
            (
                "jsw",
                &[
                    p("21", "Pixa Joy Classic Interiors"),
                    p("22", "Pixa Elegant Interiors"),
                    p("23", "Pixa Elegant Interiors Silk"),
                ],
            ),
        ],
    ),
    (
        "premium",
        &[
            (
                "asian-paints",
                &[
                    p("24", "Apcolite Premium Emulsion (Recommended)"),
                    p("24", "Apcolite Premium Satin Emulsion"),
                    p("26", "Apcolite All Protek"),
                    p("26", "Apcolite Advance Shyne"),
                    p("26", "Apcolite Advanced Heavy Duty Emulsion"),
                ],
            ),
            (
                "dulux",
                &[
                    p("24", "Dulux Super Cover (Recommended)"),
                    p("26", "Dulux Super Clean"),
                    p("27", "Dulux Super Clean 3in1 (Recommended)"),
                    p("26", "Dulux Super Cover Sheen"),
                ],
            ),
            (
                "nerolac",
                &[
                    p("24", "Nerolac Pearls Emulsion"),
                    p("24", "Nerolac Pearls Luster Finish"),
                    p("23", "Nerolac Beauty Silver"),
                    p("25", "Nerolac Beauty Gold"),
                    p("27", "Nerolac Beauty Gold Washable (Recommended)"),
                    p("26", "Nerolac Beauty Sheen"),
                    p("25", "Nerolac Beauty Ceiling Emulsion"),
                ],
            ),
            ("berger", &[p("24", "Berger Rangoli Total Care")]),
            ("shalimar", &[p("22", "Shalimar Superlac Advance")]),
            (
                "jsw",
                &[
                    p("24", "Aurus Regal Interiors Lustre"),
                    p("24", "Aurus Regal Interiors"),
                    p("26", "Aurus Regal Interiors Silk"),
                ],
            ),
        ],
    ),
    (
        "luxury",
        &[
            (
                "asian-paints",
                &[
                    p("34", "Royale Luxury Emulsion (Recommended)"),
                    p("35", "Royale Lustre"),
                    p("35", "Royale Advanced"),
                    p("34", "Royale Matt (Recommended)"),
                    p("36", "Royale Shyne Luxury Emulsion"),
                    p("38", "Royale Health Shield"),
                    p("40", "Royale Aspira (Recommended)"),
                    p("41", "Royale Glitz"),
                    p("38", "Royale Atmos"),
                ],
            ),
            (
                "dulux",
                &[
                    p("34", "Dulux Velvet Touch Pearl Glo (Recommended)"),
                    p("36", "Dulux Velvet Touch Diamond Glo"),
                    p("36", "Dulux Velvet Touch Platinum Glo (Recommended)"),
                    p("38", "Dulux Ambiance Velvet Touch Elastoglo (Recommended)"),
                    p("38", "Dulux Better Living Air Biobased"),
                ],
            ),
            (
                "nerolac",
                &[
                    p("34", "Impressions Kashmir (Recommended)"),
                    p("36", "Impression Ultra HD"),
                    p("36", "Nerolac Impressions HD (Recommended)"),
                    p("37", "Impression Ultra Fresh"),
                ],
            ),
            (
                "berger",
                &[
                    p("34", "Berger Easy Clean (Recommended)"),
                    p("36", "Berger Easy Clean Fresh"),
                    p("36", "Berger Silk Glow"),
                    p("38", "Berger Silk Glamor Soft Sheen (Recommended)"),
                    p("38", "Berger Silk Glamor High Sheen"),
                    p("38", "Berger Silk Breathe Easy"),
                ],
            ),
            (
                "shalimar",
                &[
                    p("31", "Shalimar Superlac Stay Clean"),
                    p("32", "Shalimar Signature"),
                ],
            ),
            (
                "jsw",
                &[
                    p("34", "Vogue Astoniq"),
                    p("38", "Halo Majestic Interiors - Silk (Recommended)"),
                    p("38", "Halo Majestic Interiors Shine"),
                ],
            ),
        ],
    ),
];

pub const BRAND_NAMES: &[(&str, &str)] = &[
    ("asian-paints", "Asian Paints"),
    ("dulux", "Dulux"),
    ("nerolac", "Nerolac"),
    ("berger", "Berger"),
    ("shalimar", "Shalimar"),
    ("jsw", "JSW"),
];

pub type FinishBrands = (&'static str, &'static [PaintOption]);
pub type FinishType = (&'static str, &'static [FinishBrands]);

/// Wood finishes: finish type, then brand, then the rate (rupees per sq.ft).
pub const WOOD_FINISH_OPTIONS: &[FinishType] = &[
    (
        "Lacquer",
        &[
            ("Wembley", &[p("80", "Wembley")]),
            ("Asian Paints", &[p("80", "Asian Paints")]),
        ],
    ),
    (
        "Melamine Matt",
        &[
            ("Jubliant", &[p("180", "Jubliant")]),
            ("Dulux", &[p("180", "Dulux")]),
            ("Asian Paints", &[p("180", "Asian Paints")]),
            ("Berger", &[p("180", "Berger")]),
        ],
    ),
    (
        "Melamine Gloss",
        &[
            ("Jubliant", &[p("180", "Jubliant")]),
            ("Dulux", &[p("180", "Dulux")]),
            ("Asian Paints", &[p("180", "Asian Paints")]),
            ("Berger", &[p("180", "Berger")]),
        ],
    ),
    (
        "PU Clear Matt",
        &[
            (
                "Asian Paints WoodTech PU Luxury Clear",
                &[p("320", "Asian Paints WoodTech PU Luxury Clear")],
            ),
            (
                "Asian Paints WoodTech Emporio PU Clear",
                &[p("350", "Asian Paints WoodTech Emporio PU Clear")],
            ),
            ("ICA Coatings", &[p("350", "ICA Coatings")]),
            ("Sirca Coatings", &[p("350", "Sirca Coatings")]),
            ("Woodver", &[p("300", "Woodver")]),
            ("Kapci", &[p("310", "Kapci")]),
            ("MRF", &[p("340", "MRF")]),
            ("Nerolac", &[p("330", "Nerolac")]),
            ("Berger", &[p("330", "Berger")]),
            ("Akzonobel", &[p("330", "Akzonobel")]),
            ("Sherim Willams", &[p("320", "Sherim Willams")]),
            ("Unico Sirca", &[p("300", "Unico Sirca")]),
        ],
    ),
    (
        "PU Clear High Gloss",
        &[
            (
                "Asian Paints Luxury WoodTech PU Clear",
                &[p("375", "Asian Paints Luxury WoodTech PU Clear")],
            ),
            (
                "Asian Paints WoodTech Emporio PU Clear",
                &[p("420", "Asian Paints WoodTech Emporio PU Clear")],
            ),
            ("ICA Coatings", &[p("420", "ICA Coatings")]),
            ("Sirca Coatings", &[p("420", "Sirca Coatings")]),
            ("Woodver", &[p("370", "Woodver")]),
            ("Kapci", &[p("380", "Kapci")]),
            ("MRF", &[p("400", "MRF")]),
            ("Nerolac", &[p("400", "Nerolac")]),
            ("Berger", &[p("400", "Berger")]),
            ("Akzonobel", &[p("400", "Akzonobel")]),
            ("Sherim Willams", &[p("400", "Sherim Willams")]),
            ("Unico Sirca", &[p("370", "Unico Sirca")]),
        ],
    ),
    (
        "Water Based Clear PU",
        &[
            ("Asian Paints", &[p("200", "Asian Paints")]),
            ("Dulux", &[p("200", "Dulux")]),
            ("MRF", &[p("200", "MRF")]),
        ],
    ),
    ("DUCO Paint", &[("AkzoNobel", &[p("200", "AkzoNobel")])]),
    (
        "PU Paint Matt (Pigment)",
        &[
            (
                "Asian Paints PU Palette Interior",
                &[p("340", "Asian Paints PU Palette Interior")],
            ),
            ("ICA Coatings", &[p("370", "ICA Coatings")]),
            ("Sirca Coatings", &[p("370", "Sirca Coatings")]),
            ("Woodver", &[p("330", "Woodver")]),
            ("Kapci", &[p("340", "Kapci")]),
            ("MRF", &[p("350", "MRF")]),
            ("Nerolac", &[p("350", "Nerolac")]),
            ("Berger", &[p("350", "Berger")]),
            ("Akzonobel", &[p("350", "Akzonobel")]),
            ("Sherim Willams", &[p("350", "Sherim Willams")]),
            (
                "Asian Paints EMPORIO PU Palette",
                &[p("370", "Asian Paints EMPORIO PU Palette")],
            ),
            ("UNICO Sirca", &[p("330", "UNICO Sirca")]),
        ],
    ),
    (
        "PU High Gloss Paint (Pigment)",
        &[
            (
                "Asian Paints PU Palette Interior",
                &[p("380", "Asian Paints PU Palette Interior")],
            ),
            ("ICA Coatings", &[p("420", "ICA Coatings")]),
            ("Sirca Coatings", &[p("420", "Sirca Coatings")]),
            ("Woodver", &[p("380", "Woodver")]),
            ("Kapci", &[p("390", "Kapci")]),
            ("MRF", &[p("395", "MRF")]),
            ("Nerolac", &[p("395", "Nerolac")]),
            ("Berger", &[p("395", "Berger")]),
            ("Akzonobel", &[p("395", "Akzonobel")]),
            ("Sherim Willams", &[p("395", "Sherim Willams")]),
            (
                "Asian Paints EMPORIO PU Palette",
                &[p("420", "Asian Paints EMPORIO PU Palette")],
            ),
            ("UNICO Sirca", &[p("380", "UNICO Sirca")]),
        ],
    ),
    (
        "Polyester Clear",
        &[
            ("ICA", &[p("550", "ICA")]),
            ("Sirca", &[p("550", "Sirca")]),
            ("Asian Paints", &[p("550", "Asian Paints")]),
        ],
    ),
    (
        "Polyester Pigment",
        &[
            ("ICA", &[p("650", "ICA")]),
            ("Sirca", &[p("650", "Sirca")]),
            ("Asian Paints", &[p("650", "Asian Paints")]),
        ],
    ),
    (
        "Enamel Paint (Satin or Gloss)",
        &[
            ("Asian Paints", &[p("30", "Asian Paints")]),
            ("Berger", &[p("30", "Berger")]),
            ("Dulux", &[p("30", "Dulux")]),
            ("Nerolac", &[p("30", "Nerolac")]),
            ("Shalimar", &[p("30", "Shalimar")]),
        ],
    ),
];

pub fn area_options(area_type: AreaType) -> &'static [AreaOption] {
    match area_type {
        AreaType::Carpet => CARPET_AREA_OPTIONS,
        AreaType::Buildup => BUILDUP_AREA_OPTIONS,
        AreaType::Painting => &[],
    }
}

/// Lower bound of the range whose value is `area`, e.g. carpet `2500 -> 1000`.
///
/// That lower bound doubles as the ceiling area when the ceiling is priced
/// with its own paint.
pub fn range_floor(area_type: AreaType, area: f64) -> Option<u32> {
    area_options(area_type)
        .iter()
        .find(|option| f64::from(option.value) == area)
        .and_then(|option| leading_number(option.label))
}

fn leading_number(label: &str) -> Option<u32> {
    label
        .split('-')
        .next()
        .map(str::trim)
        .and_then(|first| {
            let digits: String = first.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
}

pub fn paints_for(category: &str, brand: &str) -> &'static [PaintOption] {
    PAINT_OPTIONS
        .iter()
        .find(|(c, _)| *c == category)
        .and_then(|(_, brands)| brands.iter().find(|(b, _)| *b == brand))
        .map(|(_, paints)| *paints)
        .unwrap_or(&[])
}

/// Display name of the first paint in `category`/`brand` with rate `value`.
pub fn paint_name(category: &str, brand: &str, value: &str) -> &'static str {
    paints_for(category, brand)
        .iter()
        .find(|paint| paint.value == value)
        .map(|paint| paint.name)
        .unwrap_or("")
}

pub fn brand_name(slug: &str) -> &'static str {
    BRAND_NAMES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, name)| *name)
        .unwrap_or("")
}

pub fn wood_finish(finish_type: &str, brand: &str) -> Option<&'static PaintOption> {
    WOOD_FINISH_OPTIONS
        .iter()
        .find(|(t, _)| *t == finish_type)
        .and_then(|(_, brands)| brands.iter().find(|(b, _)| *b == brand))
        .and_then(|(_, options)| options.first())
}

/// Parses a rate string; anything unparsable or negative prices at zero.
pub fn parse_rate(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => 0.0,
    }
}
