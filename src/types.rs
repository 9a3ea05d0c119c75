//! Records persisted by [`crate::storage::Storage`] and the payloads the
//! admin API accepts for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type Prices = BTreeMap<String, f64>;
pub type Specifications = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn from_new(new: NewBrand) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            slug: new.slug,
            logo: new.logo,
            description: new.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: BrandUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(logo) = update.logo {
            self.logo = logo;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBrand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub sheen_level: String,
    pub surface_type: String,
    pub usage: String,
    pub image: String,
    pub banner_image: Option<String>,
    pub prices: Prices,
    pub size_unit: String,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub specifications: Specifications,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_new(new: NewProduct, brand_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            name: new.name,
            slug: new.slug,
            description: new.description,
            short_description: new.short_description,
            category: new.category,
            sub_category: new.sub_category.filter(|s| !s.is_empty()),
            sheen_level: new.sheen_level,
            surface_type: new.surface_type,
            usage: new.usage,
            image: new.image,
            banner_image: new.banner_image.filter(|s| !s.is_empty()),
            prices: new.prices,
            size_unit: new.size_unit.unwrap_or_else(|| "L".to_string()),
            colors: new.colors,
            features: new.features,
            specifications: new.specifications,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies every field present in `update`. Prices merge into the
    /// existing map instead of replacing it.
    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(brand_id) = update.brand_id {
            self.brand_id = brand_id;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(short_description) = update.short_description {
            self.short_description = short_description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(sub_category) = update.sub_category {
            self.sub_category = sub_category.filter(|s| !s.is_empty());
        }
        if let Some(sheen_level) = update.sheen_level {
            self.sheen_level = sheen_level;
        }
        if let Some(surface_type) = update.surface_type {
            self.surface_type = surface_type;
        }
        if let Some(usage) = update.usage {
            self.usage = usage;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(banner_image) = update.banner_image {
            self.banner_image = banner_image.filter(|s| !s.is_empty());
        }
        if let Some(prices) = update.prices {
            self.prices.extend(prices);
        }
        if let Some(size_unit) = update.size_unit {
            self.size_unit = size_unit;
        }
        if let Some(colors) = update.colors {
            self.colors = colors;
        }
        if let Some(features) = update.features {
            self.features = features;
        }
        if let Some(specifications) = update.specifications {
            self.specifications = specifications;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub brand_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub sheen_level: String,
    #[serde(default)]
    pub surface_type: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_prices")]
    pub prices: Prices,
    #[serde(default)]
    pub size_unit: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default)]
    pub related_product_ids: Vec<Uuid>,
    #[serde(default)]
    pub suggested_blog_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub sub_category: Option<Option<String>>,
    pub sheen_level: Option<String>,
    pub surface_type: Option<String>,
    pub usage: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub banner_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_optional_prices")]
    pub prices: Option<Prices>,
    pub size_unit: Option<String>,
    pub colors: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub specifications: Option<Specifications>,
    pub related_product_ids: Option<Vec<Uuid>>,
    /// Replaces the blogs suggested on the product page, in order.
    pub suggested_blog_ids: Option<Vec<Uuid>>,
}

/// Slim view of a product used inside other payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub read_time: Option<String>,
    pub categories: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub featured_order: Option<i64>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn from_new(new: NewBlogPost) -> Self {
        let now = Utc::now();
        let published = new.published.unwrap_or(false);
        Self {
            id: Uuid::new_v4(),
            slug: new.slug.unwrap_or_default(),
            title: new.title.unwrap_or_default(),
            excerpt: new.excerpt.unwrap_or_default(),
            content: new.content.unwrap_or_default(),
            author: new.author.unwrap_or_default(),
            cover_image: new.cover_image,
            read_time: new.read_time,
            categories: new.categories.unwrap_or_default(),
            published,
            published_at: published.then_some(now),
            meta_description: new.meta_description,
            meta_keywords: new.meta_keywords,
            featured_order: new.featured_order,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update. Publishing stamps `published_at` once;
    /// unpublishing clears it.
    pub fn apply(&mut self, update: NewBlogPost) {
        let now = Utc::now();
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(excerpt) = update.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if update.cover_image.is_some() {
            self.cover_image = update.cover_image;
        }
        if update.read_time.is_some() {
            self.read_time = update.read_time;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        match update.published {
            Some(true) if !self.published => {
                self.published = true;
                self.published_at = Some(now);
            }
            Some(false) => {
                self.published = false;
                self.published_at = None;
            }
            _ => {}
        }
        if update.meta_description.is_some() {
            self.meta_description = update.meta_description;
        }
        if update.meta_keywords.is_some() {
            self.meta_keywords = update.meta_keywords;
        }
        if update.featured_order.is_some() {
            self.featured_order = update.featured_order;
        }
        self.updated_at = now;
    }
}

/// Blog payload for both create and update; create requires the core fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<String>,
    pub categories: Option<Vec<String>>,
    pub published: Option<bool>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub featured_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedBlog {
    pub product_id: Uuid,
    pub blog_id: Uuid,
    pub order: i64,
}

/// Accepts `null` as "clear the field", distinct from an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// Numbers and numeric strings become prices; anything else, including
/// `"inf"` and `"NaN"`, becomes NaN so the handler can name the bad size.
fn price_value(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(f64::NAN)
}

fn price_map(raw: BTreeMap<String, serde_json::Value>) -> Prices {
    raw.into_iter()
        .map(|(size, value)| {
            let price = price_value(&value);
            (size, price)
        })
        .collect()
}

/// Admin forms post prices as either numbers or numeric strings.
fn lenient_prices<'de, D>(deserializer: D) -> Result<Prices, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(price_map(raw.unwrap_or_default()))
}

fn lenient_optional_prices<'de, D>(deserializer: D) -> Result<Option<Prices>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(price_map))
}

/// First size whose price is not a finite, non-negative number.
pub fn invalid_price(prices: &Prices) -> Option<&str> {
    prices
        .iter()
        .find(|(_, price)| !price.is_finite() || **price < 0.0)
        .map(|(size, _)| size.as_str())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(|n| Some(n as i64))
            .ok_or_else(|| serde::de::Error::custom("Featured order must be a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_product_accepts_string_prices() {
        let new: NewProduct = serde_json::from_value(json!({
            "brandId": Uuid::nil(),
            "name": "Royale",
            "slug": "royale",
            "prices": {"1L": "450", "4L": 1700.5}
        }))
        .unwrap();
        assert_eq!(new.prices.get("1L"), Some(&450.0));
        assert_eq!(new.prices.get("4L"), Some(&1700.5));
    }

    #[test]
    fn non_finite_prices_are_flagged() {
        let new: NewProduct = serde_json::from_value(json!({
            "name": "Royale",
            "slug": "royale",
            "prices": {"1L": "NaN", "4L": "inf", "10L": 900}
        }))
        .unwrap();
        assert!(new.prices["1L"].is_nan());
        assert!(new.prices["4L"].is_nan());
        assert_eq!(invalid_price(&new.prices), Some("1L"));

        let ok: Prices = [("1L".to_string(), 0.0), ("4L".to_string(), 10.5)]
            .into_iter()
            .collect();
        assert_eq!(invalid_price(&ok), None);
        let negative: Prices = [("20L".to_string(), -1.0)].into_iter().collect();
        assert_eq!(invalid_price(&negative), Some("20L"));
    }

    #[test]
    fn product_update_merges_prices_and_clears_nullable_fields() {
        let new: NewProduct = serde_json::from_value(json!({
            "name": "Royale",
            "slug": "royale",
            "subCategory": "Luxury",
            "prices": {"1L": 450, "4L": 1700}
        }))
        .unwrap();
        let mut product = Product::from_new(new, Uuid::new_v4());

        let update: ProductUpdate = serde_json::from_value(json!({
            "subCategory": null,
            "prices": {"4L": "1750"}
        }))
        .unwrap();
        assert_eq!(update.sub_category, Some(None));
        product.apply(update);

        assert_eq!(product.sub_category, None);
        assert_eq!(product.prices.get("1L"), Some(&450.0));
        assert_eq!(product.prices.get("4L"), Some(&1750.0));
        assert_eq!(product.size_unit, "L");
    }

    #[test]
    fn publishing_stamps_and_unpublishing_clears() {
        let mut post = BlogPost::from_new(NewBlogPost {
            slug: Some("primer-guide".into()),
            title: Some("Primer guide".into()),
            ..Default::default()
        });
        assert!(post.published_at.is_none());

        post.apply(NewBlogPost {
            published: Some(true),
            ..Default::default()
        });
        let first = post.published_at;
        assert!(first.is_some());

        post.apply(NewBlogPost {
            published: Some(true),
            ..Default::default()
        });
        assert_eq!(post.published_at, first);

        post.apply(NewBlogPost {
            published: Some(false),
            ..Default::default()
        });
        assert!(!post.published);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn featured_order_accepts_numeric_strings() {
        let post: NewBlogPost = serde_json::from_value(json!({"featuredOrder": "3"})).unwrap();
        assert_eq!(post.featured_order, Some(3));
        assert!(serde_json::from_value::<NewBlogPost>(json!({"featuredOrder": "x"})).is_err());
    }
}
