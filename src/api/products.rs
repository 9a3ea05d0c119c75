use super::{parse_id, positive_param, ApiJson, AppState, Done};
use crate::auth::AuthUser;
use crate::catalog::defaults::{product_defaults, ProductDefaults};
use crate::catalog::quantity::{has_size_in_range, QuantityRange};
use crate::catalog::{SHEEN_LEVELS, STANDARD_PRICE_KEYS};
use crate::error::{AppError, Result};
use crate::storage::{normalize_related, Storage, DUPLICATE_PRODUCT};
use crate::types::{invalid_price, Brand, NewProduct, Prices, Product, ProductUpdate, Specifications};
use crate::validation::{is_asset_url, is_blank, is_slug, Checks};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const NOT_FOUND: &str = "Product not found";
const BRAND_NOT_FOUND: &str = "Brand not found";
const DEFAULT_PAGE_SIZE: usize = 100;
const RELATED_OPTIONS_LIMIT: usize = 50;
const STOREFRONT_RELATED: usize = 4;
const STOREFRONT_BLOGS: usize = 3;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/by-slug", get(product_by_slug))
        .route("/api/products/related-options", get(related_options))
        .route("/api/products/defaults", get(defaults))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandBadge {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandName {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub brand: Option<BrandName>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub product_id: Uuid,
    pub related_product_id: Uuid,
    pub related_product: RelatedSummary,
}

/// A product with its brand and outgoing relations, as the admin sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub brand: Option<BrandBadge>,
    pub related_products: Vec<Relation>,
}

/// Brand lookups memoized for one request.
struct Brands<'a> {
    storage: &'a dyn Storage,
    cache: HashMap<Uuid, Option<Brand>>,
}

impl<'a> Brands<'a> {
    fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            cache: HashMap::new(),
        }
    }

    fn preload(storage: &'a dyn Storage, brands: Vec<Brand>) -> Self {
        let cache = brands.into_iter().map(|b| (b.id, Some(b))).collect();
        Self { storage, cache }
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Brand>> {
        if let Some(hit) = self.cache.get(&id) {
            return Ok(hit.clone());
        }
        let brand = self.storage.get_brand(id).await?;
        self.cache.insert(id, brand.clone());
        Ok(brand)
    }
}

async fn view(
    storage: &dyn Storage,
    brands: &mut Brands<'_>,
    product: Product,
    with_logo: bool,
) -> Result<ProductView> {
    let brand = brands.get(product.brand_id).await?.map(|b| BrandBadge {
        id: b.id,
        name: b.name,
        slug: b.slug,
        logo: with_logo.then_some(b.logo),
    });

    let mut related_products = Vec::new();
    for related_id in storage.related_product_ids(product.id).await? {
        let Some(related) = storage.get_product(related_id).await? else {
            continue;
        };
        let brand = brands
            .get(related.brand_id)
            .await?
            .map(|b| BrandName { id: b.id, name: b.name });
        related_products.push(Relation {
            product_id: product.id,
            related_product_id: related.id,
            related_product: RelatedSummary {
                id: related.id,
                name: related.name,
                slug: related.slug,
                brand,
            },
        });
    }

    Ok(ProductView {
        product,
        brand,
        related_products,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub brand_id: Option<String>,
    pub search: Option<String>,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }

    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.page.saturating_sub(1).saturating_mul(self.limit))
            .take(self.limit)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub data: Vec<ProductView>,
    pub pagination: Pagination,
}

fn matches_search(product: &Product, brand_name: &str, needle: &str) -> bool {
    [
        product.name.as_str(),
        product.description.as_str(),
        brand_name,
        product.category.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Filters run before paging so `total` counts what the filters matched.
#[instrument(skip(state))]
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductPage>> {
    let page = positive_param(query.page.as_deref(), 1);
    let limit = positive_param(query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let storage = state.storage.as_ref();

    let brand_list = storage.list_brands().await?;
    let brand_names: HashMap<Uuid, String> =
        brand_list.iter().map(|b| (b.id, b.name.clone())).collect();
    let brand_filter = query.brand_id.as_deref().filter(|v| !v.is_empty());
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let quantity = query.quantity.as_deref().and_then(QuantityRange::parse);

    let matched: Vec<Product> = storage
        .list_products()
        .await?
        .into_iter()
        .filter(|p| brand_filter.map_or(true, |b| p.brand_id.to_string() == b))
        .filter(|p| {
            needle.as_deref().map_or(true, |n| {
                let brand = brand_names.get(&p.brand_id).map(String::as_str).unwrap_or("");
                matches_search(p, brand, n)
            })
        })
        .filter(|p| quantity.map_or(true, |q| has_size_in_range(&p.prices, q)))
        .collect();

    let pagination = Pagination::new(page, limit, matched.len());
    let mut brands = Brands::preload(storage, brand_list);
    let mut data = Vec::new();
    for product in pagination.window(matched) {
        data.push(view(storage, &mut brands, product, false).await?);
    }
    debug!("Listing {} of {} products", data.len(), pagination.total);
    Ok(Json(ProductPage { data, pagination }))
}

#[instrument(skip_all)]
async fn create_product(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiJson(mut body): ApiJson<NewProduct>,
) -> Result<impl IntoResponse> {
    let brand_id = match body.brand_id {
        Some(id) if !is_blank(Some(body.name.as_str())) && !is_blank(Some(body.slug.as_str())) => id,
        _ => return Err(AppError::BadRequest("Missing required fields".to_string())),
    };
    if let Some(size) = invalid_price(&body.prices) {
        return Err(price_error(size));
    }
    let storage = state.storage.as_ref();
    if storage.get_product_by_slug(brand_id, &body.slug).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_PRODUCT.to_string()));
    }

    let related = std::mem::take(&mut body.related_product_ids);
    let suggested = std::mem::take(&mut body.suggested_blog_ids);
    let product = Product::from_new(body, brand_id);
    storage.create_product(&product).await?;
    let related = normalize_related(product.id, &related);
    if !related.is_empty() {
        storage.set_related_products(product.id, &related).await?;
    }
    if !suggested.is_empty() {
        storage.set_suggested_blogs(product.id, &suggested).await?;
    }
    info!("Created product {} ({} related)", product.slug, related.len());

    let mut brands = Brands::new(storage);
    let view = view(storage, &mut brands, product, false).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let storage = state.storage.as_ref();
    let product = storage
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    let mut brands = Brands::new(storage);
    Ok(Json(view(storage, &mut brands, product, true).await?))
}

fn validate_update(update: &ProductUpdate) -> Result<()> {
    let mut checks = Checks::new();
    if let Some(slug) = update.slug.as_deref() {
        checks.check(is_slug(slug), "slug must be lowercase alphanumeric with hyphens");
    }
    if let Some(sheen) = update.sheen_level.as_deref() {
        checks.check(
            SHEEN_LEVELS.contains(&sheen),
            format!("sheenLevel must be one of: {}", SHEEN_LEVELS.join(", ")),
        );
    }
    if let Some(image) = update.image.as_deref() {
        checks.check(
            image.trim().is_empty() || is_asset_url(image),
            "image must be a valid URL or path starting with /",
        );
    }
    checks.finish()
}

fn price_error(size: &str) -> AppError {
    AppError::BadRequest(format!(
        "Invalid price for {size}. Must be a non-negative number."
    ))
}

/// Keeps the admin-editable sizes and rejects negative or unparsable values.
pub fn standard_prices(prices: &Prices) -> Result<Option<Prices>> {
    let mut out = Prices::new();
    for key in STANDARD_PRICE_KEYS {
        if let Some(&price) = prices.get(*key) {
            if !price.is_finite() || price < 0.0 {
                return Err(price_error(key));
            }
            out.insert((*key).to_string(), price);
        }
    }
    Ok((!out.is_empty()).then_some(out))
}

#[instrument(skip(state, body))]
async fn update_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(mut body): ApiJson<ProductUpdate>,
) -> Result<Json<ProductView>> {
    validate_update(&body)?;
    body.prices = match body.prices.take() {
        Some(prices) => standard_prices(&prices)?,
        None => None,
    };

    let id = parse_id(&id, NOT_FOUND)?;
    let storage = state.storage.as_ref();
    let mut product = storage
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    if let Some(brand_id) = body.brand_id {
        if storage.get_brand(brand_id).await?.is_none() {
            return Err(AppError::NotFound(BRAND_NOT_FOUND.to_string()));
        }
    }
    if let Some(slug) = body.slug.as_deref() {
        let brand_id = body.brand_id.unwrap_or(product.brand_id);
        if let Some(existing) = storage.get_product_by_slug(brand_id, slug).await? {
            if existing.id != id {
                return Err(AppError::Conflict(DUPLICATE_PRODUCT.to_string()));
            }
        }
    }

    let related = body.related_product_ids.take();
    let suggested = body.suggested_blog_ids.take();
    product.apply(body);
    storage.update_product(&product).await?;
    if let Some(related) = related {
        storage
            .set_related_products(id, &normalize_related(id, &related))
            .await?;
    }
    if let Some(suggested) = suggested {
        storage.set_suggested_blogs(id, &suggested).await?;
    }
    info!("Updated product {}", product.slug);

    let mut brands = Brands::new(storage);
    Ok(Json(view(storage, &mut brands, product, false).await?))
}

async fn delete_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Done>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let product = state
        .storage
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    state.storage.delete_product(product.id).await?;
    info!("Deleted product {}", product.slug);
    Ok(Done::new("Product deleted successfully"))
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub brand: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontBlog {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub read_time: Option<String>,
    pub categories: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProduct {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub brand_id: Uuid,
    pub brand: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub sheen_level: String,
    pub surface_type: String,
    pub usage: String,
    pub image: String,
    pub banner_image: Option<String>,
    pub size_unit: String,
    pub prices: Prices,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub specifications: Specifications,
    pub suggested_blogs: Vec<StorefrontBlog>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontRelated {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub brand_id: Uuid,
    pub brand: String,
    pub image: String,
    pub prices: Prices,
    pub short_description: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub sheen_level: String,
    pub description: String,
    pub surface_type: String,
    pub usage: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontPage {
    pub product: StorefrontProduct,
    pub related_products: Vec<StorefrontRelated>,
    pub brand_slug: String,
}

/// Public product page payload, looked up by brand slug and product slug.
#[instrument(skip(state))]
async fn product_by_slug(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
) -> Result<Json<StorefrontPage>> {
    let (brand_slug, slug) = match (query.brand, query.slug) {
        (Some(b), Some(s)) if !b.is_empty() && !s.is_empty() => (b, s),
        _ => {
            return Err(AppError::BadRequest(
                "Brand and slug query parameters are required".to_string(),
            ))
        }
    };
    let storage = state.storage.as_ref();
    let brand = storage
        .get_brand_by_slug(&brand_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(BRAND_NOT_FOUND.to_string()))?;
    let product = storage
        .get_product_by_slug(brand.id, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    let mut brands = Brands::new(storage);
    let mut related_products = Vec::new();
    for related_id in storage
        .related_product_ids(product.id)
        .await?
        .into_iter()
        .take(STOREFRONT_RELATED)
    {
        let Some(related) = storage.get_product(related_id).await? else {
            continue;
        };
        let brand_name = brands
            .get(related.brand_id)
            .await?
            .map(|b| b.name)
            .unwrap_or_default();
        related_products.push(StorefrontRelated {
            id: related.id,
            name: related.name,
            slug: related.slug,
            brand_id: related.brand_id,
            brand: brand_name,
            image: related.image,
            prices: related.prices,
            short_description: related.short_description,
            category: related.category,
            sub_category: related.sub_category,
            sheen_level: related.sheen_level,
            description: related.description,
            surface_type: related.surface_type,
            usage: related.usage,
        });
    }

    let mut suggested_blogs = Vec::new();
    for suggestion in storage
        .suggested_blogs(product.id)
        .await?
        .into_iter()
        .take(STOREFRONT_BLOGS)
    {
        match storage.get_blog(suggestion.blog_id).await? {
            Some(blog) if blog.published => suggested_blogs.push(StorefrontBlog {
                id: blog.id,
                slug: blog.slug,
                title: blog.title,
                excerpt: blog.excerpt,
                cover_image: blog.cover_image,
                author: blog.author,
                read_time: blog.read_time,
                categories: blog.categories,
                published_at: blog.published_at,
            }),
            _ => {}
        }
    }

    Ok(Json(StorefrontPage {
        product: StorefrontProduct {
            id: product.id,
            name: product.name,
            slug: product.slug,
            brand_id: product.brand_id,
            brand: brand.name,
            description: product.description,
            short_description: product.short_description,
            category: product.category,
            sub_category: product.sub_category,
            sheen_level: product.sheen_level,
            surface_type: product.surface_type,
            usage: product.usage,
            image: product.image,
            banner_image: product.banner_image,
            size_unit: product.size_unit,
            prices: product.prices,
            colors: product.colors,
            features: product.features,
            specifications: product.specifications,
            suggested_blogs,
        },
        related_products,
        brand_slug,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedOptionsQuery {
    pub exclude_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RelatedOption {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub brand: Option<BrandName>,
}

async fn related_options(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RelatedOptionsQuery>,
) -> Result<Json<Vec<RelatedOption>>> {
    let storage = state.storage.as_ref();
    let needle = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());
    let exclude = query.exclude_id.as_deref().filter(|s| !s.is_empty());

    let mut products: Vec<Product> = storage
        .list_products()
        .await?
        .into_iter()
        .filter(|p| exclude.map_or(true, |e| p.id.to_string() != e))
        .filter(|p| {
            needle
                .as_deref()
                .map_or(true, |n| p.name.to_lowercase().contains(n))
        })
        .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products.truncate(RELATED_OPTIONS_LIMIT);

    let mut brands = Brands::preload(storage, storage.list_brands().await?);
    let mut options = Vec::with_capacity(products.len());
    for product in products {
        let brand = brands
            .get(product.brand_id)
            .await?
            .map(|b| BrandName { id: b.id, name: b.name });
        options.push(RelatedOption {
            id: product.id,
            name: product.name,
            slug: product.slug,
            brand,
        });
    }
    Ok(Json(options))
}

async fn defaults(State(state): State<AppState>) -> Result<Json<ProductDefaults>> {
    let products = state.storage.list_products().await?;
    Ok(Json(product_defaults(&products)))
}
