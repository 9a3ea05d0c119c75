use super::{parse_id, ApiJson, AppState, Done};
use crate::auth::AuthUser;
use crate::catalog::sort_brands;
use crate::error::{AppError, Result};
use crate::storage::DUPLICATE_BRAND;
use crate::types::{Brand, BrandUpdate, NewBrand, ProductRef};
use crate::validation::{is_asset_url, is_blank, Checks};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

const NOT_FOUND: &str = "Brand not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/brands", get(list_brands).post(create_brand))
        .route(
            "/api/brands/:id",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
}

#[derive(Debug, Serialize)]
pub struct ProductCount {
    pub products: usize,
}

#[derive(Debug, Serialize)]
pub struct BrandSummary {
    #[serde(flatten)]
    pub brand: Brand,
    #[serde(rename = "_count")]
    pub count: ProductCount,
}

#[derive(Debug, Serialize)]
pub struct BrandDetail {
    #[serde(flatten)]
    pub brand: Brand,
    pub products: Vec<ProductRef>,
    #[serde(rename = "_count")]
    pub count: ProductCount,
}

/// Newest first, then stable-sorted into the storefront's brand order.
async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<BrandSummary>>> {
    let brands = state.storage.list_brands().await?;
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for product in state.storage.list_products().await? {
        *counts.entry(product.brand_id).or_default() += 1;
    }

    let mut summaries: Vec<BrandSummary> = brands
        .into_iter()
        .map(|brand| {
            let products = counts.get(&brand.id).copied().unwrap_or(0);
            BrandSummary {
                brand,
                count: ProductCount { products },
            }
        })
        .collect();
    sort_brands(&mut summaries, |s| s.brand.slug.as_str());
    Ok(Json(summaries))
}

#[instrument(skip_all)]
async fn create_brand(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewBrand>,
) -> Result<impl IntoResponse> {
    let missing = [&body.name, &body.slug, &body.logo, &body.description]
        .iter()
        .any(|v| is_blank(Some(v.as_str())));
    if missing {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    if state.storage.get_brand_by_slug(&body.slug).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_BRAND.to_string()));
    }

    let brand = Brand::from_new(body);
    state.storage.create_brand(&brand).await?;
    info!("Created brand {} ({})", brand.name, brand.slug);
    Ok((StatusCode::CREATED, Json(brand)))
}

async fn get_brand(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BrandDetail>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let brand = state
        .storage
        .get_brand(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    let products: Vec<ProductRef> = state
        .storage
        .list_products()
        .await?
        .iter()
        .filter(|p| p.brand_id == brand.id)
        .map(ProductRef::from)
        .collect();

    Ok(Json(BrandDetail {
        brand,
        count: ProductCount {
            products: products.len(),
        },
        products,
    }))
}

fn validate_update(update: &BrandUpdate) -> Result<()> {
    let mut checks = Checks::new();
    checks
        .non_blank(update.name.as_deref(), "Name is required")
        .non_blank(update.slug.as_deref(), "Slug is required")
        .slug(update.slug.as_deref())
        .non_blank(update.description.as_deref(), "Description is required");
    if let Some(logo) = update.logo.as_deref() {
        checks.check(
            is_asset_url(logo),
            "Logo must be a valid URL or a relative path starting with /",
        );
    }
    checks.finish()
}

#[instrument(skip(state, body))]
async fn update_brand(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BrandUpdate>,
) -> Result<Json<Brand>> {
    validate_update(&body)?;
    let id = parse_id(&id, NOT_FOUND)?;

    if let Some(slug) = body.slug.as_deref() {
        if let Some(existing) = state.storage.get_brand_by_slug(slug).await? {
            if existing.id != id {
                return Err(AppError::Conflict(DUPLICATE_BRAND.to_string()));
            }
        }
    }

    let mut brand = state
        .storage
        .get_brand(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    brand.apply(body);
    state.storage.update_brand(&brand).await?;
    info!("Updated brand {}", brand.slug);
    Ok(Json(brand))
}

async fn delete_brand(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Done>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let brand = state
        .storage
        .get_brand(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    state.storage.delete_brand(brand.id).await?;
    info!("Deleted brand {} and its products", brand.slug);
    Ok(Done::new("Brand deleted successfully"))
}
