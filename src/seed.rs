//! Idempotent bootstrap of the admin account and the sample catalog.

use crate::auth::hash_password;
use crate::config::SeedConfig;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{
    Brand, BrandUpdate, NewBrand, NewProduct, Prices, Product, ProductUpdate, Specifications, User,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const CATALOG: &str = include_str!("../data/seed_catalog.json");
const MAX_SEEDED_RELATIONS: usize = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCatalog {
    pub brands: Vec<SeedBrand>,
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBrand {
    pub slug: String,
    pub name: String,
    pub logo: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProduct {
    /// Slug of the owning brand.
    pub brand: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub sheen_level: String,
    pub surface_type: String,
    pub usage: String,
    pub image: String,
    pub prices: Prices,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: Specifications,
}

impl SeedCatalog {
    pub fn builtin() -> Result<Self> {
        Ok(serde_json::from_str(CATALOG)?)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub brands: usize,
    pub products: usize,
    pub relations: usize,
}

/// Creates the admin or resets its password when it already exists.
pub async fn upsert_admin(storage: &dyn Storage, email: &str, password: &str) -> Result<bool> {
    let password_hash = hash_password(password)?;
    match storage.get_user_by_email(email).await? {
        Some(mut user) => {
            user.password_hash = password_hash;
            user.updated_at = chrono::Utc::now();
            storage.update_user(&user).await?;
            info!("Admin user already exists, password reset: {}", email);
            Ok(false)
        }
        None => {
            storage.create_user(&User::new(email, password_hash)).await?;
            info!("Admin user created: {}", email);
            Ok(true)
        }
    }
}

async fn upsert_brand(storage: &dyn Storage, seed: &SeedBrand) -> Result<Brand> {
    match storage.get_brand_by_slug(&seed.slug).await? {
        Some(mut brand) => {
            brand.apply(BrandUpdate {
                name: Some(seed.name.clone()),
                slug: None,
                logo: Some(seed.logo.clone()),
                description: Some(seed.description.clone()),
            });
            storage.update_brand(&brand).await?;
            Ok(brand)
        }
        None => {
            let brand = Brand::from_new(NewBrand {
                name: seed.name.clone(),
                slug: seed.slug.clone(),
                logo: seed.logo.clone(),
                description: seed.description.clone(),
            });
            storage.create_brand(&brand).await?;
            Ok(brand)
        }
    }
}

async fn upsert_product(storage: &dyn Storage, brand_id: Uuid, seed: &SeedProduct) -> Result<Product> {
    match storage.get_product_by_slug(brand_id, &seed.slug).await? {
        Some(mut product) => {
            product.apply(ProductUpdate {
                name: Some(seed.name.clone()),
                description: Some(seed.description.clone()),
                short_description: Some(seed.short_description.clone()),
                category: Some(seed.category.clone()),
                sheen_level: Some(seed.sheen_level.clone()),
                surface_type: Some(seed.surface_type.clone()),
                usage: Some(seed.usage.clone()),
                image: Some(seed.image.clone()),
                prices: Some(seed.prices.clone()),
                colors: Some(seed.colors.clone()),
                features: Some(seed.features.clone()),
                specifications: Some(seed.specifications.clone()),
                ..ProductUpdate::default()
            });
            storage.update_product(&product).await?;
            Ok(product)
        }
        None => {
            let product = Product::from_new(
                NewProduct {
                    brand_id: Some(brand_id),
                    name: seed.name.clone(),
                    slug: seed.slug.clone(),
                    description: seed.description.clone(),
                    short_description: seed.short_description.clone(),
                    category: seed.category.clone(),
                    sheen_level: seed.sheen_level.clone(),
                    surface_type: seed.surface_type.clone(),
                    usage: seed.usage.clone(),
                    image: seed.image.clone(),
                    prices: seed.prices.clone(),
                    colors: seed.colors.clone(),
                    features: seed.features.clone(),
                    specifications: seed.specifications.clone(),
                    ..NewProduct::default()
                },
                brand_id,
            );
            storage.create_product(&product).await?;
            Ok(product)
        }
    }
}

/// Up to four other seeded products sharing the brand or sheen level, in
/// catalog order.
pub fn seeded_relations(products: &[SeedProduct], index: usize) -> Vec<usize> {
    let current = &products[index];
    products
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            *i != index && (p.brand == current.brand || p.sheen_level == current.sheen_level)
        })
        .map(|(i, _)| i)
        .take(MAX_SEEDED_RELATIONS)
        .collect()
}

/// Failures on single brands or products are logged and skipped.
#[instrument(skip_all)]
pub async fn seed_catalog(storage: &dyn Storage, catalog: &SeedCatalog) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let mut brand_ids: HashMap<&str, Uuid> = HashMap::new();
    for seed in &catalog.brands {
        match upsert_brand(storage, seed).await {
            Ok(brand) => {
                brand_ids.insert(seed.slug.as_str(), brand.id);
                report.brands += 1;
            }
            Err(e) => error!("Error seeding brand {}: {}", seed.name, e),
        }
    }
    info!("Created/updated {} brands", report.brands);

    let mut product_ids: Vec<Option<Uuid>> = Vec::with_capacity(catalog.products.len());
    for seed in &catalog.products {
        let Some(&brand_id) = brand_ids.get(seed.brand.as_str()) else {
            warn!("Brand not found for product {}: {}", seed.name, seed.brand);
            product_ids.push(None);
            continue;
        };
        match upsert_product(storage, brand_id, seed).await {
            Ok(product) => {
                product_ids.push(Some(product.id));
                report.products += 1;
            }
            Err(e) => {
                error!("Error seeding product {}: {}", seed.name, e);
                product_ids.push(None);
            }
        }
    }
    info!("Created/updated {} products", report.products);

    for (index, product_id) in product_ids.iter().enumerate() {
        let Some(product_id) = *product_id else {
            continue;
        };
        let wanted: Vec<Uuid> = seeded_relations(&catalog.products, index)
            .into_iter()
            .filter_map(|i| product_ids[i])
            .collect();
        let mut related = storage.related_product_ids(product_id).await?;
        let before = related.len();
        for id in wanted {
            if !related.contains(&id) {
                related.push(id);
            }
        }
        if related.len() > before {
            storage.set_related_products(product_id, &related).await?;
            report.relations += related.len() - before;
        }
    }
    info!("Created {} product relationships", report.relations);

    Ok(report)
}

pub async fn run(storage: &dyn Storage, config: &SeedConfig) -> Result<SeedReport> {
    let admin_created = upsert_admin(storage, &config.admin_email, &config.admin_password).await?;
    let catalog = SeedCatalog::builtin()?;
    let mut report = seed_catalog(storage, &catalog).await?;
    report.admin_created = admin_created;
    info!("Seed completed: {:?}", report);
    Ok(report)
}
