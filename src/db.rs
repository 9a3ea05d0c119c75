//! SQLite-backed [`Storage`].
//!
//! Maps, lists and key/value specs live in JSON text columns. Timestamps are
//! RFC 3339 with nanosecond precision so lexical order matches time order.

use crate::error::{AppError, Result};
use crate::storage::{
    normalize_related, Storage, DUPLICATE_BLOG, DUPLICATE_BRAND, DUPLICATE_PRODUCT,
    DUPLICATE_USER,
};
use crate::types::{BlogPost, Brand, Product, SuggestedBlog, User};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS users (
        id             TEXT PRIMARY KEY,
        email          TEXT NOT NULL UNIQUE,
        password_hash  TEXT NOT NULL,
        created_at     TEXT NOT NULL,
        updated_at     TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS brands (
        id           TEXT PRIMARY KEY,
        name         TEXT NOT NULL,
        slug         TEXT NOT NULL UNIQUE,
        logo         TEXT NOT NULL,
        description  TEXT NOT NULL,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS products (
        id                 TEXT PRIMARY KEY,
        brand_id           TEXT NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
        name               TEXT NOT NULL,
        slug               TEXT NOT NULL,
        description        TEXT NOT NULL,
        short_description  TEXT NOT NULL,
        category           TEXT NOT NULL,
        sub_category       TEXT,
        sheen_level        TEXT NOT NULL,
        surface_type       TEXT NOT NULL,
        usage              TEXT NOT NULL,
        image              TEXT NOT NULL,
        banner_image       TEXT,
        prices             TEXT NOT NULL,
        size_unit          TEXT NOT NULL,
        colors             TEXT NOT NULL,
        features           TEXT NOT NULL,
        specifications     TEXT NOT NULL,
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL,
        UNIQUE (brand_id, slug)
    );
    CREATE TABLE IF NOT EXISTS product_relations (
        product_id          TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        related_product_id  TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        position            INTEGER NOT NULL,
        PRIMARY KEY (product_id, related_product_id),
        CHECK (product_id <> related_product_id)
    );
    CREATE TABLE IF NOT EXISTS blog_posts (
        id                TEXT PRIMARY KEY,
        slug              TEXT NOT NULL UNIQUE,
        title             TEXT NOT NULL,
        excerpt           TEXT NOT NULL,
        content           TEXT NOT NULL,
        author            TEXT NOT NULL,
        cover_image       TEXT,
        read_time         TEXT,
        categories        TEXT NOT NULL,
        published         INTEGER NOT NULL,
        published_at      TEXT,
        meta_description  TEXT,
        meta_keywords     TEXT,
        featured_order    INTEGER,
        view_count        INTEGER NOT NULL DEFAULT 0,
        created_at        TEXT NOT NULL,
        updated_at        TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS suggested_blogs (
        product_id  TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        blog_id     TEXT NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
        position    INTEGER NOT NULL,
        PRIMARY KEY (product_id, blog_id)
    );
"#;

const PRODUCT_COLUMNS: &str = "id, brand_id, name, slug, description, short_description, \
    category, sub_category, sheen_level, surface_type, usage, image, banner_image, prices, \
    size_unit, colors, features, specifications, created_at, updated_at";

const BLOG_COLUMNS: &str = "id, slug, title, excerpt, content, author, cover_image, read_time, \
    categories, published, published_at, meta_description, meta_keywords, featured_order, \
    view_count, created_at, updated_at";

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }
}

fn ts(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn time_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn optional_time_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

fn json_col<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// Turns a UNIQUE violation into a 409 with `message`.
fn unique_conflict(err: rusqlite::Error, message: &str) -> AppError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: time_col(row, 3)?,
        updated_at: time_col(row, 4)?,
    })
}

fn brand_from_row(row: &Row<'_>) -> rusqlite::Result<Brand> {
    Ok(Brand {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        logo: row.get(3)?,
        description: row.get(4)?,
        created_at: time_col(row, 5)?,
        updated_at: time_col(row, 6)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: uuid_col(row, 0)?,
        brand_id: uuid_col(row, 1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        short_description: row.get(5)?,
        category: row.get(6)?,
        sub_category: row.get(7)?,
        sheen_level: row.get(8)?,
        surface_type: row.get(9)?,
        usage: row.get(10)?,
        image: row.get(11)?,
        banner_image: row.get(12)?,
        prices: json_col(row, 13)?,
        size_unit: row.get(14)?,
        colors: json_col(row, 15)?,
        features: json_col(row, 16)?,
        specifications: json_col(row, 17)?,
        created_at: time_col(row, 18)?,
        updated_at: time_col(row, 19)?,
    })
}

fn blog_from_row(row: &Row<'_>) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: uuid_col(row, 0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        author: row.get(5)?,
        cover_image: row.get(6)?,
        read_time: row.get(7)?,
        categories: json_col(row, 8)?,
        published: row.get(9)?,
        published_at: optional_time_col(row, 10)?,
        meta_description: row.get(11)?,
        meta_keywords: row.get(12)?,
        featured_order: row.get(13)?,
        view_count: row.get(14)?,
        created_at: time_col(row, 15)?,
        updated_at: time_col(row, 16)?,
    })
}

fn brand_exists(conn: &Connection, id: Uuid) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM brands WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.password_hash,
                ts(&user.created_at),
                ts(&user.updated_at)
            ],
        )
        .map_err(|e| unique_conflict(e, DUPLICATE_USER))?;
        debug!("Created user: {} with id {}", user.email, user.id);
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ?1",
                params![id.to_string()],
                user_from_row,
            )
            .optional()?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = ?1",
                params![email],
                user_from_row,
            )
            .optional()?)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE users SET email = ?2, password_hash = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    user.id.to_string(),
                    user.email,
                    user.password_hash,
                    ts(&user.updated_at)
                ],
            )
            .map_err(|e| unique_conflict(e, DUPLICATE_USER))?;
        if changed == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn create_brand(&self, brand: &Brand) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO brands (id, name, slug, logo, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                brand.id.to_string(),
                brand.name,
                brand.slug,
                brand.logo,
                brand.description,
                ts(&brand.created_at),
                ts(&brand.updated_at)
            ],
        )
        .map_err(|e| unique_conflict(e, DUPLICATE_BRAND))?;
        debug!("Created brand: {} with id {}", brand.name, brand.id);
        Ok(())
    }

    async fn get_brand(&self, id: Uuid) -> Result<Option<Brand>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, name, slug, logo, description, created_at, updated_at
                 FROM brands WHERE id = ?1",
                params![id.to_string()],
                brand_from_row,
            )
            .optional()?)
    }

    async fn get_brand_by_slug(&self, slug: &str) -> Result<Option<Brand>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, name, slug, logo, description, created_at, updated_at
                 FROM brands WHERE slug = ?1",
                params![slug],
                brand_from_row,
            )
            .optional()?)
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, slug, logo, description, created_at, updated_at
             FROM brands ORDER BY created_at DESC",
        )?;
        let brands = stmt
            .query_map([], brand_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(brands)
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE brands SET name = ?2, slug = ?3, logo = ?4, description = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    brand.id.to_string(),
                    brand.name,
                    brand.slug,
                    brand.logo,
                    brand.description,
                    ts(&brand.updated_at)
                ],
            )
            .map_err(|e| unique_conflict(e, DUPLICATE_BRAND))?;
        if changed == 0 {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        Ok(())
    }

    async fn delete_brand(&self, id: Uuid) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM brands WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        debug!("Deleted brand {}", id);
        Ok(())
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        let conn = self.lock()?;
        if !brand_exists(&conn, product.brand_id)? {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        conn.execute(
            &format!(
                "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
            ),
            params![
                product.id.to_string(),
                product.brand_id.to_string(),
                product.name,
                product.slug,
                product.description,
                product.short_description,
                product.category,
                product.sub_category,
                product.sheen_level,
                product.surface_type,
                product.usage,
                product.image,
                product.banner_image,
                serde_json::to_string(&product.prices)?,
                product.size_unit,
                serde_json::to_string(&product.colors)?,
                serde_json::to_string(&product.features)?,
                serde_json::to_string(&product.specifications)?,
                ts(&product.created_at),
                ts(&product.updated_at)
            ],
        )
        .map_err(|e| unique_conflict(e, DUPLICATE_PRODUCT))?;
        debug!("Created product: {} with id {}", product.name, product.id);
        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id.to_string()],
                product_from_row,
            )
            .optional()?)
    }

    async fn get_product_by_slug(&self, brand_id: Uuid, slug: &str) -> Result<Option<Product>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE brand_id = ?1 AND slug = ?2"),
                params![brand_id.to_string(), slug],
                product_from_row,
            )
            .optional()?)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let conn = self.lock()?;
        if !brand_exists(&conn, product.brand_id)? {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        let changed = conn
            .execute(
                "UPDATE products SET brand_id = ?2, name = ?3, slug = ?4, description = ?5,
                    short_description = ?6, category = ?7, sub_category = ?8, sheen_level = ?9,
                    surface_type = ?10, usage = ?11, image = ?12, banner_image = ?13, prices = ?14,
                    size_unit = ?15, colors = ?16, features = ?17, specifications = ?18,
                    updated_at = ?19
                 WHERE id = ?1",
                params![
                    product.id.to_string(),
                    product.brand_id.to_string(),
                    product.name,
                    product.slug,
                    product.description,
                    product.short_description,
                    product.category,
                    product.sub_category,
                    product.sheen_level,
                    product.surface_type,
                    product.usage,
                    product.image,
                    product.banner_image,
                    serde_json::to_string(&product.prices)?,
                    product.size_unit,
                    serde_json::to_string(&product.colors)?,
                    serde_json::to_string(&product.features)?,
                    serde_json::to_string(&product.specifications)?,
                    ts(&product.updated_at)
                ],
            )
            .map_err(|e| unique_conflict(e, DUPLICATE_PRODUCT))?;
        if changed == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn set_related_products(&self, product_id: Uuid, related: &[Uuid]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM products WHERE id = ?1",
                params![product_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        tx.execute(
            "DELETE FROM product_relations WHERE product_id = ?1",
            params![product_id.to_string()],
        )?;
        let mut kept = 0usize;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO product_relations (product_id, related_product_id, position)
                 SELECT ?1, id, ?3 FROM products WHERE id = ?2",
            )?;
            for related_id in normalize_related(product_id, related) {
                kept += insert.execute(params![
                    product_id.to_string(),
                    related_id.to_string(),
                    kept as i64
                ])?;
            }
        }
        tx.commit()?;
        debug!("Product {} now has {} related products", product_id, kept);
        Ok(())
    }

    async fn related_product_ids(&self, product_id: Uuid) -> Result<Vec<Uuid>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT related_product_id FROM product_relations
             WHERE product_id = ?1 ORDER BY position",
        )?;
        let ids = stmt
            .query_map(params![product_id.to_string()], |row| uuid_col(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    async fn create_blog(&self, blog: &BlogPost) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO blog_posts ({BLOG_COLUMNS}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
            ),
            params![
                blog.id.to_string(),
                blog.slug,
                blog.title,
                blog.excerpt,
                blog.content,
                blog.author,
                blog.cover_image,
                blog.read_time,
                serde_json::to_string(&blog.categories)?,
                blog.published,
                blog.published_at.as_ref().map(ts),
                blog.meta_description,
                blog.meta_keywords,
                blog.featured_order,
                blog.view_count,
                ts(&blog.created_at),
                ts(&blog.updated_at)
            ],
        )
        .map_err(|e| unique_conflict(e, DUPLICATE_BLOG))?;
        debug!("Created blog: {} with id {}", blog.slug, blog.id);
        Ok(())
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE id = ?1"),
                params![id.to_string()],
                blog_from_row,
            )
            .optional()?)
    }

    async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE slug = ?1"),
                params![slug],
                blog_from_row,
            )
            .optional()?)
    }

    async fn list_blogs(&self) -> Result<Vec<BlogPost>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BLOG_COLUMNS} FROM blog_posts ORDER BY created_at DESC"
        ))?;
        let blogs = stmt
            .query_map([], blog_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(blogs)
    }

    async fn update_blog(&self, blog: &BlogPost) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE blog_posts SET slug = ?2, title = ?3, excerpt = ?4, content = ?5,
                    author = ?6, cover_image = ?7, read_time = ?8, categories = ?9,
                    published = ?10, published_at = ?11, meta_description = ?12,
                    meta_keywords = ?13, featured_order = ?14, updated_at = ?15
                 WHERE id = ?1",
                params![
                    blog.id.to_string(),
                    blog.slug,
                    blog.title,
                    blog.excerpt,
                    blog.content,
                    blog.author,
                    blog.cover_image,
                    blog.read_time,
                    serde_json::to_string(&blog.categories)?,
                    blog.published,
                    blog.published_at.as_ref().map(ts),
                    blog.meta_description,
                    blog.meta_keywords,
                    blog.featured_order,
                    ts(&blog.updated_at)
                ],
            )
            .map_err(|e| unique_conflict(e, DUPLICATE_BLOG))?;
        if changed == 0 {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }
        Ok(())
    }

    async fn delete_blog(&self, id: Uuid) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM blog_posts WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }
        Ok(())
    }

    async fn increment_blog_views(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE blog_posts SET view_count = view_count + 1 WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(conn
            .query_row(
                &format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE id = ?1"),
                params![id.to_string()],
                blog_from_row,
            )
            .optional()?)
    }

    async fn set_suggested_blogs(&self, product_id: Uuid, blogs: &[Uuid]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM suggested_blogs WHERE product_id = ?1",
            params![product_id.to_string()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO suggested_blogs (product_id, blog_id, position)
                 SELECT ?1, id, ?3 FROM blog_posts WHERE id = ?2",
            )?;
            let mut position = 0i64;
            for blog_id in blogs {
                let inserted = insert.execute(params![
                    product_id.to_string(),
                    blog_id.to_string(),
                    position
                ])?;
                position += inserted as i64;
            }
        }
        tx.commit()?;
        Ok(())
    }

    async fn suggested_blogs(&self, product_id: Uuid) -> Result<Vec<SuggestedBlog>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT product_id, blog_id, position FROM suggested_blogs
             WHERE product_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![product_id.to_string()], |row| {
                Ok(SuggestedBlog {
                    product_id: uuid_col(row, 0)?,
                    blog_id: uuid_col(row, 1)?,
                    order: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
