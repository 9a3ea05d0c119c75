use crate::error::{AppError, Result};
use crate::types::{BlogPost, Brand, Product, SuggestedBlog, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

pub const DUPLICATE_BRAND: &str = "Brand with this slug already exists";
pub const DUPLICATE_PRODUCT: &str = "Product with this slug already exists for this brand";
pub const DUPLICATE_BLOG: &str = "Blog with this slug already exists";
pub const DUPLICATE_USER: &str = "User with this email already exists";

/// Persistence for the catalog, blog and admin accounts. Implementations
/// enforce the unique keys and report violations as [`AppError::Conflict`].
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn create_user(&self, user: &User) -> Result<()>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, user: &User) -> Result<()>;

    // Brand operations
    async fn create_brand(&self, brand: &Brand) -> Result<()>;
    async fn get_brand(&self, id: Uuid) -> Result<Option<Brand>>;
    async fn get_brand_by_slug(&self, slug: &str) -> Result<Option<Brand>>;
    /// Newest first.
    async fn list_brands(&self) -> Result<Vec<Brand>>;
    async fn update_brand(&self, brand: &Brand) -> Result<()>;
    /// Removes the brand together with its products.
    async fn delete_brand(&self, id: Uuid) -> Result<()>;

    // Product operations
    async fn create_product(&self, product: &Product) -> Result<()>;
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn get_product_by_slug(&self, brand_id: Uuid, slug: &str) -> Result<Option<Product>>;
    /// Newest first.
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn update_product(&self, product: &Product) -> Result<()>;
    async fn delete_product(&self, id: Uuid) -> Result<()>;

    // Related products
    /// Replaces the relations of `product_id`. Duplicates, self references
    /// and unknown ids are dropped.
    async fn set_related_products(&self, product_id: Uuid, related: &[Uuid]) -> Result<()>;
    async fn related_product_ids(&self, product_id: Uuid) -> Result<Vec<Uuid>>;

    // Blog operations
    async fn create_blog(&self, blog: &BlogPost) -> Result<()>;
    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>>;
    async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    async fn list_blogs(&self) -> Result<Vec<BlogPost>>;
    async fn update_blog(&self, blog: &BlogPost) -> Result<()>;
    async fn delete_blog(&self, id: Uuid) -> Result<()>;
    /// Bumps the view counter and returns the updated post.
    async fn increment_blog_views(&self, id: Uuid) -> Result<Option<BlogPost>>;

    // Suggested blogs
    /// Replaces the suggestions of `product_id`; position in `blogs` is the order.
    async fn set_suggested_blogs(&self, product_id: Uuid, blogs: &[Uuid]) -> Result<()>;
    /// Ordered by `order` ascending.
    async fn suggested_blogs(&self, product_id: Uuid) -> Result<Vec<SuggestedBlog>>;
}

/// Dedupes while keeping first-seen order and drops `product_id` itself.
pub fn normalize_related(product_id: Uuid, related: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(related.len());
    for id in related {
        if *id != product_id && !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    brands: HashMap<Uuid, Brand>,
    products: HashMap<Uuid, Product>,
    relations: Vec<(Uuid, Uuid)>,
    blogs: HashMap<Uuid, BlogPost>,
    suggested: Vec<SuggestedBlog>,
}

impl Tables {
    fn drop_product_links(&mut self, product_id: Uuid) {
        self.relations
            .retain(|(from, to)| *from != product_id && *to != product_id);
        self.suggested.retain(|s| s.product_id != product_id);
    }
}

/// In-memory storage used by tests and `serve --memory`.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("storage lock poisoned".to_string()))
    }
}

fn newest_first<T, F>(mut items: Vec<T>, created: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by(|a, b| created(b).cmp(&created(a)));
    items
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: &User) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
        }
        tables.users.insert(user.id, user.clone());
        debug!("Created user: {} with id {}", user.email, user.id);
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.lock()?;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
        }
        match tables.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("User not found".to_string())),
        }
    }

    async fn create_brand(&self, brand: &Brand) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.brands.values().any(|b| b.slug == brand.slug) {
            return Err(AppError::Conflict(DUPLICATE_BRAND.to_string()));
        }
        tables.brands.insert(brand.id, brand.clone());
        debug!("Created brand: {} with id {}", brand.name, brand.id);
        Ok(())
    }

    async fn get_brand(&self, id: Uuid) -> Result<Option<Brand>> {
        Ok(self.lock()?.brands.get(&id).cloned())
    }

    async fn get_brand_by_slug(&self, slug: &str) -> Result<Option<Brand>> {
        Ok(self
            .lock()?
            .brands
            .values()
            .find(|b| b.slug == slug)
            .cloned())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        let brands = self.lock()?.brands.values().cloned().collect();
        Ok(newest_first(brands, |b: &Brand| b.created_at))
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        let mut tables = self.lock()?;
        if tables
            .brands
            .values()
            .any(|b| b.slug == brand.slug && b.id != brand.id)
        {
            return Err(AppError::Conflict(DUPLICATE_BRAND.to_string()));
        }
        match tables.brands.get_mut(&brand.id) {
            Some(existing) => {
                *existing = brand.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Brand not found".to_string())),
        }
    }

    async fn delete_brand(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.brands.remove(&id).is_none() {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        let doomed: Vec<Uuid> = tables
            .products
            .values()
            .filter(|p| p.brand_id == id)
            .map(|p| p.id)
            .collect();
        for product_id in &doomed {
            tables.products.remove(product_id);
            tables.drop_product_links(*product_id);
        }
        debug!("Deleted brand {} and {} products", id, doomed.len());
        Ok(())
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        let mut tables = self.lock()?;
        if !tables.brands.contains_key(&product.brand_id) {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        if tables
            .products
            .values()
            .any(|p| p.brand_id == product.brand_id && p.slug == product.slug)
        {
            return Err(AppError::Conflict(DUPLICATE_PRODUCT.to_string()));
        }
        tables.products.insert(product.id, product.clone());
        debug!("Created product: {} with id {}", product.name, product.id);
        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    async fn get_product_by_slug(&self, brand_id: Uuid, slug: &str) -> Result<Option<Product>> {
        Ok(self
            .lock()?
            .products
            .values()
            .find(|p| p.brand_id == brand_id && p.slug == slug)
            .cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.lock()?.products.values().cloned().collect();
        Ok(newest_first(products, |p: &Product| p.created_at))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut tables = self.lock()?;
        if !tables.brands.contains_key(&product.brand_id) {
            return Err(AppError::NotFound("Brand not found".to_string()));
        }
        if tables.products.values().any(|p| {
            p.brand_id == product.brand_id && p.slug == product.slug && p.id != product.id
        }) {
            return Err(AppError::Conflict(DUPLICATE_PRODUCT.to_string()));
        }
        match tables.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Product not found".to_string())),
        }
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.products.remove(&id).is_none() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        tables.drop_product_links(id);
        Ok(())
    }

    async fn set_related_products(&self, product_id: Uuid, related: &[Uuid]) -> Result<()> {
        let mut tables = self.lock()?;
        if !tables.products.contains_key(&product_id) {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        tables.relations.retain(|(from, _)| *from != product_id);
        let keep: Vec<Uuid> = normalize_related(product_id, related)
            .into_iter()
            .filter(|id| tables.products.contains_key(id))
            .collect();
        debug!("Product {} now has {} related products", product_id, keep.len());
        tables
            .relations
            .extend(keep.into_iter().map(|id| (product_id, id)));
        Ok(())
    }

    async fn related_product_ids(&self, product_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .lock()?
            .relations
            .iter()
            .filter(|(from, _)| *from == product_id)
            .map(|(_, to)| *to)
            .collect())
    }

    async fn create_blog(&self, blog: &BlogPost) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.blogs.values().any(|b| b.slug == blog.slug) {
            return Err(AppError::Conflict(DUPLICATE_BLOG.to_string()));
        }
        tables.blogs.insert(blog.id, blog.clone());
        debug!("Created blog: {} with id {}", blog.slug, blog.id);
        Ok(())
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>> {
        Ok(self.lock()?.blogs.get(&id).cloned())
    }

    async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(self
            .lock()?
            .blogs
            .values()
            .find(|b| b.slug == slug)
            .cloned())
    }

    async fn list_blogs(&self) -> Result<Vec<BlogPost>> {
        let blogs = self.lock()?.blogs.values().cloned().collect();
        Ok(newest_first(blogs, |b: &BlogPost| b.created_at))
    }

    async fn update_blog(&self, blog: &BlogPost) -> Result<()> {
        let mut tables = self.lock()?;
        if tables
            .blogs
            .values()
            .any(|b| b.slug == blog.slug && b.id != blog.id)
        {
            return Err(AppError::Conflict(DUPLICATE_BLOG.to_string()));
        }
        match tables.blogs.get_mut(&blog.id) {
            Some(existing) => {
                *existing = blog.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Blog not found".to_string())),
        }
    }

    async fn delete_blog(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.blogs.remove(&id).is_none() {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }
        tables.suggested.retain(|s| s.blog_id != id);
        Ok(())
    }

    async fn increment_blog_views(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let mut tables = self.lock()?;
        Ok(tables.blogs.get_mut(&id).map(|blog| {
            blog.view_count += 1;
            blog.clone()
        }))
    }

    async fn set_suggested_blogs(&self, product_id: Uuid, blogs: &[Uuid]) -> Result<()> {
        let mut tables = self.lock()?;
        tables.suggested.retain(|s| s.product_id != product_id);
        let mut order = 0;
        for blog_id in blogs {
            let known = tables.blogs.contains_key(blog_id);
            let seen = tables
                .suggested
                .iter()
                .any(|s| s.product_id == product_id && s.blog_id == *blog_id);
            if known && !seen {
                tables.suggested.push(SuggestedBlog {
                    product_id,
                    blog_id: *blog_id,
                    order,
                });
                order += 1;
            }
        }
        Ok(())
    }

    async fn suggested_blogs(&self, product_id: Uuid) -> Result<Vec<SuggestedBlog>> {
        let mut out: Vec<SuggestedBlog> = self
            .lock()?
            .suggested
            .iter()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| s.order);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewBlogPost, NewBrand, NewProduct};

    fn brand(slug: &str) -> Brand {
        Brand::from_new(NewBrand {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            logo: "/logo.png".into(),
            description: "d".into(),
        })
    }

    fn product(brand_id: Uuid, slug: &str) -> Product {
        Product::from_new(
            NewProduct {
                name: slug.into(),
                slug: slug.into(),
                ..Default::default()
            },
            brand_id,
        )
    }

    #[tokio::test]
    async fn brand_slug_is_unique() {
        let storage = InMemoryStorage::new();
        storage.create_brand(&brand("dulux")).await.unwrap();
        let err = storage.create_brand(&brand("dulux")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn product_slug_is_unique_per_brand() {
        let storage = InMemoryStorage::new();
        let a = brand("a");
        let b = brand("b");
        storage.create_brand(&a).await.unwrap();
        storage.create_brand(&b).await.unwrap();
        storage.create_product(&product(a.id, "royale")).await.unwrap();
        storage.create_product(&product(b.id, "royale")).await.unwrap();
        let err = storage
            .create_product(&product(a.id, "royale"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_brand_cascades() {
        let storage = InMemoryStorage::new();
        let a = brand("a");
        let b = brand("b");
        storage.create_brand(&a).await.unwrap();
        storage.create_brand(&b).await.unwrap();
        let p1 = product(a.id, "one");
        let p2 = product(b.id, "two");
        storage.create_product(&p1).await.unwrap();
        storage.create_product(&p2).await.unwrap();
        storage.set_related_products(p2.id, &[p1.id]).await.unwrap();

        storage.delete_brand(a.id).await.unwrap();

        assert!(storage.get_product(p1.id).await.unwrap().is_none());
        assert!(storage.related_product_ids(p2.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn relations_drop_self_duplicates_and_unknown_ids() {
        let storage = InMemoryStorage::new();
        let a = brand("a");
        storage.create_brand(&a).await.unwrap();
        let p1 = product(a.id, "one");
        let p2 = product(a.id, "two");
        storage.create_product(&p1).await.unwrap();
        storage.create_product(&p2).await.unwrap();

        storage
            .set_related_products(p1.id, &[p2.id, p1.id, p2.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(storage.related_product_ids(p1.id).await.unwrap(), vec![p2.id]);

        storage.set_related_products(p1.id, &[]).await.unwrap();
        assert!(storage.related_product_ids(p1.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn view_count_increments() {
        let storage = InMemoryStorage::new();
        let post = BlogPost::from_new(NewBlogPost {
            slug: Some("s".into()),
            ..Default::default()
        });
        storage.create_blog(&post).await.unwrap();
        storage.increment_blog_views(post.id).await.unwrap();
        let after = storage.increment_blog_views(post.id).await.unwrap().unwrap();
        assert_eq!(after.view_count, 2);
        assert!(storage.increment_blog_views(Uuid::new_v4()).await.unwrap().is_none());
    }
}
