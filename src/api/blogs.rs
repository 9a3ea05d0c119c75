use super::{parse_id, positive_param, ApiJson, AppState, Done};
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::storage::DUPLICATE_BLOG;
use crate::types::{BlogPost, NewBlogPost};
use crate::validation::Checks;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::cmp::Ordering;
use tracing::{info, instrument};

const NOT_FOUND: &str = "Blog not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route(
            "/api/blogs/:id",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub published: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
}

/// Featured posts first (unset order last), then newest published, then
/// newest created.
pub fn feed_order(a: &BlogPost, b: &BlogPost) -> Ordering {
    let featured = match (a.featured_order, b.featured_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    featured
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// `limit` applies before the category filter.
pub fn select_feed(mut blogs: Vec<BlogPost>, query: &BlogQuery) -> Vec<BlogPost> {
    if query.published.as_deref() == Some("true") {
        blogs.retain(|b| b.published);
    }
    blogs.sort_by(feed_order);
    if query.limit.is_some() {
        blogs.truncate(positive_param(query.limit.as_deref(), blogs.len()));
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        blogs.retain(|b| b.categories.iter().any(|c| c == category));
    }
    blogs
}

async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<Vec<BlogPost>>> {
    let blogs = state.storage.list_blogs().await?;
    Ok(Json(select_feed(blogs, &query)))
}

fn validate_new(body: &NewBlogPost) -> Result<()> {
    Checks::new()
        .required(body.title.as_deref(), "Title is required")
        .required(body.slug.as_deref(), "Slug is required")
        .slug(body.slug.as_deref())
        .required(body.excerpt.as_deref(), "Excerpt is required")
        .required(body.content.as_deref(), "Content is required")
        .required(body.author.as_deref(), "Author is required")
        .finish()
}

fn validate_update(body: &NewBlogPost) -> Result<()> {
    Checks::new()
        .non_blank(body.title.as_deref(), "Title must be a non-empty string")
        .non_blank(body.slug.as_deref(), "Slug must be a non-empty string")
        .slug(body.slug.as_deref())
        .non_blank(body.excerpt.as_deref(), "Excerpt must be a non-empty string")
        .non_blank(body.content.as_deref(), "Content must be a non-empty string")
        .non_blank(body.author.as_deref(), "Author must be a non-empty string")
        .finish()
}

#[instrument(skip_all)]
async fn create_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewBlogPost>,
) -> Result<impl IntoResponse> {
    validate_new(&body)?;
    let slug = body.slug.as_deref().unwrap_or_default();
    if state.storage.get_blog_by_slug(slug).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_BLOG.to_string()));
    }

    let blog = BlogPost::from_new(body);
    state.storage.create_blog(&blog).await?;
    info!("Created blog {} (published: {})", blog.slug, blog.published);
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Counts the read and returns the post with the new view count.
async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let blog = state
        .storage
        .increment_blog_views(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(blog))
}

#[instrument(skip(state, body))]
async fn update_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NewBlogPost>,
) -> Result<Json<BlogPost>> {
    validate_update(&body)?;
    let id = parse_id(&id, NOT_FOUND)?;
    let mut blog = state
        .storage
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    if let Some(slug) = body.slug.as_deref() {
        if slug != blog.slug && state.storage.get_blog_by_slug(slug).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_BLOG.to_string()));
        }
    }

    blog.apply(body);
    state.storage.update_blog(&blog).await?;
    info!("Updated blog {}", blog.slug);
    Ok(Json(blog))
}

async fn delete_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Done>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let blog = state
        .storage
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    state.storage.delete_blog(blog.id).await?;
    info!("Deleted blog {}", blog.slug);
    Ok(Done::new("Blog deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn post(slug: &str, featured: Option<i64>, published_days_ago: Option<i64>) -> BlogPost {
        let mut blog = BlogPost::from_new(NewBlogPost {
            slug: Some(slug.into()),
            title: Some(slug.into()),
            excerpt: Some("e".into()),
            content: Some("c".into()),
            author: Some("a".into()),
            published: Some(published_days_ago.is_some()),
            categories: Some(vec!["Painting".into()]),
            featured_order: featured,
            ..NewBlogPost::default()
        });
        blog.published_at = published_days_ago.map(|d| Utc::now() - Duration::days(d));
        blog
    }

    fn slugs(blogs: &[BlogPost]) -> Vec<&str> {
        blogs.iter().map(|b| b.slug.as_str()).collect()
    }

    #[test]
    fn featured_first_then_newest() {
        let blogs = vec![
            post("old", None, Some(10)),
            post("second", Some(2), Some(30)),
            post("new", None, Some(1)),
            post("first", Some(1), Some(40)),
            post("draft", None, None),
        ];
        let all = select_feed(blogs.clone(), &BlogQuery::default());
        assert_eq!(slugs(&all), vec!["first", "second", "new", "old", "draft"]);

        let published = select_feed(
            blogs,
            &BlogQuery {
                published: Some("true".into()),
                limit: Some("3".into()),
                category: None,
            },
        );
        assert_eq!(slugs(&published), vec!["first", "second", "new"]);
    }

    #[test]
    fn category_filter_runs_after_limit() {
        let mut wood = post("wood", None, Some(5));
        wood.categories = vec!["Wood".into()];
        let blogs = vec![post("paint", None, Some(1)), wood];
        let query = BlogQuery {
            published: None,
            limit: Some("1".into()),
            category: Some("Wood".into()),
        };
        assert!(select_feed(blogs, &query).is_empty());
    }

    #[test]
    fn create_and_update_messages() {
        match validate_new(&NewBlogPost::default()).unwrap_err() {
            AppError::Validation(details) => assert_eq!(
                details,
                vec![
                    "Title is required",
                    "Slug is required",
                    "Excerpt is required",
                    "Content is required",
                    "Author is required",
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
        let update = NewBlogPost {
            title: Some("".into()),
            slug: Some("Bad".into()),
            ..NewBlogPost::default()
        };
        match validate_update(&update).unwrap_err() {
            AppError::Validation(details) => assert_eq!(
                details,
                vec![
                    "Title must be a non-empty string",
                    "Slug must be lowercase alphanumeric with hyphens",
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
        assert!(validate_update(&NewBlogPost::default()).is_ok());
    }
}
