//! HTTP routes grouped per resource. Each submodule exposes a `routes()`
//! that is merged into [`router`]; everything but `/health` and
//! `/sitemap.xml` lives under `/api`.

pub mod auth;
pub mod blogs;
pub mod brands;
pub mod estimates;
pub mod health;
pub mod leads;
pub mod products;
pub mod sitemap;
pub mod uploads;

use crate::auth::AuthKeys;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::notify::Notifier;
use crate::storage::Storage;
use axum::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRef, FromRequest};
use axum::http::Request;
use axum::{BoxError, Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<dyn Notifier>,
    pub auth: AuthKeys,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>, config: Config) -> Self {
        let auth = AuthKeys::new(
            &config.jwt_secret(),
            config.auth.token_ttl_days,
            config.auth.secure_cookies,
        );
        Self {
            storage,
            notifier,
            auth,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// `Json` whose rejections use the crate's `{"error": ...}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Done {
    pub success: bool,
    pub message: String,
}

impl Done {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Ids that do not parse can never match a row.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Positive integer query value, `fallback` when absent or unparsable.
pub fn positive_param(raw: Option<&str>, fallback: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(fallback)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(brands::routes())
        .merge(products::routes())
        .merge(blogs::routes())
        .merge(estimates::routes())
        .merge(leads::routes())
        .merge(health::routes())
        .merge(sitemap::routes())
        .merge(uploads::routes())
}
