use super::AppState;
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Room for the multipart framing and the `type` field around the file.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;
const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "application/pdf",
];
const TOO_LARGE: &str = "File size too large. Maximum 5MB allowed.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

/// What the upload is for; decides the folder under the uploads root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Brand,
    Product,
    Document,
    Blog,
}

impl UploadKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "brand" => Some(UploadKind::Brand),
            "product" => Some(UploadKind::Product),
            "document" => Some(UploadKind::Document),
            "blog" => Some(UploadKind::Blog),
            _ => None,
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            UploadKind::Brand => "brands",
            UploadKind::Product => "products",
            UploadKind::Document => "documents",
            UploadKind::Blog => "blogs",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub success: bool,
    pub url: String,
    pub filename: String,
}

/// Extension of the client's file name, lowercased; only plain alphanumerics
/// survive so the name cannot escape the target folder.
pub fn file_extension(original: Option<&str>, content_type: &str) -> String {
    let ext = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()));
    match ext {
        Some(ext) => format!(".{ext}"),
        None if content_type == "application/pdf" => ".pdf".to_string(),
        None => ".jpg".to_string(),
    }
}

fn unique_filename(extension: &str) -> String {
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..12],
        extension
    )
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest(TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

struct UploadedFile {
    name: Option<String>,
    content_type: String,
    bytes: Vec<u8>,
}

#[instrument(skip_all)]
async fn upload(
    _user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>> {
    let mut kind = None;
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "type" => {
                let raw = field.text().await.map_err(multipart_error)?;
                kind = UploadKind::parse(&raw);
            }
            "image" => {
                let name = field.file_name().map(str::to_string);
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| {
        AppError::BadRequest(
            "Invalid type. Must be \"brand\", \"product\", \"blog\", or \"document\"".to_string(),
        )
    })?;
    let file = file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::BadRequest(
            "Invalid file type. Only JPEG, PNG, WebP, and PDF are allowed.".to_string(),
        ));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(TOO_LARGE.to_string()));
    }

    let filename = unique_filename(&file_extension(file.name.as_deref(), &file.content_type));
    let dir = Path::new(&state.config.site.uploads_dir).join(kind.folder());
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&filename), &file.bytes).await?;
    info!("Stored {} upload {} ({} bytes)", kind.folder(), filename, file.bytes.len());

    Ok(Json(Uploaded {
        success: true,
        url: format!("/uploads/{}/{}", kind.folder(), filename),
        filename,
    }))
}
