use super::AppState;
use crate::error::Result;
use crate::leads::escape_html;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Write;

pub const STATIC_PAGES: &[&str] = &[
    "/",
    "/about",
    "/testimonials",
    "/contact",
    "/faq",
    "/gallery",
    "/blog",
    "/products",
    "/calculator/painting",
    "/calculator/wood-polishing",
    "/paint-budget-calculator",
    "/colour-visualiser",
    "/services/painting",
    "/services/painting/residential",
    "/services/painting/commercial",
    "/services/customized-painting",
    "/services/customized-painting/interior-painting",
    "/services/customized-painting/exterior-painting",
    "/services/customized-painting/one-day-painting",
    "/services/customized-painting/per-day-painting",
    "/services/wall-decor/graffiti-painting",
    "/services/wall-decor/stencil-art",
    "/services/wall-decor/texture-painting",
    "/services/wall-decor/wallpaper",
    "/services/wood-services",
    "/services/wood/carpentry",
    "/services/wood/wood-coating",
    "/services/wood/wood-polishing",
    "/sitemap",
    "/privacy-policy",
    "/cookie-policy",
    "/terms-and-condition",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub path: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    fn page(path: &str) -> Self {
        Self {
            path: path.to_string(),
            last_modified: None,
        }
    }
}

pub fn render(base_url: &str, entries: &[SitemapEntry]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        let _ = write!(xml, "  <url><loc>{}</loc>", escape_html(&format!("{base}{}", entry.path)));
        if let Some(modified) = entry.last_modified {
            let _ = write!(xml, "<lastmod>{}</lastmod>", modified.format("%Y-%m-%d"));
        }
        xml.push_str("</url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Static pages, then published posts, then product pages.
async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let storage = state.storage.as_ref();
    let mut entries: Vec<SitemapEntry> = STATIC_PAGES.iter().map(|p| SitemapEntry::page(p)).collect();

    for blog in storage.list_blogs().await?.into_iter().filter(|b| b.published) {
        entries.push(SitemapEntry {
            path: format!("/blog/{}", blog.slug),
            last_modified: Some(blog.updated_at),
        });
    }

    let brand_slugs: HashMap<_, _> = storage
        .list_brands()
        .await?
        .into_iter()
        .map(|b| (b.id, b.slug))
        .collect();
    for product in storage.list_products().await? {
        if let Some(brand) = brand_slugs.get(&product.brand_id) {
            entries.push(SitemapEntry {
                path: format!("/products/{}/{}", brand, product.slug),
                last_modified: Some(product.updated_at),
            });
        }
    }

    Ok((
        [(CONTENT_TYPE, "application/xml")],
        render(&state.config.site.base_url, &entries),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/sitemap.xml", get(sitemap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_urls_with_optional_lastmod() {
        let modified = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let xml = render(
            "https://homeglazer.com/",
            &[
                SitemapEntry::page("/"),
                SitemapEntry {
                    path: "/blog/a&b".into(),
                    last_modified: Some(modified),
                },
            ],
        );
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<url><loc>https://homeglazer.com/</loc></url>"));
        assert!(xml.contains(
            "<url><loc>https://homeglazer.com/blog/a&amp;b</loc><lastmod>2025-03-09</lastmod></url>"
        ));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
