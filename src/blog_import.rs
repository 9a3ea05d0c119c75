//! One-off scraper for the legacy blog listing. Collects article links,
//! titles and thumbnails into `blog-articles.json`, then loads the article
//! bodies into blog storage in batches.

use crate::error::{AppError, Result};
use crate::leads::escape_html;
use crate::storage::Storage;
use crate::types::{BlogPost, NewBlogPost};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{StatusCode, Url};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const OUTPUT_FILE: &str = "blog-articles.json";
const IMAGE_ATTRS: &[&str] = &["data-src", "data-lazy-src", "data-original", "src"];
const MAX_CONTAINER_DEPTH: usize = 10;

/// Articles that were rewritten by hand and must not be reloaded.
pub const SKIP_SLUGS: &[&str] = &[
    "guide-to-wooden-polish-shades-for-veneer",
    "reasons-why-sirca-paints-acquired-oikos-paints",
    "6-amazing-tips-to-maintain-duco-paint-surface",
    "5-asian-paint-stucco-marble-texture-paint-best",
    "5-asian-paint-stucco-marble-texture-paint-best-features",
    "sirca-paints-acquired-oikos-paints",
];
pub const BLOG_AUTHOR: &str = "Home Glazer Team";
const DEFAULT_CATEGORY: &str = "Paint Tips";
const ARTICLE_SELECTORS: &[&str] = &["article", "div.entry-content", ".post-content", ".blog-content"];
const DROPPED_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "form", "button", "figure", "iframe", "script", "style",
];
const MIN_CONTENT_CHARS: usize = 100;
/// Publish dates are spread backwards from 2025-11-01 over two years.
const DATE_SPREAD_DAYS: f64 = 730.0;

/// Title keywords and the categories they add, checked in order.
const CATEGORY_RULES: &[(&[&str], &[&str])] = &[
    (
        &[
            "pu polish",
            "pu paint",
            "polyurethane",
            "wood polish",
            "melamine",
            "polyester polish",
            "wood stain",
            "furniture polish",
        ],
        &["Wood Services", "Wood Polishing"],
    ),
    (&["duco", "wood coating", "wooden furniture"], &["Wood Services", "Wood Coating"]),
    (&["carpent"], &["Wood Services", "Carpentry"]),
    (&["texture", "stucco", "oikos", "italian"], &["Texture Painting"]),
    (&["graffiti"], &["Wall Decor", "Graffiti Painting"]),
    (&["stencil"], &["Wall Decor", "Stencil Art"]),
    (&["wallpaper"], &["Wall Decor", "Wallpaper"]),
    (&["exterior"], &["Exterior Painting"]),
    (
        &["interior", "living room", "bedroom", "kitchen", "kids room"],
        &["Interior Painting"],
    ),
    (&["commercial", "office", "business"], &["Commercial Painting"]),
    (&["residential", "house", "home"], &["Residential Painting"]),
    (&["asian paint"], &["Paint Brands", "Asian Paints"]),
    (&["dulux"], &["Paint Brands", "Dulux"]),
    (&["berger"], &["Paint Brands", "Berger"]),
    (&["indigo"], &["Paint Brands", "Indigo"]),
    (&["sirca"], &["Paint Brands", "Sirca"]),
    (&["birla", "opus"], &["Paint Brands", "Birla"]),
    (&["tips", "how to", "process", "guide", "steps"], &["Paint Tips"]),
    (&["colour", "color", "shade"], &["Color Ideas"]),
    (&["difference", "vs"], &["Comparisons"]),
];

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub base_url: String,
    pub output_dir: PathBuf,
    /// URL prefix under which `output_dir` is served.
    pub public_prefix: String,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub article_delay: Duration,
    pub download_thumbnails: bool,
}

impl ImportOptions {
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            public_prefix: "/uploads/blogs".to_string(),
            max_pages: 20,
            page_delay: Duration::from_secs(1),
            article_delay: Duration::from_millis(500),
            download_thumbnails: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedArticle {
    pub title: String,
    pub url: String,
    pub slug: String,
    pub thumbnail_original: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub scraped_at: String,
    pub total_articles: usize,
    pub articles: Vec<ScrapedArticle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub articles: Vec<ScrapedArticle>,
    pub has_more: bool,
}

/// Host of the site without a leading `www.`.
pub fn site_host(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}

pub fn is_site_url(url: &str, host: &str) -> bool {
    ["https://", "http://"].iter().any(|scheme| {
        url.starts_with(&format!("{scheme}{host}/"))
            || url.starts_with(&format!("{scheme}www.{host}/"))
    })
}

/// Forces https and drops `www.`.
pub fn normalize_url(url: &str, host: &str) -> String {
    url.replacen("http://", "https://", 1)
        .replacen(&format!("https://www.{host}/"), &format!("https://{host}/"), 1)
}

pub fn slug_from_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().trim_matches('/').to_string(),
        Err(_) => url.trim_end_matches('/').to_string(),
    }
}

pub fn page_url(base_url: &str, page: u32) -> String {
    let base = base_url.trim_end_matches('/');
    if page <= 1 {
        base.to_string()
    } else {
        format!("{base}/page/{page}/")
    }
}

fn usable(url: &str) -> bool {
    url.starts_with("http") && !url.starts_with("data:")
}

/// Lazy-loaded images keep the real URL in a data attribute or srcset.
fn image_url(img: ElementRef<'_>) -> Option<String> {
    let element = img.value();
    for attr in IMAGE_ATTRS {
        if let Some(url) = element.attr(attr).filter(|u| usable(u)) {
            return Some(url.to_string());
        }
    }
    let srcset = element.attr("data-srcset").or_else(|| element.attr("srcset"))?;
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .find(|u| usable(u))
        .map(str::to_string)
}

fn link_text(link: ElementRef<'_>) -> String {
    link.text().collect::<String>().trim().to_lowercase()
}

/// Walks up from `link` until an ancestor holds both a heading and an image.
fn article_container<'a>(link: ElementRef<'a>, h3: &Selector, img: &Selector) -> Option<ElementRef<'a>> {
    let mut current = link.parent().and_then(ElementRef::wrap)?;
    for _ in 0..MAX_CONTAINER_DEPTH {
        if current.select(img).next().is_some() && current.select(h3).next().is_some() {
            break;
        }
        match current.parent().and_then(ElementRef::wrap) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Some(current)
}

pub fn parse_listing(html: &str, host: &str) -> Result<ListingPage> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a").map_err(|e| AppError::Internal(e.to_string()))?;
    let h3 = Selector::parse("h3").map_err(|e| AppError::Internal(e.to_string()))?;
    let img = Selector::parse("img").map_err(|e| AppError::Internal(e.to_string()))?;

    let mut articles = Vec::new();
    for link in document.select(&anchors) {
        let text = link_text(link);
        if text != "read more" && text != "read more »" {
            continue;
        }
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !is_site_url(href, host) {
            debug!("Skipping off-site link: {}", href);
            continue;
        }
        let url = normalize_url(href, host);
        let slug = slug_from_url(&url);

        let container = article_container(link, &h3, &img);
        let title = container
            .and_then(|c| c.select(&h3).next())
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| slug.clone());
        let thumbnail_original = container
            .and_then(|c| c.select(&img).next())
            .and_then(image_url);

        articles.push(ScrapedArticle {
            title,
            url,
            slug,
            thumbnail_original,
            thumbnail: None,
        });
    }

    let has_more = document
        .select(&anchors)
        .any(|a| link_text(a).contains("next"));

    Ok(ListingPage { articles, has_more })
}

/// `<slug><ext>`, defaulting to `.jpg`; nested slugs are flattened.
pub fn thumbnail_filename(image_url: &str, slug: &str) -> String {
    let ext = Url::parse(image_url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
        })
        .unwrap_or_else(|| ".jpg".to_string());
    format!("{}{}", slug.replace('/', "-"), ext)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Categories implied by the title, in rule order without duplicates.
pub fn assign_categories(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    let mut categories: Vec<String> = Vec::new();
    let mut add = |names: &[&str]| {
        for name in names {
            if !categories.iter().any(|c| c == name) {
                categories.push(name.to_string());
            }
        }
    };
    for (keywords, names) in CATEGORY_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            add(*names);
        }
    }
    if categories.is_empty() {
        categories.push(DEFAULT_CATEGORY.to_string());
    }
    categories
}

/// Minutes at 200 words a minute and five characters a word, kept within 3..=15.
pub fn estimate_read_time(content_len: usize) -> String {
    let minutes = (content_len as f64 / 5.0 / 200.0).ceil() as usize;
    minutes.clamp(3, 15).to_string()
}

fn inside_dropped(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| DROPPED_TAGS.contains(&a.value().name()))
}

fn clean_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Rebuilds the article body from the first content container as plain
/// headings, paragraphs and lists. `None` when the page has no container.
pub fn extract_article(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = ARTICLE_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())?;
    let blocks = Selector::parse("h2, h3, h4, p, ul, ol").ok()?;
    let items = Selector::parse("li").ok()?;

    let mut lines = Vec::new();
    for element in container.select(&blocks) {
        if inside_dropped(element) {
            continue;
        }
        let name = element.value().name();
        // Paragraphs inside list items are emitted with their list.
        let in_list = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| a.value().name() == "li");
        if in_list {
            continue;
        }
        match name {
            "ul" | "ol" => {
                let entries: Vec<String> = element
                    .select(&items)
                    .map(clean_text)
                    .filter(|t| !t.is_empty())
                    .map(|t| format!("<li>{}</li>", escape_html(&t)))
                    .collect();
                if !entries.is_empty() {
                    lines.push(format!("<{name}>{}</{name}>", entries.concat()));
                }
            }
            _ => {
                let text = clean_text(element);
                if !text.is_empty() {
                    lines.push(format!("<{name}>{}</{name}>", escape_html(&text)));
                }
            }
        }
    }
    Some(lines.join("\n"))
}

/// First paragraph of 50 to 300 characters cut to 200, else the title.
pub fn excerpt_from(content: &str, title: &str) -> String {
    let Ok(paragraph) = Selector::parse("p") else {
        return title.to_string();
    };
    let fragment = Html::parse_fragment(content);
    let excerpt = fragment
        .select(&paragraph)
        .map(|p| p.text().collect::<String>())
        .find(|text| (50..=300).contains(&text.chars().count()));
    match excerpt {
        Some(text) => format!("{}...", text.chars().take(200).collect::<String>()),
        None => title.to_string(),
    }
}

/// Earlier entries in the listing get later dates.
pub fn published_at(index: usize, total: usize) -> Option<DateTime<Utc>> {
    let anchor = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).single()?;
    let fraction = if total == 0 { 0.0 } else { index as f64 / total as f64 };
    let days = (fraction * DATE_SPREAD_DAYS).floor() as i64;
    Some(anchor - chrono::Duration::days(days))
}

/// Published post for a scraped article; `None` when the body is too short.
pub fn article_post(
    article: &ScrapedArticle,
    content: String,
    index: usize,
    total: usize,
) -> Option<BlogPost> {
    if content.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }
    let mut post = BlogPost::from_new(NewBlogPost {
        slug: Some(article.slug.clone()),
        title: Some(article.title.clone()),
        excerpt: Some(excerpt_from(&content, &article.title)),
        read_time: Some(estimate_read_time(content.chars().count())),
        content: Some(content),
        author: Some(BLOG_AUTHOR.to_string()),
        cover_image: article.thumbnail.clone(),
        categories: Some(assign_categories(&article.title)),
        published: Some(true),
        ..NewBlogPost::default()
    });
    post.published_at = published_at(index, total).or(post.published_at);
    Some(post)
}

/// `true` when the post was stored, `false` when its slug already exists.
pub async fn store_post(storage: &dyn Storage, post: &BlogPost) -> Result<bool> {
    if storage.get_blog_by_slug(&post.slug).await?.is_some() {
        return Ok(false);
    }
    storage.create_blog(post).await?;
    Ok(true)
}

pub struct BlogImporter {
    client: reqwest::Client,
    options: ImportOptions,
    host: String,
}

impl BlogImporter {
    pub fn new(options: ImportOptions) -> Result<Self> {
        let host = site_host(&options.base_url)
            .ok_or_else(|| AppError::Config(format!("invalid blog url: {}", options.base_url)))?;
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; glazer-site blog importer)")
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            options,
            host,
        })
    }

    /// Scrapes every listing page, downloads thumbnails and writes the report.
    #[instrument(skip(self), fields(base = %self.options.base_url))]
    pub async fn run(&self) -> Result<ImportReport> {
        tokio::fs::create_dir_all(&self.options.output_dir).await?;

        let mut articles = Vec::new();
        let mut page = 1;
        let mut has_more = true;
        while has_more && page <= self.options.max_pages {
            let listing = self.scrape_page(page).await;
            has_more = listing.has_more && !listing.articles.is_empty();
            for mut article in listing.articles {
                if self.options.download_thumbnails {
                    if let Some(original) = article.thumbnail_original.clone() {
                        article.thumbnail = self.download_thumbnail(&original, &article.slug).await;
                    }
                }
                articles.push(article);
            }
            page += 1;
            if has_more {
                tokio::time::sleep(self.options.page_delay).await;
            }
        }

        let report = ImportReport {
            scraped_at: Utc::now().to_rfc3339(),
            total_articles: articles.len(),
            articles,
        };
        let path = self.options.output_dir.join(OUTPUT_FILE);
        tokio::fs::write(&path, serde_json::to_vec_pretty(&report)?).await?;
        info!(
            "Scraped {} articles into {}",
            report.total_articles,
            path.display()
        );
        Ok(report)
    }

    /// A failed or missing page ends pagination.
    async fn scrape_page(&self, page: u32) -> ListingPage {
        let url = page_url(&self.options.base_url, page);
        info!("Scraping page {}: {}", page, url);
        let stop = ListingPage {
            articles: Vec::new(),
            has_more: false,
        };

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch page {}: {}", page, e);
                return stop;
            }
        };
        if response.status() == StatusCode::NOT_FOUND {
            info!("Page {} not found, stopping", page);
            return stop;
        }
        if !response.status().is_success() {
            warn!("Page {} returned HTTP {}", page, response.status());
            return stop;
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read page {}: {}", page, e);
                return stop;
            }
        };
        match parse_listing(&body, &self.host) {
            Ok(listing) => {
                info!("Found {} articles on page {}", listing.articles.len(), page);
                listing
            }
            Err(e) => {
                warn!("Failed to parse page {}: {}", page, e);
                stop
            }
        }
    }

    /// Loads `articles[start..start + batch_size]` into storage. Skipped
    /// slugs and existing posts are counted, not fetched.
    #[instrument(skip(self, storage, articles), fields(total = articles.len()))]
    pub async fn load_into(
        &self,
        storage: &dyn Storage,
        articles: &[ScrapedArticle],
        start: usize,
        batch_size: usize,
    ) -> Result<LoadReport> {
        let total = articles.len();
        let end = start.saturating_add(batch_size).min(total);
        let mut report = LoadReport::default();
        if start >= end {
            return Ok(report);
        }
        info!("Loading articles {} to {} of {}", start + 1, end, total);

        for (index, article) in articles.iter().enumerate().take(end).skip(start) {
            if SKIP_SLUGS.contains(&article.slug.as_str())
                || storage.get_blog_by_slug(&article.slug).await?.is_some()
            {
                debug!("Skipping {}", article.slug);
                report.skipped += 1;
                continue;
            }
            let post = match self.fetch_article(&article.url).await {
                Some(content) => article_post(article, content, index, total),
                None => None,
            };
            match post {
                Some(post) => {
                    if store_post(storage, &post).await? {
                        info!("Loaded {} ({} chars)", post.slug, post.content.len());
                        report.imported += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                None => {
                    warn!("No usable content for {}", article.url);
                    report.errors += 1;
                }
            }
            tokio::time::sleep(self.options.article_delay).await;
        }
        info!(
            "Batch done: {} imported, {} skipped, {} errors",
            report.imported, report.skipped, report.errors
        );
        Ok(report)
    }

    async fn fetch_article(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Article {} returned HTTP {}", url, response.status());
                return None;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };
        let body = response.text().await.ok()?;
        extract_article(&body)
    }

    /// Returns the public path of the stored image. Existing files are kept.
    async fn download_thumbnail(&self, image_url: &str, slug: &str) -> Option<String> {
        let filename = thumbnail_filename(image_url, slug);
        let public = format!("{}/{}", self.options.public_prefix.trim_end_matches('/'), filename);
        let path = self.options.output_dir.join(&filename);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("Thumbnail already present: {}", filename);
            return Some(public);
        }

        let bytes = match self.client.get(image_url).send().await {
            Ok(response) if response.status().is_success() => response.bytes().await.ok()?,
            Ok(response) => {
                warn!("Thumbnail {} returned HTTP {}", image_url, response.status());
                return None;
            }
            Err(e) => {
                warn!("Failed to download {}: {}", image_url, e);
                return None;
            }
        };
        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                info!("Downloaded {}", filename);
                Some(public)
            }
            Err(e) => {
                warn!("Failed to save {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="post">
            <div class="thumb"><img src="data:image/gif;base64,xx" data-lazy-src="https://homeglazer.com/wp-content/uploads/pu.png"></div>
            <h3>PU Polish Guide</h3>
            <p><a href="https://www.homeglazer.com/pu-polish-guide/">Read More »</a></p>
          </div>
          <div class="post">
            <img srcset="https://homeglazer.com/a-300.webp 300w, https://homeglazer.com/a.webp 800w">
            <h3>  </h3>
            <a href="http://homeglazer.com/duco-paint/">read more</a>
          </div>
          <div class="post"><h3>Elsewhere</h3><a href="https://example.com/x/">Read More</a></div>
          <a href="/page/2/">Next »</a>
        </body></html>
    "#;

    #[test]
    fn parses_listing_cards() {
        let page = parse_listing(LISTING, "homeglazer.com").unwrap();
        assert!(page.has_more);
        assert_eq!(page.articles.len(), 2);

        let first = &page.articles[0];
        assert_eq!(first.url, "https://homeglazer.com/pu-polish-guide/");
        assert_eq!(first.slug, "pu-polish-guide");
        assert_eq!(first.title, "PU Polish Guide");
        assert_eq!(
            first.thumbnail_original.as_deref(),
            Some("https://homeglazer.com/wp-content/uploads/pu.png")
        );

        let second = &page.articles[1];
        assert_eq!(second.url, "https://homeglazer.com/duco-paint/");
        assert_eq!(second.title, "duco-paint");
        assert_eq!(
            second.thumbnail_original.as_deref(),
            Some("https://homeglazer.com/a-300.webp")
        );
    }

    #[test]
    fn last_page_has_no_next_link() {
        let page = parse_listing("<html><body><p>nothing</p></body></html>", "homeglazer.com").unwrap();
        assert!(!page.has_more);
        assert!(page.articles.is_empty());
    }

    fn scraped(slug: &str, title: &str) -> ScrapedArticle {
        ScrapedArticle {
            title: title.to_string(),
            url: format!("https://homeglazer.com/{slug}/"),
            slug: slug.to_string(),
            thumbnail_original: None,
            thumbnail: Some(format!("/uploads/blogs/{slug}.jpg")),
        }
    }

    const ARTICLE: &str = r#"
        <html><body>
          <header><p>Site header that should not appear in the body text</p></header>
          <article>
            <h2>Why PU Polish</h2>
            <p style="color:red">PU polish gives wooden furniture a hard, glossy finish that lasts for years.</p>
            <figure><p>Caption text</p></figure>
            <ul><li>Scratch resistant</li><li><p>Water &amp; heat resistant</p></li></ul>
            <aside><p>Related posts</p></aside>
          </article>
        </body></html>
    "#;

    #[test]
    fn categories_follow_title_keywords() {
        assert_eq!(
            assign_categories("PU Polish vs Melamine: Which Is Better?"),
            vec!["Wood Services", "Wood Polishing", "Comparisons"]
        );
        assert_eq!(
            assign_categories("Asian Paints Royale colour shades for your home"),
            vec!["Residential Painting", "Paint Brands", "Asian Paints", "Color Ideas"]
        );
        assert_eq!(assign_categories("Canvas art ideas"), vec!["Paint Tips"]);
    }

    #[test]
    fn read_time_is_clamped() {
        assert_eq!(estimate_read_time(0), "3");
        assert_eq!(estimate_read_time(5_000), "5");
        assert_eq!(estimate_read_time(1_000_000), "15");
    }

    #[test]
    fn extracts_clean_article_body() {
        let body = extract_article(ARTICLE).unwrap();
        assert_eq!(
            body,
            "<h2>Why PU Polish</h2>\n\
             <p>PU polish gives wooden furniture a hard, glossy finish that lasts for years.</p>\n\
             <ul><li>Scratch resistant</li><li>Water &amp; heat resistant</li></ul>"
        );
        assert!(extract_article("<html><body><p>no container</p></body></html>").is_none());
    }

    #[test]
    fn builds_published_post_from_article() {
        let article = scraped("pu-polish-guide", "PU Polish Guide");
        let content = extract_article(ARTICLE).unwrap();
        let post = article_post(&article, content, 0, 10).unwrap();
        assert!(post.published);
        assert_eq!(post.author, BLOG_AUTHOR);
        assert_eq!(post.read_time.as_deref(), Some("3"));
        assert_eq!(post.cover_image.as_deref(), Some("/uploads/blogs/pu-polish-guide.jpg"));
        assert!(post.excerpt.starts_with("PU polish gives wooden furniture"));
        assert!(post.excerpt.ends_with("..."));
        assert_eq!(post.categories, vec!["Wood Services", "Wood Polishing", "Paint Tips"]);
        assert_eq!(post.published_at.unwrap().to_rfc3339(), "2025-11-01T00:00:00+00:00");

        assert!(article_post(&article, "<p>short</p>".to_string(), 0, 10).is_none());
    }

    #[test]
    fn later_articles_are_dated_earlier() {
        let middle = published_at(5, 10).unwrap();
        assert_eq!(middle.date_naive().to_string(), "2024-11-01");
        assert!(published_at(9, 10).unwrap() < middle);
        assert!(published_at(0, 0).is_some());
    }

    #[tokio::test]
    async fn existing_slugs_are_not_stored_twice() {
        let storage = crate::storage::InMemoryStorage::new();
        let article = scraped("pu-polish-guide", "PU Polish Guide");
        let post = article_post(&article, extract_article(ARTICLE).unwrap(), 0, 1).unwrap();
        assert!(store_post(&storage, &post).await.unwrap());
        assert!(!store_post(&storage, &post).await.unwrap());
        assert_eq!(storage.list_blogs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn skipped_and_existing_articles_are_not_fetched() {
        let storage = crate::storage::InMemoryStorage::new();
        let existing = scraped("pu-polish-guide", "PU Polish Guide");
        let post = article_post(&existing, extract_article(ARTICLE).unwrap(), 0, 1).unwrap();
        storage.create_blog(&post).await.unwrap();

        let articles = vec![scraped(SKIP_SLUGS[0], "Veneer shades"), existing];
        let importer =
            BlogImporter::new(ImportOptions::new("https://homeglazer.com/blog", "unused")).unwrap();
        let report = importer.load_into(&storage, &articles, 0, 25).await.unwrap();
        assert_eq!(
            report,
            LoadReport {
                imported: 0,
                skipped: 2,
                errors: 0
            }
        );
        assert_eq!(importer.load_into(&storage, &articles, 5, 25).await.unwrap(), LoadReport::default());
    }

    #[test]
    fn url_helpers() {
        assert_eq!(
            site_host("https://www.homeglazer.com/painting-and-wood-coating-blog").as_deref(),
            Some("homeglazer.com")
        );
        assert_eq!(page_url("https://h.com/blog/", 1), "https://h.com/blog");
        assert_eq!(page_url("https://h.com/blog", 3), "https://h.com/blog/page/3/");
        assert_eq!(thumbnail_filename("https://h.com/x/pu.png?v=2", "pu"), "pu.png");
        assert_eq!(thumbnail_filename("https://h.com/x/image", "a/b"), "a-b.jpg");
    }
}
