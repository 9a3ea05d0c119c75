use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use glazer_site::api::AppState;
use glazer_site::config::Config;
use glazer_site::notify::MemoryNotifier;
use glazer_site::seed::upsert_admin;
use glazer_site::server::create_server;
use glazer_site::db::SqliteStorage;
use glazer_site::storage::{InMemoryStorage, Storage};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@homeglazer.com";
const ADMIN_PASSWORD: &str = "admin123";

struct TestApp {
    router: Router,
    notifier: Arc<MemoryNotifier>,
}

struct Reply {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

async fn build_app(
    storage: Arc<dyn Storage>,
    notifier: MemoryNotifier,
    uploads_dir: Option<&Path>,
) -> Result<TestApp> {
    upsert_admin(storage.as_ref(), ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let mut config = Config::default();
    config.auth.jwt_secret = "test-secret".to_string();
    config.mail.company_inbox = "company@example.com".to_string();
    if let Some(dir) = uploads_dir {
        config.site.uploads_dir = dir.to_string_lossy().into_owned();
    }

    let notifier = Arc::new(notifier);
    let state = AppState::new(storage, notifier.clone(), config);
    Ok(TestApp {
        router: create_server(state),
        notifier,
    })
}

async fn test_app_with(notifier: MemoryNotifier) -> Result<TestApp> {
    build_app(Arc::new(InMemoryStorage::new()), notifier, None).await
}

async fn test_app() -> Result<TestApp> {
    test_app_with(MemoryNotifier::new()).await
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Result<Reply> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = hyper::body::to_bytes(response.into_body()).await?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok(Reply {
            status,
            set_cookie,
            body,
        })
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Result<Reply> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    /// Posts a multipart form with a `type` field and one `image` file part.
    async fn upload(
        &self,
        kind: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
        cookie: Option<&str>,
    ) -> Result<Reply> {
        const BOUNDARY: &str = "glazer-boundary";
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{kind}\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    async fn login(&self) -> Result<String> {
        let reply = self
            .call(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
                None,
            )
            .await?;
        assert_eq!(reply.status, StatusCode::OK);
        let cookie = reply.set_cookie.expect("login sets a cookie");
        Ok(cookie.split(';').next().unwrap_or_default().to_string())
    }

    async fn create_brand(&self, cookie: &str, slug: &str) -> Result<Value> {
        let reply = self
            .call(
                "POST",
                "/api/brands",
                Some(json!({
                    "name": "Asian Paints",
                    "slug": slug,
                    "logo": "/assets/images/brand-logos/asian-paints-logo.webp",
                    "description": "India's leading paint company"
                })),
                Some(cookie),
            )
            .await?;
        assert_eq!(reply.status, StatusCode::CREATED);
        Ok(reply.body)
    }
}

#[tokio::test]
async fn health_reports_healthy() -> Result<()> {
    let app = test_app().await?;
    let reply = app.call("GET", "/health", None, None).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn writes_require_a_token() -> Result<()> {
    let app = test_app().await?;
    let reply = app
        .call("POST", "/api/brands", Some(json!({ "name": "X" })), None)
        .await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Authentication required");

    let reply = app
        .call("POST", "/api/blogs", Some(json!({})), Some("token=garbage"))
        .await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn login_sets_cookie_and_session_reads_it() -> Result<()> {
    let app = test_app().await?;

    let bad = app
        .call(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
            None,
        )
        .await?;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["error"], "Invalid email or password");

    let invalid = app
        .call("POST", "/api/auth/login", Some(json!({ "email": "nope" })), None)
        .await?;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        invalid.body["details"],
        json!(["Invalid email address", "Password is required"])
    );

    let cookie = app.login().await?;
    assert!(cookie.starts_with("token="));

    let session = app.call("GET", "/api/auth/session", None, Some(&cookie)).await?;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["authenticated"], true);
    assert_eq!(session.body["user"]["email"], ADMIN_EMAIL);

    let anonymous = app.call("GET", "/api/auth/session", None, None).await?;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "Not authenticated");

    let logout = app.call("POST", "/api/auth/logout", None, None).await?;
    assert!(logout.set_cookie.unwrap_or_default().contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn brands_reject_duplicate_slugs() -> Result<()> {
    let app = test_app().await?;
    let cookie = app.login().await?;
    let brand = app.create_brand(&cookie, "asian-paints").await?;

    let duplicate = app
        .call(
            "POST",
            "/api/brands",
            Some(json!({ "name": "A", "slug": "asian-paints", "logo": "/a.png", "description": "d" })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["error"], "Brand with this slug already exists");

    let missing = app
        .call("POST", "/api/brands", Some(json!({ "name": "A" })), Some(&cookie))
        .await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "Missing required fields");

    let list = app.call("GET", "/api/brands", None, None).await?;
    assert_eq!(list.body[0]["slug"], "asian-paints");
    assert_eq!(list.body[0]["_count"]["products"], 0);

    let uri = format!("/api/brands/{}", brand["id"].as_str().unwrap_or_default());
    let deleted = app.call("DELETE", &uri, None, Some(&cookie)).await?;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Brand deleted successfully");
    let gone = app.call("GET", &uri, None, Some(&cookie)).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn products_are_unique_per_brand_and_listed_with_filters() -> Result<()> {
    let app = test_app().await?;
    let cookie = app.login().await?;
    let brand = app.create_brand(&cookie, "asian-paints").await?;
    let brand_id = brand["id"].as_str().unwrap_or_default().to_string();

    let product = json!({
        "brandId": brand_id,
        "name": "Royale Matt",
        "slug": "royale-matt",
        "description": "Luxury interior emulsion",
        "category": "Interior",
        "sheenLevel": "Mat",
        "surfaceType": "Interior Wall",
        "usage": "Home",
        "image": "/assets/images/bucket.png",
        "prices": { "1L": "450", "4L": 1700 }
    });
    let created = app
        .call("POST", "/api/products", Some(product.clone()), Some(&cookie))
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["prices"]["1L"], 450.0);
    assert_eq!(created.body["brand"]["slug"], "asian-paints");

    let duplicate = app
        .call("POST", "/api/products", Some(product), Some(&cookie))
        .await?;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(
        duplicate.body["error"],
        "Product with this slug already exists for this brand"
    );

    let other = app
        .call(
            "POST",
            "/api/products",
            Some(json!({
                "brandId": brand_id,
                "name": "Tractor Emulsion",
                "slug": "tractor-emulsion",
                "category": "Interior",
                "relatedProductIds": [created.body["id"], created.body["id"]]
            })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(other.status, StatusCode::CREATED);
    assert_eq!(other.body["relatedProducts"].as_array().map(Vec::len), Some(1));

    let page = app
        .call("GET", "/api/products?search=ROYALE&limit=1", None, None)
        .await?;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["pagination"]["total"], 1);
    assert_eq!(page.body["data"][0]["slug"], "royale-matt");

    let storefront = app
        .call(
            "GET",
            "/api/products/by-slug?brand=asian-paints&slug=tractor-emulsion",
            None,
            None,
        )
        .await?;
    assert_eq!(storefront.status, StatusCode::OK);
    assert_eq!(storefront.body["product"]["brand"], "Asian Paints");
    assert_eq!(storefront.body["relatedProducts"][0]["slug"], "royale-matt");
    assert_eq!(storefront.body["brandSlug"], "asian-paints");

    let missing = app
        .call("GET", "/api/products/by-slug?brand=asian-paints", None, None)
        .await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/products/{}", created.body["id"].as_str().unwrap_or_default());
    let bad_price = app
        .call("PUT", &uri, Some(json!({ "prices": { "4L": -5 } })), Some(&cookie))
        .await?;
    assert_eq!(bad_price.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_price.body["error"],
        "Invalid price for 4L. Must be a non-negative number."
    );

    let updated = app
        .call("PUT", &uri, Some(json!({ "prices": { "10L": 4200 } })), Some(&cookie))
        .await?;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["prices"]["1L"], 450.0);
    assert_eq!(updated.body["prices"]["10L"], 4200.0);
    Ok(())
}

#[tokio::test]
async fn reading_a_blog_counts_the_view() -> Result<()> {
    let app = test_app().await?;
    let cookie = app.login().await?;

    let created = app
        .call(
            "POST",
            "/api/blogs",
            Some(json!({
                "title": "Choosing a Sheen",
                "slug": "choosing-a-sheen",
                "excerpt": "Matt or gloss?",
                "content": "<p>It depends on the room.</p>",
                "author": "Home Glazer",
                "published": true,
                "categories": ["Painting"]
            })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body["publishedAt"].is_string());

    let duplicate = app
        .call(
            "POST",
            "/api/blogs",
            Some(json!({
                "title": "t", "slug": "choosing-a-sheen", "excerpt": "e",
                "content": "c", "author": "a"
            })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let uri = format!("/api/blogs/{}", created.body["id"].as_str().unwrap_or_default());
    let first = app.call("GET", &uri, None, None).await?;
    let second = app.call("GET", &uri, None, None).await?;
    assert_eq!(first.body["viewCount"], 1);
    assert_eq!(second.body["viewCount"], 2);

    let feed = app
        .call("GET", "/api/blogs?published=true&category=Painting", None, None)
        .await?;
    assert_eq!(feed.body.as_array().map(Vec::len), Some(1));

    let unpublished = app
        .call("PUT", &uri, Some(json!({ "published": false })), Some(&cookie))
        .await?;
    assert_eq!(unpublished.status, StatusCode::OK);
    assert!(unpublished.body["publishedAt"].is_null());
    Ok(())
}

#[tokio::test]
async fn wood_estimate_is_recomputed_and_mailed() -> Result<()> {
    let app = test_app().await?;
    let reply = app
        .call(
            "POST",
            "/api/calculator-wood",
            Some(json!({
                "fullName": "Asha Verma",
                "email": "asha@example.com",
                "phone": "9876543210",
                "inputMethod": "items",
                "itemCounts": { "doors": 2, "windows": 3, "wallPanels": 1, "furnitureArea": 20 },
                "finishType": "Lacquer",
                "finishBrand": "Wembley",
                "total": 1
            })),
            None,
        )
        .await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["estimate"]["totalArea"], 320.0);
    assert_eq!(reply.body["estimate"]["total"], 25600.0);
    assert_eq!(reply.body["estimate"]["totalFormatted"], "₹25,600");

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "company@example.com");
    assert_eq!(sent[1].to, "asha@example.com");
    Ok(())
}

#[tokio::test]
async fn painting_estimate_prices_the_ceiling_separately() -> Result<()> {
    let app = test_app().await?;
    let reply = app
        .call(
            "POST",
            "/api/calculator-painting",
            Some(json!({
                "fullName": "Asha Verma",
                "email": "asha@example.com",
                "paintingType": "interior",
                "workType": "fresh",
                "area": 2500,
                "areaType": "carpet",
                "interiorPaint": { "category": "economical", "brand": "asian-paints", "type": "22" },
                "separateCeilingPaint": true,
                "ceilingPaint": { "category": "economical", "brand": "asian-paints", "type": "24" }
            })),
            None,
        )
        .await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Estimates sent successfully");
    assert_eq!(reply.body["estimate"]["interior"]["wallCost"], 33000.0);
    assert_eq!(reply.body["estimate"]["interior"]["ceilingCost"], 24000.0);
    assert_eq!(reply.body["estimate"]["grandTotal"], 57000.0);
    assert_eq!(reply.body["estimate"]["grandTotalFormatted"], "₹57,000");

    let missing = app
        .call(
            "POST",
            "/api/calculator-painting",
            Some(json!({ "paintingType": "interior", "email": "asha@example.com" })),
            None,
        )
        .await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn contact_form_validation_and_delivery() -> Result<()> {
    let app = test_app().await?;
    let short = app
        .call(
            "POST",
            "/api/contact",
            Some(json!({
                "name": "Ravi", "email": "ravi@example.com", "phone": "9876543210",
                "service": "interior", "message": "short"
            })),
            None,
        )
        .await?;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["error"], "Message should be at least 10 characters");

    let ok = app
        .call(
            "POST",
            "/api/contact",
            Some(json!({
                "name": "Ravi", "email": "ravi@example.com", "phone": "9876543210",
                "service": "interior", "message": "Please call me about my flat."
            })),
            None,
        )
        .await?;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["success"], true);
    assert_eq!(app.notifier.sent()[0].subject, "New Contact Message from Ravi");
    Ok(())
}

#[tokio::test]
async fn company_mail_failure_is_a_server_error() -> Result<()> {
    let app = test_app_with(MemoryNotifier::failing_for("company@example.com")).await?;
    let reply = app
        .call(
            "POST",
            "/api/enquiry",
            Some(json!({
                "name": "Ravi", "email": "ravi@example.com", "phone": "9876543210",
                "property": "apartment", "service": "interior"
            })),
            None,
        )
        .await?;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"], "Failed to send email. Please try again later.");
    Ok(())
}

#[tokio::test]
async fn sitemap_lists_pages() -> Result<()> {
    let app = test_app().await?;
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/sitemap.xml").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let xml = String::from_utf8(bytes.to_vec())?;
    assert!(xml.contains("<loc>https://homeglazer.com/about</loc>"));
    Ok(())
}

#[tokio::test]
async fn catalog_round_trip_on_sqlite() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = Arc::new(SqliteStorage::open(dir.path().join("site.db"))?);
    let app = build_app(storage, MemoryNotifier::new(), None).await?;
    let cookie = app.login().await?;
    let brand = app.create_brand(&cookie, "asian-paints").await?;
    let brand_id = brand["id"].as_str().unwrap_or_default().to_string();

    let nan = app
        .call(
            "POST",
            "/api/products",
            Some(json!({
                "brandId": brand_id, "name": "Apex", "slug": "apex",
                "category": "Exterior", "prices": { "1L": "NaN" }
            })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(nan.status, StatusCode::BAD_REQUEST);
    assert_eq!(nan.body["error"], "Invalid price for 1L. Must be a non-negative number.");

    let created = app
        .call(
            "POST",
            "/api/products",
            Some(json!({
                "brandId": brand_id, "name": "Royale Matt", "slug": "royale-matt",
                "category": "Interior", "prices": { "1L": 450, "4L": "1700" }
            })),
            Some(&cookie),
        )
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    let uri = format!("/api/products/{}", created.body["id"].as_str().unwrap_or_default());

    let infinite = app
        .call("PUT", &uri, Some(json!({ "prices": { "4L": "inf" } })), Some(&cookie))
        .await?;
    assert_eq!(infinite.status, StatusCode::BAD_REQUEST);
    assert_eq!(infinite.body["error"], "Invalid price for 4L. Must be a non-negative number.");

    let merged = app
        .call("PUT", &uri, Some(json!({ "prices": { "10L": 4200 } })), Some(&cookie))
        .await?;
    assert_eq!(merged.status, StatusCode::OK);

    let listed = app.call("GET", "/api/products", None, None).await?;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["pagination"]["total"], 1);
    let prices = &listed.body["data"][0]["prices"];
    assert_eq!(prices["1L"], 450.0);
    assert_eq!(prices["4L"], 1700.0);
    assert_eq!(prices["10L"], 4200.0);

    let far_page = app
        .call("GET", "/api/products?page=18446744073709551615&limit=2", None, None)
        .await?;
    assert_eq!(far_page.status, StatusCode::OK);
    assert_eq!(far_page.body["data"].as_array().map(Vec::len), Some(0));

    let deleted = app
        .call("DELETE", &format!("/api/brands/{brand_id}"), None, Some(&cookie))
        .await?;
    assert_eq!(deleted.status, StatusCode::OK);
    let after = app.call("GET", "/api/products", None, None).await?;
    assert_eq!(after.body["pagination"]["total"], 0);
    let gone = app.call("GET", &uri, None, None).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn uploads_are_checked_and_stored_by_type() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let app = build_app(
        Arc::new(InMemoryStorage::new()),
        MemoryNotifier::new(),
        Some(dir.path()),
    )
    .await?;
    let png = b"\x89PNG\r\n\x1a\nfake image";

    let anonymous = app.upload("brand", "logo.png", "image/png", png, None).await?;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let cookie = app.login().await?;
    let bad_kind = app.upload("avatar", "logo.png", "image/png", png, Some(&cookie)).await?;
    assert_eq!(bad_kind.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_kind.body["error"],
        "Invalid type. Must be \"brand\", \"product\", \"blog\", or \"document\""
    );

    let bad_mime = app
        .upload("brand", "notes.txt", "text/plain", b"hello", Some(&cookie))
        .await?;
    assert_eq!(bad_mime.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_mime.body["error"],
        "Invalid file type. Only JPEG, PNG, WebP, and PDF are allowed."
    );

    let huge = vec![0u8; 5 * 1024 * 1024 + 1];
    let too_large = app
        .upload("product", "big.png", "image/png", &huge, Some(&cookie))
        .await?;
    assert_eq!(too_large.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_large.body["error"], "File size too large. Maximum 5MB allowed.");

    let stored = app
        .upload("brand", "Logo.PNG", "image/png", png, Some(&cookie))
        .await?;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.body["success"], true);
    let filename = stored.body["filename"].as_str().unwrap_or_default();
    assert!(filename.ends_with(".png"));
    assert_eq!(stored.body["url"], format!("/uploads/brands/{filename}"));
    assert_eq!(std::fs::read(dir.path().join("brands").join(filename))?, png);

    let served = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/brands/{filename}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(served.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn homepage_contact_mails_company_and_customer() -> Result<()> {
    let app = test_app().await?;
    let bad_mobile = app
        .call(
            "POST",
            "/api/homepage-contact",
            Some(json!({
                "name": "Ravi", "email": "ravi@example.com", "mobile": "12",
                "message": "Need a quote for my flat."
            })),
            None,
        )
        .await?;
    assert_eq!(bad_mobile.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_mobile.body["error"], "Invalid mobile number");

    let ok = app
        .call(
            "POST",
            "/api/homepage-contact",
            Some(json!({
                "name": "Ravi", "email": "ravi@example.com", "mobile": "9876543210",
                "message": "Need a quote for my flat."
            })),
            None,
        )
        .await?;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(
        ok.body["message"],
        "Message sent successfully! We will get back to you within 24 hours."
    );
    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "New Homepage Inquiry - Ravi");
    assert_eq!(sent[1].subject, "Thank You for Contacting Home Glazer");
    Ok(())
}
