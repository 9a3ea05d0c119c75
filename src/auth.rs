//! Admin authentication: argon2 password hashes and HS256 session tokens
//! carried in the `token` cookie or an `Authorization: Bearer` header.

use crate::error::{AppError, Result};
use crate::types::User;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_COOKIE: &str = "token";

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_days: i64,
    secure_cookies: bool,
}

impl AuthKeys {
    pub fn new(secret: &str, ttl_days: i64, secure_cookies: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_days,
            secure_cookies,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.ttl_days)).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }

    fn max_age(&self) -> i64 {
        self.ttl_days * 24 * 60 * 60
    }

    pub fn login_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Strict; Max-Age={}",
            self.max_age()
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn logout_cookie(&self) -> String {
        let mut cookie = format!("{TOKEN_COOKIE}=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0");
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Cookie first, then bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("token="))
        .find(|token| !token.is_empty())
        .map(str::to_string);

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// The signed-in admin. Handlers that take this reject anonymous requests
/// with 401.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let keys = AuthKeys::from_ref(state);
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
        let invalid = || AppError::Unauthorized("Invalid or expired token".to_string());
        let claims = keys.verify(&token).map_err(|_| invalid())?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| invalid())?;
        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn hashes_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
        assert!(!verify_password("admin123", "not-a-hash"));
    }

    #[test]
    fn tokens_round_trip_and_reject_other_secrets() {
        let keys = AuthKeys::new("secret-a", 7, false);
        let user = User::new("admin@homeglazer.com", "x");
        let token = keys.issue(&user).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.exp - claims.iat, 7 * 86400);

        let other = AuthKeys::new("secret-b", 7, false);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_fail() {
        let keys = AuthKeys::new("s", -1, false);
        let token = keys.issue(&User::new("a@b.co", "x")).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn cookie_strings() {
        let keys = AuthKeys::new("s", 7, true);
        assert_eq!(
            keys.login_cookie("abc"),
            "token=abc; HttpOnly; Path=/; SameSite=Strict; Max-Age=604800; Secure"
        );
        assert!(keys.logout_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn reads_cookie_before_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=from-cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));

        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
