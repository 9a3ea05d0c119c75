use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static slug pattern"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\- ]{10,15}$").expect("static phone pattern"));

pub fn is_slug(value: &str) -> bool {
    SLUG.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

/// Absolute http(s) URL or a site-relative path.
pub fn is_asset_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/')
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Collects every failed check so a form gets all of its errors at once.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    pub fn required(&mut self, value: Option<&str>, message: impl Into<String>) -> &mut Self {
        self.check(!is_blank(value), message)
    }

    /// When present the value must be non-blank.
    pub fn non_blank(&mut self, value: Option<&str>, message: impl Into<String>) -> &mut Self {
        self.check(value.map_or(true, |v| !v.trim().is_empty()), message)
    }

    pub fn slug(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => {
                self.check(is_slug(v), "Slug must be lowercase alphanumeric with hyphens")
            }
            _ => self,
        }
    }

    pub fn email(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.check(is_email(v.trim()), "Invalid email address"),
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns() {
        assert!(is_slug("asian-paints-2"));
        assert!(!is_slug("Asian Paints"));
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(is_phone("+91 98765-43210"));
        assert!(!is_phone("12345"));
        assert!(!is_phone("98765x43210"));
        assert!(is_asset_url("/uploads/logo.png"));
        assert!(is_asset_url("https://cdn.example.com/x.png"));
        assert!(!is_asset_url("ftp://x"));
    }

    #[test]
    fn collects_all_failures() {
        let err = Checks::new()
            .required(None, "Title is required")
            .required(Some("  "), "Excerpt is required")
            .slug(Some("Bad Slug"))
            .email(Some("x"))
            .required(Some("ok"), "never")
            .finish()
            .unwrap_err();
        match err {
            AppError::Validation(details) => assert_eq!(
                details,
                vec![
                    "Title is required",
                    "Excerpt is required",
                    "Slug must be lowercase alphanumeric with hyphens",
                    "Invalid email address",
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn passes_when_clean() {
        assert!(Checks::new().slug(None).non_blank(None, "x").finish().is_ok());
        assert!(Checks::new().non_blank(Some(""), "x").finish().is_err());
    }
}
