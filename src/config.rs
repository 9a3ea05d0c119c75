use crate::error::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Longest accepted session, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub site: SiteConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/site.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: 7,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub company_inbox: String,
    pub outbox_dir: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            company_inbox: "homeglazer@gmail.com".to_string(),
            outbox_dir: "outbox".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub uploads_dir: String,
    pub blog_source_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://homeglazer.com".to_string(),
            uploads_dir: "public/uploads".to_string(),
            blog_source_url: "https://homeglazer.com/painting-and-wood-coating-blog".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@homeglazer.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

impl Config {
    /// Reads `config.toml` when present, then applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                AppError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            toml::from_str(&config_content)?
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Config::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Ok(path) = env::var("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Ok(secret) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(email) = env::var("ADMIN_EMAIL") {
            self.seed.admin_email = email;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            self.seed.admin_password = password;
        }
        if let Ok(inbox) = env::var("COMPANY_INBOX") {
            self.mail.company_inbox = inbox;
        }
        if let Ok(url) = env::var("SITE_BASE_URL") {
            self.site.base_url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.auth.token_ttl_days <= 0 || self.auth.token_ttl_days > MAX_TOKEN_TTL_DAYS {
            return Err(AppError::Config(format!(
                "auth.token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}"
            )));
        }
        Ok(())
    }

    /// The signing secret, or a fixed development secret when none is configured.
    pub fn jwt_secret(&self) -> String {
        if self.auth.jwt_secret.is_empty() {
            warn!("JWT_SECRET is not set; using the development secret");
            "development-only-secret-change-me".to_string()
        } else {
            self.auth.jwt_secret.clone()
        }
    }
}
