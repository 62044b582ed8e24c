//! YAML configuration plus environment-provided secrets.
//!
//! Every section has serde defaults, so a minimal file only needs the
//! sender details and the contacts path. Secrets never live in the file:
//! they are read from the environment (or `.env`, loaded by the binary)
//! when the component that needs them is built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::rate_limit::RateLimiter;
use crate::scrape::{DEFAULT_THIN_CONTENT_THRESHOLD, ScrapePolicy};

/// Default environment variable holding the remote scraping service key.
pub const REMOTE_SCRAPER_KEY_ENV: &str = "FIRECRAWL_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub sender: SenderConfig,
    #[serde(default)]
    pub resume: ResumeConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeConfig {
    /// `.txt`, `.md` or `.pdf` summary of the sender's background.
    pub text_path: Option<PathBuf>,
    /// Files attached to every sent email, e.g. the CV as PDF.
    #[serde(default)]
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactsConfig {
    #[serde(default = "default_contacts_path")]
    pub path: PathBuf,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            path: default_contacts_path(),
        }
    }
}

fn default_contacts_path() -> PathBuf {
    PathBuf::from("contacts.json")
}

/// Which scraper implementation a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScraperProvider {
    #[default]
    Local,
    #[serde(alias = "firecrawl")]
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub provider: ScraperProvider,
    /// Minimum spacing between scrapes. Zero or negative disables throttling.
    pub rate_limit_ms: i64,
    pub timeout_ms: u64,
    /// Character cap on scraped markdown. Zero means unlimited.
    pub max_content_length: usize,
    pub render_fallback: bool,
    pub thin_content_threshold: usize,
    pub remote_base_url: String,
    /// Name of the environment variable holding the remote service key.
    pub remote_api_key_env: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            provider: ScraperProvider::Local,
            rate_limit_ms: 1000,
            timeout_ms: 30_000,
            max_content_length: 8000,
            render_fallback: true,
            thin_content_threshold: DEFAULT_THIN_CONTENT_THRESHOLD,
            remote_base_url: "https://api.firecrawl.dev".to_string(),
            remote_api_key_env: REMOTE_SCRAPER_KEY_ENV.to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::from_millis(self.rate_limit_ms)
    }

    pub fn policy(&self) -> ScrapePolicy {
        ScrapePolicy {
            thin_content_threshold: self.thin_content_threshold,
            max_content_length: self.max_content_length,
            render_fallback: self.render_fallback,
        }
    }

    /// Reads the remote scraping key from the environment.
    pub fn remote_api_key(&self) -> Result<String, AppError> {
        require_env(&self.remote_api_key_env).map_err(|_| {
            AppError::ConfigError(format!(
                "{} is required when the scraper provider is remote",
                self.remote_api_key_env
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub rate_limit_ms: i64,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            rate_limit_ms: 1000,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::from_millis(self.rate_limit_ms)
    }

    pub fn api_key(&self) -> Result<String, AppError> {
        require_env(&self.api_key_env)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    /// 465 means implicit TLS; any other port upgrades with STARTTLS.
    pub port: u16,
    pub username_env: String,
    pub password_env: String,
    pub rate_limit_ms: i64,
    pub timeout_ms: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username_env: "SMTP_USERNAME".to_string(),
            password_env: "SMTP_PASSWORD".to_string(),
            rate_limit_ms: 5000,
            timeout_ms: 30_000,
        }
    }
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::from_millis(self.rate_limit_ms)
    }

    /// Reads the SMTP username and password from the environment.
    pub fn credentials(&self) -> Result<(String, String), AppError> {
        Ok((require_env(&self.username_env)?, require_env(&self.password_env)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/emails.json")
}

fn require_env(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::ConfigError(format!(
            "environment variable {name} is not set"
        ))),
    }
}

impl AppConfig {
    /// Parses a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(raw).map_err(|e| AppError::ConfigError(format!("invalid config: {e}")))
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("reading config {}: {e}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }
}
