use anyhow::{bail, Context, Result};

/// Request body size cap. Resume binaries travel fully in memory, so this
/// bounds per-request memory as well.
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Validated at startup: in production mode the JWT secrets are required;
/// in development they fall back to non-secret defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub rust_log: String,
    pub production: bool,
    pub using_default_secrets: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let access_secret = std::env::var("JWT_SECRET").ok();
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET").ok();

        if production && (access_secret.is_none() || refresh_secret.is_none()) {
            bail!("JWT_SECRET and JWT_REFRESH_SECRET are required when APP_ENV=production");
        }

        let using_default_secrets = access_secret.is_none() || refresh_secret.is_none();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            access_token_secret: access_secret.unwrap_or_else(|| "access_secret_key".to_string()),
            refresh_token_secret: refresh_secret.unwrap_or_else(|| "refresh_secret_key".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_BODY_BYTES must be a byte count")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            production,
            using_default_secrets,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
