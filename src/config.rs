/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT 鍵, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to verify access tokens.
///
/// The PEM variant wins when both are configured.
#[derive(Clone)]
pub enum JwtKeyConfig {
    Secret(String),
    EdPublicPem(String),
}

impl fmt::Debug for JwtKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            JwtKeyConfig::Secret(_) => f.write_str("Secret(..)"),
            JwtKeyConfig::EdPublicPem(_) => f.write_str("EdPublicPem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None: development only, notes are kept in memory
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub jwt_key: JwtKeyConfig,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    // Production CORS allowlist, validated at startup
    pub cors_allowed_origins: Vec<HeaderValue>,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = non_empty_var("DATABASE_URL");
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let jwt_key = match non_empty_var("ACCESS_JWT_PUBLIC_KEY_PEM") {
            Some(pem) => JwtKeyConfig::EdPublicPem(pem.replace("\\n", "\n")),
            None => {
                let secret = std::env::var("JWT_SECRET_KEY")
                    .map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?;
                if secret.trim().is_empty() {
                    return Err(ConfigError::Invalid("JWT_SECRET_KEY"));
                }
                JwtKeyConfig::Secret(secret)
            }
        };

        let auth_issuer = non_empty_var("AUTH_ISSUER");
        let auth_audience = non_empty_var("AUTH_AUDIENCE");

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default())?;

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_key,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            cors_allowed_origins,
            request_body_limit_bytes,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated origin allowlist (`scheme://host[:port]`).
///
/// Blank entries are dropped. Anything that is not a bare http(s) origin
/// fails startup instead of being skipped.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            let rest = origin
                .strip_prefix("https://")
                .or_else(|| origin.strip_prefix("http://"))
                .ok_or(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))?;
            if rest.is_empty() || rest.contains('/') {
                return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
            }
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))
        })
        .collect()
}
