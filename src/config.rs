/*
 * Responsibility
 * - 環境変数の読み込み (PORT, APP_ENV, PROXY_CONNECT_* など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
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

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Backend that decides on connection attempts.
    pub proxy_connect_endpoint: Url,
    pub proxy_connect_timeout: Duration,
    // Request headers forwarded to the backend (lower-case).
    pub proxy_http_headers: Vec<String>,

    pub http_body_limit_bytes: usize,
    pub http_request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment in production, a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let proxy_connect_endpoint = get("PROXY_CONNECT_ENDPOINT")
            .ok_or(ConfigError::Missing("PROXY_CONNECT_ENDPOINT"))?;
        let proxy_connect_endpoint = Url::parse(&proxy_connect_endpoint)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or(ConfigError::Invalid("PROXY_CONNECT_ENDPOINT"))?;

        let proxy_connect_timeout_ms = get("PROXY_CONNECT_TIMEOUT_MS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("PROXY_CONNECT_TIMEOUT_MS"))?
            .unwrap_or(1000);
        if proxy_connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("PROXY_CONNECT_TIMEOUT_MS"));
        }

        let proxy_http_headers = get("PROXY_HTTP_HEADERS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let http_body_limit_bytes = get("HTTP_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(64 * 1024);

        let http_request_timeout_secs = get("HTTP_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            proxy_connect_endpoint,
            proxy_connect_timeout: Duration::from_millis(proxy_connect_timeout_ms),
            proxy_http_headers,
            http_body_limit_bytes,
            http_request_timeout: Duration::from_secs(http_request_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("PROXY_CONNECT_ENDPOINT", "http://localhost:8000/connect")]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.proxy_connect_timeout, Duration::from_secs(1));
        assert!(config.proxy_http_headers.is_empty());
        assert_eq!(config.http_body_limit_bytes, 65536);
        assert_eq!(config.http_request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn endpoint_is_required() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing("PROXY_CONNECT_ENDPOINT")
        );
    }

    #[test]
    fn endpoint_must_be_http() {
        assert_eq!(
            load(&[("PROXY_CONNECT_ENDPOINT", "ftp://example.com")]).unwrap_err(),
            ConfigError::Invalid("PROXY_CONNECT_ENDPOINT")
        );
    }

    #[test]
    fn headers_are_normalized() {
        let config = load(&[
            ("PROXY_CONNECT_ENDPOINT", "https://auth.internal/connect"),
            ("PROXY_HTTP_HEADERS", " Cookie, X-Real-IP ,,"),
            ("PROXY_CONNECT_TIMEOUT_MS", "250"),
            ("APP_ENV", "prod"),
        ])
        .unwrap();

        assert_eq!(config.proxy_http_headers, vec!["cookie", "x-real-ip"]);
        assert_eq!(config.proxy_connect_timeout, Duration::from_millis(250));
        assert!(config.app_env.is_production());
    }

    #[test]
    fn bad_timeout_is_invalid() {
        assert_eq!(
            load(&[
                ("PROXY_CONNECT_ENDPOINT", "http://localhost/connect"),
                ("PROXY_CONNECT_TIMEOUT_MS", "soon"),
            ])
            .unwrap_err(),
            ConfigError::Invalid("PROXY_CONNECT_TIMEOUT_MS")
        );
    }
}
