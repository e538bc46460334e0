use std::env;

use crate::auth::role::PortalOrigins;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Environment configuration
    pub environment: Environment,

    // Server configuration
    pub server_host: String,
    pub server_port: u16,

    // Backend REST API origin (every proxy route is rooted here)
    pub backend_url: String,

    // Role -> portal origin table, login origin is the default
    pub portals: PortalOrigins,

    // HTTP client timeout configuration (in seconds)
    pub http_connect_timeout_secs: u64,
    pub http_request_timeout_secs: u64,

    // Backend reachability probe for /readyz (in milliseconds)
    pub readiness_probe_timeout_ms: u64,

    // Largest inbound body accepted by the proxy routes (multipart uploads)
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables using std::env::var
    pub fn load() -> anyhow::Result<Self> {
        // Parse environment type
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let backend_url = origin_var("BACKEND_URL", "http://localhost:8080")?;

        let portals = PortalOrigins {
            login: origin_var("LOGIN_PORTAL_URL", "http://localhost:3000")?,
            admin: origin_var("ADMIN_PORTAL_URL", "http://localhost:3001")?,
            student: origin_var("STUDENT_PORTAL_URL", "http://localhost:3002")?,
            professor: origin_var("PROFESSOR_PORTAL_URL", "http://localhost:3003")?,
        };

        let http_connect_timeout_secs = u64_var("HTTP_CONNECT_TIMEOUT_SECS", 10);
        let http_request_timeout_secs = u64_var("HTTP_REQUEST_TIMEOUT_SECS", 30);
        let readiness_probe_timeout_ms = u64_var("READINESS_PROBE_TIMEOUT_MS", 750);
        let max_body_bytes = u64_var("MAX_BODY_BYTES", 20 * 1024 * 1024) as usize;

        Ok(Config {
            environment,
            server_host,
            server_port,
            backend_url,
            portals,
            http_connect_timeout_secs,
            http_request_timeout_secs,
            readiness_probe_timeout_ms,
            max_body_bytes,
        })
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get bind address for server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read a numeric variable, falling back to `default` when unset or unparseable
fn u64_var(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Read an origin variable, validating it and trimming the trailing slash
fn origin_var(key: &str, default: &str) -> anyhow::Result<String> {
    let raw = env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    normalize_origin(&raw).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))
}

/// Validate an absolute URL and strip trailing slashes
/// e.g., "http://api.localhost:8080/" -> "http://api.localhost:8080"
pub(crate) fn normalize_origin(raw: &str) -> Result<String, url::ParseError> {
    let trimmed = raw.trim();
    url::Url::parse(trimmed)?;
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_origin_trims_trailing_slash() {
        assert_eq!(
            normalize_origin("http://api.localhost:8080/").unwrap(),
            "http://api.localhost:8080"
        );
        assert_eq!(
            normalize_origin("  https://campus.example.com  ").unwrap(),
            "https://campus.example.com"
        );
    }

    #[test]
    fn test_normalize_origin_rejects_relative() {
        assert!(normalize_origin("/api").is_err());
        assert!(normalize_origin("not a url").is_err());
    }

    #[test]
    fn test_u64_var_falls_back_on_garbage() {
        let key = "__CAMPUS_TEST_U64_GARBAGE__";
        std::env::set_var(key, "soon");
        assert_eq!(u64_var(key, 42), 42);
        std::env::set_var(key, " 7 ");
        assert_eq!(u64_var(key, 42), 7);
        std::env::remove_var(key);
        assert_eq!(u64_var(key, 42), 42);
    }

    #[test]
    fn test_bind_address() {
        let config = Config {
            environment: Environment::Development,
            server_host: "127.0.0.1".to_string(),
            server_port: 4000,
            backend_url: "http://localhost:8080".to_string(),
            portals: PortalOrigins::default(),
            http_connect_timeout_secs: 10,
            http_request_timeout_secs: 30,
            readiness_probe_timeout_ms: 750,
            max_body_bytes: 1024,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
        assert!(!config.is_production());
    }
}
