/// Configuration management for the gateway
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `GATEWAY_HOST`: Host to bind to (default: 0.0.0.0)
/// - `GATEWAY_PORT`: Port to bind to (default: 9999)
/// - `GATEWAY_TENANTS`: JSON array of tenant identifiers to mount,
///   e.g. `["demo","support"]` (default: `[]`)
/// - `GATEWAY_PUBLIC_URL`: Base URL advertised in agent cards
///   (default: http://localhost:9999)
/// - `GATEWAY_DEFAULT_TIMEOUT_S`: Default execution deadline in seconds
///   (default: 3600)
/// - `GATEWAY_CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use agentgate_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Gateway will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Gateway mounting configuration
    pub gateway: GatewayConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,
}

/// Gateway mounting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Ordered list of tenant identifiers to mount at startup
    pub tenants: Vec<String>,

    /// Public base URL advertised in agent cards
    pub public_base_url: String,

    /// Default execution deadline in seconds
    pub default_timeout_s: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an invalid value
    /// (unparseable port, malformed tenant list).
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("GATEWAY_PORT")
            .unwrap_or_else(|_| "9999".to_string())
            .parse::<u16>()?;

        let tenants_raw = env::var("GATEWAY_TENANTS").unwrap_or_else(|_| "[]".to_string());
        let tenants: Vec<String> = serde_json::from_str(&tenants_raw)
            .map_err(|e| anyhow::anyhow!("GATEWAY_TENANTS must be a JSON array of strings: {}", e))?;

        let public_base_url = env::var("GATEWAY_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:9999".to_string());
        let public_base_url = public_base_url.trim_end_matches('/').to_string();

        let default_timeout_s = env::var("GATEWAY_DEFAULT_TIMEOUT_S")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()?;

        let cors_origins = env::var("GATEWAY_CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            gateway: GatewayConfig {
                tenants,
                public_base_url,
                default_timeout_s,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_list_parses_json_array() {
        let tenants: Vec<String> = serde_json::from_str(r#"["demo","support"]"#).unwrap();
        assert_eq!(tenants, vec!["demo".to_string(), "support".to_string()]);
    }

    #[test]
    fn test_config_serializes() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 9999,
                cors_origins: vec!["*".to_string()],
            },
            gateway: GatewayConfig {
                tenants: vec!["demo".to_string()],
                public_base_url: "http://localhost:9999".to_string(),
                default_timeout_s: 3600,
            },
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"demo\""));
    }
}
