use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_owned()
}

fn default_require_auth_by_default() -> bool {
    true
}

/// API gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiGatewayConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Routes reachable without credentials, as `"METHOD /path/{param}"`.
    /// A pattern without a method matches every method.
    #[serde(default)]
    pub public_routes: Vec<String>,

    /// If true, routes not listed as public require authentication.
    #[serde(default = "default_require_auth_by_default")]
    pub require_auth_by_default: bool,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_routes: Vec::new(),
            require_auth_by_default: default_require_auth_by_default(),
        }
    }
}
