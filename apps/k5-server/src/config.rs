//! Layered application configuration: YAML file, then `K5__` environment
//! variables (`K5__AUTHN__CLOCK_SKEW=5s` sets `authn.clock_skew`).

use std::path::Path;

use anyhow::Context;
use api_gateway::ApiGatewayConfig;
use authn_resolver::AuthNResolverConfig;
use authz_resolver::AuthZResolverConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "K5__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api_gateway: ApiGatewayConfig,
    pub authn: AuthNResolverConfig,
    #[serde(default)]
    pub authz: AuthZResolverConfig,
}

impl AppConfig {
    /// Load `path` (if it exists) and overlay `K5__*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if the merged configuration does not deserialize, e.g. when
    /// `authn.secret` is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
        .with_context(|| format!("failed to load configuration from {}", path.display()))
    }

    fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use k5_security::IdentityNamespace;
    use secrecy::ExposeSecret;

    use super::*;

    const YAML: &str = r"
logging:
  level: debug
  format: json
api_gateway:
  bind_addr: '0.0.0.0:9000'
  public_routes: ['GET /health']
authn:
  secret: c2VjcmV0
  token_ttl: 1h
  accounts:
    - { id: 1, login_id: alice, roles: [USER] }
authz:
  orders:
    - { id: 7, owner: alice, state: PENDING }
";

    #[test]
    fn yaml_is_parsed_with_defaults() {
        let cfg = AppConfig::from_figment(Figment::new().merge(Yaml::string(YAML))).unwrap();
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.api_gateway.bind_addr, "0.0.0.0:9000");
        assert!(cfg.api_gateway.require_auth_by_default);
        assert_eq!(cfg.authn.secret.expose_secret(), "c2VjcmV0");
        assert_eq!(cfg.authn.token_ttl, Duration::from_hours(1));
        assert_eq!(cfg.authn.clock_skew, Duration::ZERO);
        assert_eq!(cfg.authn.accounts.len(), 1);
        assert_eq!(cfg.authz.owner_identity, IdentityNamespace::LoginId);
        assert_eq!(cfg.authz.orders.len(), 1);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let res = AppConfig::from_figment(Figment::new().merge(Yaml::string("logging: {level: info}")));
        assert!(res.is_err());
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("k5.yaml", YAML)?;
            jail.set_env("K5__AUTHN__CLOCK_SKEW", "5s");
            jail.set_env("K5__LOGGING__LEVEL", "warn");

            let cfg = AppConfig::load(Path::new("k5.yaml")).unwrap();
            assert_eq!(cfg.authn.clock_skew, Duration::from_secs(5));
            assert_eq!(cfg.logging.level, "warn");
            Ok(())
        });
    }
}
