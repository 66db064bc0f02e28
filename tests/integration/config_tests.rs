//! Configuration loading and validation integration tests

#[cfg(test)]
mod tests {
    use crate::common::ConfigFactory;
    use edge_gateway::config::{Config, GatewayConfig, Validate};
    use edge_gateway::{EndpointRegistry, GatewayError};
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
environment: staging
server:
  host: "127.0.0.1"
  port: 9000
  gateway_id: "edge-eu-1"
  cors:
    enabled: true
    allowed_origins: ["https://app.example.com"]
auth:
  jwt_secret: "a-sufficiently-long-secret-for-staging-use"
rate_limit:
  requests_per_minute: 250
redis:
  url: "redis://cache.internal:6379"
  enabled: false
services:
  users:
    base_url: "http://users.internal:8081"
    timeout: 5
  orders:
    base_url: "http://orders.internal:8082/v2"
  legacy:
    base_url: ""
routes:
  - path: /api/v1/users/:id
    service: users
    target: /users/:id
    methods: [GET, PUT]
  - path: /api/v1/orders/*rest
    service: orders
    require_auth: true
    roles: [customer]
fallback_service: legacy
logging:
  level: "edge_gateway=debug"
  json: true
"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_round_trip_through_file() {
        let file = write_temp(FULL_CONFIG);
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.server().address(), "127.0.0.1:9000");
        assert_eq!(config.server().gateway_id, "edge-eu-1");
        assert_eq!(config.rate_limit().requests_per_minute, 250);
        assert!(!config.redis().enabled);
        assert_eq!(config.routes().len(), 2);
        assert_eq!(config.routes()[0].methods, vec!["GET", "PUT"]);
        assert_eq!(config.routes()[1].roles, vec!["customer"]);
        assert_eq!(config.gateway.fallback_service.as_deref(), Some("legacy"));
        assert!(config.gateway.logging.json);
    }

    #[tokio::test]
    async fn test_registry_skips_services_without_url() {
        let file = write_temp(FULL_CONFIG);
        let config = Config::from_file(file.path()).await.unwrap();

        let registry = EndpointRegistry::from_config(&config.gateway.services).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("users"));
        assert!(!registry.contains("legacy"));

        let users = registry.resolve("users").unwrap();
        assert_eq!(users.timeout(), Duration::from_secs(5));
        let orders = registry.resolve("orders").unwrap();
        assert_eq!(orders.timeout(), Duration::from_secs(30));
        assert_eq!(
            orders.url_for("/orders/1", Some("expand=items")).as_str(),
            "http://orders.internal:8082/v2/orders/1?expand=items"
        );
    }

    #[tokio::test]
    async fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("missing.yaml")).await.unwrap();
        assert!(config.gateway.services.is_empty());
        assert_eq!(config.rate_limit().requests_per_minute, 100);
    }

    #[tokio::test]
    async fn test_invalid_service_url_fails_load() {
        let file = write_temp(
            r#"
services:
  users:
    base_url: "ftp://users.internal"
"#,
        );
        let result = Config::from_file(file.path()).await;
        assert!(matches!(result, Err(GatewayError::Config(msg)) if msg.contains("users")));
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = GatewayConfig::default();
        config.environment = "production".to_string();
        let result = Validate::validate(&config);
        assert!(result.unwrap_err().contains("JWT secret"));

        config.auth.jwt_secret = "x".repeat(48);
        assert!(Validate::validate(&config).is_ok());
    }

    #[test]
    fn test_cors_wildcard_with_credentials_rejected() {
        let mut config = GatewayConfig::default();
        config.server.cors.enabled = true;
        config.server.cors.allowed_origins = vec!["*".to_string()];
        config.server.cors.allow_credentials = true;
        assert!(Validate::validate(&config).unwrap_err().contains("CORS"));
    }

    #[test]
    fn test_route_to_unknown_service_only_warns() {
        let mut config = ConfigFactory::base().gateway;
        config
            .routes
            .push(ConfigFactory::route("/api/v1/ghost", "ghost", None));
        assert!(Validate::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = GatewayConfig::default();
        config.rate_limit.requests_per_minute = 0;
        assert!(Validate::validate(&config).is_err());
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config = Config::from_yaml(FULL_CONFIG).unwrap().gateway;
        let env: HashMap<&str, &str> = [
            ("GATEWAY_HOST", "0.0.0.0"),
            ("GATEWAY_REDIS_URL", "redis://override:6380"),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.redis.url, "redis://override:6380");
    }
}
