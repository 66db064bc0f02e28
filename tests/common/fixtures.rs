//! Test fixtures and data factories

use edge_gateway::auth::JwtHandler;
use edge_gateway::config::{Config, RouteConfig, ServiceConfig};

/// Factory for gateway configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Defaults with Redis disabled so nothing reaches for a real server
    pub fn base() -> Config {
        let mut config = Config::default();
        config.gateway.redis.enabled = false;
        config.gateway.server.gateway_id = "edge-test".to_string();
        config
    }

    /// One `users` service at `base_url`, routed from `/api/v1/users/:id`
    pub fn with_users_backend(base_url: &str) -> Config {
        let mut config = Self::base();
        config.gateway.services.insert(
            "users".to_string(),
            ServiceConfig {
                base_url: base_url.to_string(),
                timeout: 2,
            },
        );
        config.gateway.routes.push(Self::route(
            "/api/v1/users/:id",
            "users",
            Some("/users/:id"),
        ));
        config
    }

    pub fn route(path: &str, service: &str, target: Option<&str>) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            service: service.to_string(),
            target: target.map(str::to_string),
            methods: vec![],
            require_auth: false,
            roles: vec![],
        }
    }
}

/// `Authorization` header value for a token issued under `config`
pub fn bearer_for(config: &Config, user_id: &str, roles: &[&str]) -> String {
    let handler = JwtHandler::new(config.auth());
    let token = handler
        .create_token(
            user_id,
            &format!("{}@example.com", user_id),
            roles.iter().map(|r| r.to_string()).collect(),
            None,
        )
        .unwrap();
    format!("Bearer {}", token)
}
