//! HTTP server core implementation

use crate::config::{Config, CorsConfig, ServerConfig};
use crate::server::middleware::{
    AuthMiddleware, GatewayRootSpan, RateLimitMiddleware, RequestIdMiddleware,
};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, selecting the admission strategy once
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::from_config(config.clone()).await?;
        Ok(Self::with_state(state))
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.server().clone(),
            state,
        }
    }

    /// Create the Actix-web application
    ///
    /// Per request: request id, access log, CORS, auth, admission, handler.
    /// The last `wrap` runs first.
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors_config = &state.config.server().cors;
        let cors = Condition::new(cors_config.enabled, build_cors(cors_config));
        let max_body_size = state.config.server().max_body_size;
        let route_configs = state.config.routes().to_vec();

        App::new()
            .app_data(state)
            .app_data(web::PayloadConfig::new(max_body_size))
            .wrap(RateLimitMiddleware)
            .wrap(AuthMiddleware)
            .wrap(cors)
            .wrap(TracingLogger::<GatewayRootSpan>::new())
            .wrap(RequestIdMiddleware)
            .configure(routes::health::configure_routes)
            .configure(|cfg| routes::proxy::configure_routes(cfg, &route_configs))
            .default_service(web::to(routes::proxy::fallback))
    }

    /// Start the HTTP server and run until SIGINT/SIGTERM
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);

        let reaper = self.state.start_reaper();

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .client_request_timeout(self.config.read_timeout())
            .client_disconnect_timeout(self.config.write_timeout())
            .keep_alive(self.config.idle_timeout())
            .shutdown_timeout(self.config.shutdown_timeout);
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        let result = server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)));

        if let Some(reaper) = reaper {
            reaper.abort();
        }

        result?;
        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Readable error for port binding failures
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> GatewayError {
        match error.kind() {
            std::io::ErrorKind::AddrInUse => GatewayError::server(format!(
                "Port {} is already in use; set GATEWAY_PORT to another port",
                port
            )),
            std::io::ErrorKind::PermissionDenied => GatewayError::server(format!(
                "Permission denied for port {}; use a port >= 1024",
                port
            )),
            _ => GatewayError::server(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}

/// Build the CORS middleware from configuration
pub fn build_cors(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if cors_config.allows_all_origins() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<actix_web::http::Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    let headers: Vec<actix_web::http::header::HeaderName> = cors_config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    if !headers.is_empty() {
        cors = cors.allowed_headers(headers);
    }

    let expose: Vec<actix_web::http::header::HeaderName> = cors_config
        .expose_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    if !expose.is_empty() {
        cors = cors.expose_headers(expose);
    }

    cors = cors.max_age(cors_config.max_age as usize);

    if cors_config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
