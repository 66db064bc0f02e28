//! Full request pipeline tests
//!
//! Drives the assembled actix application (middleware, routes, dispatch)
//! against a mock backend.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, MemoryCounterStore, bearer_for};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::web;
    use edge_gateway::config::{Config, ServiceConfig};
    use edge_gateway::server::{AppState, HttpServer};
    use edge_gateway::AdmissionController;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn local_state(config: Config) -> web::Data<AppState> {
        let limit = config.rate_limit().requests_per_minute;
        web::Data::new(AppState::new(config, AdmissionController::local(limit)).unwrap())
    }

    #[actix_web::test]
    async fn test_routed_request_reaches_backend() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42"))
            .and(query_param("fields", "name"))
            .and(header("x-gateway", "edge-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ada"))
            .expect(1)
            .mount(&backend)
            .await;

        let config = ConfigFactory::with_users_backend(&backend.uri());
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let req = TestRequest::get()
            .uri("/api/v1/users/42?fields=name")
            .peer_addr("198.51.100.9:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-gateway").unwrap(), "edge-test");
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(resp.headers().get("x-ratelimit-limit").unwrap(), "100");
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "99");
        assert_eq!(test::read_body(resp).await, "ada");
    }

    #[actix_web::test]
    async fn test_method_guard_rejects_other_methods() {
        let backend = MockServer::start().await;
        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.routes[0].methods = vec!["GET".to_string()];
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let req = TestRequest::delete().uri("/api/v1/users/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_ne!(resp.status(), StatusCode::OK);
        assert!(backend.received_requests().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_budget_exhaustion_returns_429_without_forwarding() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.rate_limit.requests_per_minute = 2;
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let call = || {
            TestRequest::get()
                .uri("/api/v1/users/1")
                .insert_header(("x-forwarded-for", "203.0.113.200"))
                .to_request()
        };

        assert_eq!(test::call_service(&app, call()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, call()).await.status(), StatusCode::OK);

        let denied = test::call_service(&app, call()).await;
        assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(denied.headers().contains_key("retry-after"));
    }

    #[actix_web::test]
    async fn test_distributed_admission_through_the_app() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.rate_limit.requests_per_minute = 1;
        let store = Arc::new(MemoryCounterStore::new());
        let admission = AdmissionController::distributed(store.clone(), 1);
        let state = web::Data::new(AppState::new(config.clone(), admission).unwrap());
        let app = test::init_service(HttpServer::create_app(state)).await;

        let authorization = bearer_for(&config, "dana", &[]);
        let call = || {
            TestRequest::get()
                .uri("/api/v1/users/5")
                .insert_header(("authorization", authorization.clone()))
                .to_request()
        };

        assert_eq!(test::call_service(&app, call()).await.status(), StatusCode::OK);
        assert_eq!(
            test::call_service(&app, call()).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(store.keys(), vec!["ratelimit:user:dana".to_string()]);
    }

    #[actix_web::test]
    async fn test_role_protected_route() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.routes[0].roles = vec!["support".to_string()];
        let viewer = bearer_for(&config, "u-1", &["viewer"]);
        let support = bearer_for(&config, "u-2", &["support"]);
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let as_caller = |authorization: Option<&str>| {
            let mut req = TestRequest::get().uri("/api/v1/users/3");
            if let Some(authorization) = authorization {
                req = req.insert_header(("authorization", authorization.to_string()));
            }
            req.to_request()
        };

        assert_eq!(
            test::call_service(&app, as_caller(None)).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            test::call_service(&app, as_caller(Some(&viewer))).await.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            test::call_service(&app, as_caller(Some(&support))).await.status(),
            StatusCode::OK
        );

        // Only the authorized call reached the backend, credentials intact
        let received = backend.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0].headers.get("authorization").unwrap().to_str().unwrap(),
            support
        );
    }

    #[actix_web::test]
    async fn test_backend_down_is_502() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ConfigFactory::with_users_backend(&format!("http://127.0.0.1:{}", port));
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let resp = test::call_service(
            &app,
            TestRequest::get().uri("/api/v1/users/1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bad Gateway");
    }

    #[actix_web::test]
    async fn test_slow_backend_is_504() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.services.insert(
            "users".to_string(),
            ServiceConfig {
                base_url: backend.uri(),
                timeout: 1,
            },
        );
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let resp = test::call_service(
            &app,
            TestRequest::get().uri("/api/v1/users/1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[actix_web::test]
    async fn test_fallback_service_receives_unmatched_paths() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/legacy/orders"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.services.insert(
            "legacy".to_string(),
            ServiceConfig {
                base_url: backend.uri(),
                timeout: 2,
            },
        );
        config.gateway.fallback_service = Some("legacy".to_string());
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/legacy/orders")
                .set_payload("{}")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn test_dot_segment_parameter_cannot_leave_target() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&backend)
            .await;

        let mut config = ConfigFactory::with_users_backend(&backend.uri());
        config.gateway.routes[0].target = Some("/public/users/:id/profile".to_string());
        let app = test::init_service(HttpServer::create_app(local_state(config))).await;

        for uri in ["/api/v1/users/..", "/api/v1/users/%2e%2e", "/api/v1/users/%2E."] {
            let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        assert!(backend.received_requests().await.unwrap().is_empty());

        let resp = test::call_service(
            &app,
            TestRequest::get().uri("/api/v1/users/7").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let received = backend.received_requests().await.unwrap();
        assert_eq!(received[0].url.path(), "/public/users/7/profile");
    }
}
