//! Dispatcher integration tests against mock backends

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::{Method, StatusCode};
    use edge_gateway::core::dispatcher::X_GATEWAY;
    use edge_gateway::{DispatchRequest, Dispatcher, EndpointRegistry, GatewayError, ServiceEndpoint};
    use std::time::{Duration, Instant};
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher_for(uri: &str, timeout: Duration) -> Dispatcher {
        let mut registry = EndpointRegistry::new();
        registry.insert(ServiceEndpoint::new(
            "users",
            Url::parse(uri).unwrap(),
            timeout,
        ));
        Dispatcher::new(registry, "edge-test").unwrap()
    }

    fn get_user(id: &str) -> DispatchRequest {
        DispatchRequest::new(Method::GET, format!("/api/v1/users/{}", id))
            .with_param("id", id)
            .with_host("api.example.com")
            .with_peer_addr("198.51.100.23")
    }

    #[tokio::test]
    async fn test_forward_rewrites_path_and_relays_response() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-backend", "users")
                    .set_body_string(r#"{"id":42}"#),
            )
            .expect(1)
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(2));
        let response = dispatcher
            .forward("users", "/users/:id", get_user("42"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-backend").unwrap(), "users");
        assert_eq!(response.headers().get(X_GATEWAY).unwrap(), "edge-test");

        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, r#"{"id":42}"#);
    }

    #[tokio::test]
    async fn test_forwarding_headers_are_stamped() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .and(header("x-gateway", "edge-test"))
            .and(header("x-forwarded-host", "api.example.com"))
            .and(header("x-real-ip", "198.51.100.23"))
            .and(header("x-trace", "abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(2));
        let request = get_user("7")
            .with_header("x-forwarded-for", "203.0.113.1")
            .with_header("x-trace", "abc")
            .with_header("proxy-authorization", "Basic Zm9vOmJhcg==");

        let response = dispatcher
            .forward("users", "/users/:id", request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let received = backend.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("proxy-authorization").is_none());
        assert_eq!(
            received[0].headers.get("x-forwarded-for").unwrap(),
            "203.0.113.1, 198.51.100.23"
        );
        let origin = received[0].headers.get("x-origin-host").unwrap();
        assert!(origin.to_str().unwrap().starts_with("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_query_and_body_are_forwarded() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/search"))
            .and(query_param("page", "2"))
            .and(body_string("name=ada"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(2));
        let request = DispatchRequest::new(Method::POST, "/users/search")
            .with_query("page=2")
            .with_body("name=ada");

        let response = dispatcher
            .forward("users", "/users/search", request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_backend_errors_are_relayed_verbatim() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(2));
        let response = dispatcher
            .forward("users", "/users/:id", get_user("999"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, "no such user");
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_millis(200));
        let started = Instant::now();
        let result = dispatcher
            .forward("users", "/users/:id", get_user("1"))
            .await;

        assert!(matches!(result, Err(GatewayError::GatewayTimeout(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_backend_just_inside_timeout_is_relayed() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(418).set_delay(Duration::from_millis(100)),
            )
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(1));
        let response = dispatcher
            .forward("users", "/users/:id", get_user("1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers().get(X_GATEWAY).unwrap(), "edge-test");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dispatcher = dispatcher_for(
            &format!("http://127.0.0.1:{}", port),
            Duration::from_secs(2),
        );
        let result = dispatcher
            .forward("users", "/users/:id", get_user("1"))
            .await;

        assert!(matches!(result, Err(GatewayError::BadGateway(_))));
    }

    #[tokio::test]
    async fn test_unknown_service() {
        let dispatcher = Dispatcher::new(EndpointRegistry::new(), "edge-test").unwrap();
        let result = dispatcher
            .forward("billing", "/invoices", DispatchRequest::new(Method::GET, "/invoices"))
            .await;

        assert!(matches!(result, Err(GatewayError::UnknownService(name)) if name == "billing"));
    }

    #[tokio::test]
    async fn test_redirects_are_not_followed() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "http://elsewhere.invalid/"),
            )
            .mount(&backend)
            .await;

        let dispatcher = dispatcher_for(&backend.uri(), Duration::from_secs(2));
        let response = dispatcher
            .forward("users", "/users/:id", get_user("1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "http://elsewhere.invalid/"
        );
    }
}
