//! HTTP-level tests: full router + middleware, driven with `oneshot`.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use fabric_server::{Config, ServerState, api};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "admin-pass-123";

struct TestApp {
    _dir: tempfile::TempDir,
    app: Router,
    state: ServerState,
    _worker: JoinHandle<()>,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_work_dir(dir.path().to_string_lossy().to_string());
        config.admin_password = Some(ADMIN_PASSWORD.into());

        let (state, rx) = ServerState::initialize(&config).await.unwrap();
        let worker = state.spawn_audit_worker(rx);
        let app = api::build_app(state.clone());
        Self {
            _dir: dir,
            app,
            state,
            _worker: worker,
        }
    }

    fn admin_token(&self) -> String {
        self.state
            .jwt_service
            .generate_token("1", "admin", "admin")
            .unwrap()
    }

    fn clerk_token(&self) -> String {
        self.state
            .jwt_service
            .generate_token("2", "clerk", "user")
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Seed one party + one quality through the API, returns their ids
    async fn seed_catalog(&self, token: &str) -> (Value, Value) {
        let (status, party) = self
            .send(
                Method::POST,
                "/api/parties",
                Some(token),
                Some(json!({ "name": "Acme Textiles" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, quality) = self
            .send(
                Method::POST,
                "/api/qualities",
                Some(token),
                Some(json!({ "name": "Cotton 40s" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        (party["data"]["_id"].clone(), quality["data"]["_id"].clone())
    }
}

fn order_body(party: &Value, quality: &Value) -> Value {
    json!({
        "orderType": "Dying",
        "party": party,
        "poNumber": "PO-1",
        "items": [{ "quality": quality, "quantity": 120.0 }]
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let t = TestApp::new().await;
    let (status, body) = t.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn test_api_requires_token() {
    let t = TestApp::new().await;
    let (status, body) = t.send(Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = t
        .send(Method::GET, "/api/orders", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_me() {
    let t = TestApp::new().await;
    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["role"], "admin");

    let (status, me) = t.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["username"], "admin");
}

#[tokio::test]
async fn test_failed_logins_share_one_message_and_are_audited() {
    let t = TestApp::new().await;
    let (status, wrong_password) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, unknown_user) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "ghost", "password": "nope" })),
        )
        .await;
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    assert_eq!(wrong_password["code"], unknown_user["code"]);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let admin = t.admin_token();
    let (status, logs) = t
        .send(
            Method::GET,
            "/api/logs?action=login_failed",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["data"]["total"], 2);
    assert_eq!(logs["data"]["items"][0]["success"], false);
}

#[tokio::test]
async fn test_sequence_restarts_after_delete_all() {
    let t = TestApp::new().await;
    let admin = t.admin_token();
    let (party, quality) = t.seed_catalog(&admin).await;

    for expected in ["001", "002", "003"] {
        let (status, body) = t
            .send(
                Method::POST,
                "/api/orders",
                Some(&admin),
                Some(order_body(&party, &quality)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["orderId"], expected);
        assert_eq!(body["data"]["partyName"], "Acme Textiles");
    }

    let (status, body) = t.send(Method::DELETE, "/api/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], 3);

    let (_, body) = t
        .send(
            Method::POST,
            "/api/orders",
            Some(&admin),
            Some(order_body(&party, &quality)),
        )
        .await;
    assert_eq!(body["data"]["orderId"], "001");

    let (status, body) = t.send(Method::GET, "/api/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalCount"], 1);
    assert_eq!(body["data"]["pagination"]["currentPage"], 1);
}

#[tokio::test]
async fn test_admin_only_operations() {
    let t = TestApp::new().await;
    let clerk = t.clerk_token();

    let (status, body) = t.send(Method::DELETE, "/api/orders", Some(&clerk), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = t
        .send(Method::POST, "/api/orders/reset-counter", Some(&clerk), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .send(Method::GET, "/api/logs/stats", Some(&clerk), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = t.admin_token();
    let (status, body) = t
        .send(Method::GET, "/api/logs/stats?recent=5", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["total"].is_number());
}

#[tokio::test]
async fn test_status_update_and_invalid_status() {
    let t = TestApp::new().await;
    let token = t.clerk_token();
    let (party, quality) = t.seed_catalog(&token).await;

    let (_, created) = t
        .send(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(order_body(&party, &quality)),
        )
        .await;
    let id = created["data"]["_id"].clone();

    let (status, body) = t
        .send(
            Method::PATCH,
            "/api/orders/status",
            Some(&token),
            Some(json!({ "orderId": id, "status": "archived" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let (status, body) = t
        .send(
            Method::PATCH,
            "/api/orders/status",
            Some(&token),
            Some(json!({ "orderId": id, "status": "delivered" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");

    tokio::time::sleep(Duration::from_millis(150)).await;
    let (status, history) = t
        .send(
            Method::GET,
            &format!("/api/orders/{id}/logs"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = history["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert!(actions.contains(&"create"));
    assert!(actions.contains(&"update"));
}

#[tokio::test]
async fn test_list_query_bounds() {
    let t = TestApp::new().await;
    let token = t.clerk_token();

    let (status, body) = t
        .send(Method::GET, "/api/orders?limit=500", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalCount"], 0);

    let (status, _) = t
        .send(Method::GET, "/api/orders?limit=lots", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .send(Method::GET, "/api/orders?orderType=Weaving", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_order_and_labs() {
    let t = TestApp::new().await;
    let token = t.clerk_token();
    let (party, quality) = t.seed_catalog(&token).await;

    let (status, bulk) = t
        .send(
            Method::POST,
            "/api/orders/bulk",
            Some(&token),
            Some(json!({ "orderType": "Bulk", "party": party, "quantity": 500 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(bulk["data"]["orderId"].as_str().unwrap().starts_with("BULK-"));

    let (_, order) = t
        .send(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(order_body(&party, &quality)),
        )
        .await;
    assert_eq!(order["data"]["orderId"], "001");
    let order_id = order["data"]["_id"].clone();
    let item_id = order["data"]["items"][0]["_id"].clone();

    let (status, lab) = t
        .send(
            Method::POST,
            "/api/labs",
            Some(&token),
            Some(json!({ "orderId": order_id, "orderItemId": item_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lab["data"]["status"], "sent");

    let (_, labs) = t
        .send(
            Method::GET,
            &format!("/api/orders/{order_id}/labs"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(labs["data"].as_array().unwrap().len(), 1);

    let (status, _) = t
        .send(
            Method::DELETE,
            &format!("/api/orders/{order_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, labs) = t
        .send(
            Method::GET,
            &format!("/api/orders/{order_id}/labs"),
            Some(&token),
            None,
        )
        .await;
    assert!(labs["data"].as_array().unwrap().is_empty());

    let (status, body) = t
        .send(
            Method::GET,
            &format!("/api/orders/{order_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_duplicate_quality_conflicts() {
    let t = TestApp::new().await;
    let token = t.clerk_token();
    t.seed_catalog(&token).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/qualities",
            Some(&token),
            Some(json!({ "name": "Cotton 40s" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6102);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let t = TestApp::new().await;
    let token = t.clerk_token();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/orders")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unauthorized_response_carries_request_id() {
    let t = TestApp::new().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/orders")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));

    // 客户端提供的 ID 原样回传
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/orders")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_bulk_route_rejects_sequenced_types() {
    let t = TestApp::new().await;
    let token = t.clerk_token();
    let (party, quality) = t.seed_catalog(&token).await;

    for order_type in ["Dying", "Printing"] {
        let (status, body) = t
            .send(
                Method::POST,
                "/api/orders/bulk",
                Some(&token),
                Some(json!({ "orderType": order_type, "party": party, "quantity": 50 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 4004);
    }

    // 被拒绝的请求不消耗序号
    let (status, order) = t
        .send(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(order_body(&party, &quality)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["data"]["orderId"], "001");
}
