#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use frontdesk::app::{AppState, build_router};
use frontdesk::auth::keys::generate_signing_key;
use frontdesk::auth::token::TokenKeys;
use frontdesk::bootstrap::seed_admin;
use frontdesk::config::{AdminSeed, UploadConfig};
use frontdesk::store::memory::InMemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";

pub struct TestApp {
    pub router: axum::Router,
    pub uploads: tempfile::TempDir,
}

pub struct TestOptions {
    pub reject_overlapping_bookings: bool,
    pub max_upload_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            reject_overlapping_bookings: false,
            max_upload_bytes: 1024,
        }
    }
}

pub async fn test_app() -> TestApp {
    test_app_with(TestOptions::default()).await
}

pub async fn test_app_with(options: TestOptions) -> TestApp {
    let uploads = tempfile::tempdir().expect("tempdir");
    let store = InMemoryStore::new();
    seed_admin(
        &store,
        &AdminSeed {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Admin".to_string(),
        },
    )
    .await
    .expect("seed admin");
    let tokens = TokenKeys::new(&generate_signing_key()).expect("token keys");
    let state = AppState {
        api_version: "v1".to_string(),
        store: Arc::new(store),
        tokens: Arc::new(tokens),
        token_ttl: Duration::from_secs(600),
        uploads: UploadConfig {
            dir: uploads.path().to_path_buf(),
            max_bytes: options.max_upload_bytes,
        },
        reject_overlapping_bookings: options.reject_overlapping_bookings,
    };
    TestApp {
        router: build_router(state),
        uploads,
    }
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json")
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Status of an unauthenticated GET whose body is not JSON.
    pub async fn status_of(&self, uri: &str) -> StatusCode {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("response")
            .status()
    }

    /// JSON request with an optional bearer token.
    pub async fn call(
        &self,
        method: &str,
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
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Registers a guest and returns `(token, user_id)`.
    pub async fn guest(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .call(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "name": "Guest", "email": email, "password": "guest-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register guest: {body}");
        (
            body["token"].as_str().expect("token").to_string(),
            body["user"]["id"].as_str().expect("id").to_string(),
        )
    }

    /// Registers a staff member, approves them as admin and logs them in.
    /// Returns `(token, user_id)`.
    pub async fn approved_staff(&self, email: &str, department: &str) -> (String, String) {
        let (status, body) = self
            .call(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "name": "Staff",
                    "email": email,
                    "password": "staff-pass",
                    "role": "staff",
                    "department": department
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register staff: {body}");
        let user_id = body["user"]["id"].as_str().expect("id").to_string();
        let admin = self.admin_token().await;
        let (status, body) = self
            .call(
                "PUT",
                &format!("/users/{user_id}"),
                Some(&admin),
                Some(json!({ "status": "approved" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "approve staff: {body}");
        let (status, body) = self.login(email, "staff-pass").await;
        assert_eq!(status, StatusCode::OK, "staff login: {body}");
        (body["token"].as_str().expect("token").to_string(), user_id)
    }

    pub async fn create_room(&self, admin: &str, number: &str, price: f64) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/rooms",
                Some(admin),
                Some(json!({
                    "room_number": number,
                    "type": "double",
                    "floor": 1,
                    "price": price,
                    "beds": 2,
                    "amenities": ["wifi"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create room: {body}");
        body["id"].as_str().expect("room id").to_string()
    }

    pub async fn book(
        &self,
        token: &str,
        room_id: &str,
        check_in: &str,
        check_out: &str,
    ) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/reservations",
            Some(token),
            Some(json!({
                "room_id": room_id,
                "check_in": check_in,
                "check_out": check_out,
                "guests": 2
            })),
        )
        .await
    }

    pub async fn room_status(&self, room_id: &str) -> String {
        let (status, body) = self.call("GET", &format!("/rooms/{room_id}"), None, None).await;
        assert_eq!(status, StatusCode::OK, "get room: {body}");
        body["status"].as_str().expect("status").to_string()
    }
}

pub fn money(value: &Value) -> f64 {
    value.as_f64().expect("numeric amount")
}
