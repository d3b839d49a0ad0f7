use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use database::{initialize_database, BoardStorage, DatabaseConfig, ResourceStore};
use entities::User;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use user::SessionConfig;

use crate::{create_router, middleware_hooks::VERSION_HEADER, AppState};

/// A fresh database with one user per role, a role-less user and category 1.
pub async fn test_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig::new_with_path(dir.path().join("board.db"));
    let store = Arc::new(BoardStorage::new(initialize_database(config).await.unwrap()));

    for (id, roles) in [
        ("admin", vec!["Admin"]),
        ("editor", vec!["Editor"]),
        ("reader", vec!["User"]),
        ("nobody", vec![]),
    ] {
        let user = User {
            id: id.into(),
            username: id.into(),
            email: format!("{}@example.com", id),
        };
        let roles: Vec<String> = roles.into_iter().map(String::from).collect();
        store.insert_user(&user, &roles).await.unwrap();
    }
    store.insert_category("General").await.unwrap();

    let authz = Arc::new(authz::AuthzEngine::new().unwrap());
    (dir, AppState::new(store, authz).with_dev_login(true))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
    pub version_header: bool,
}

/// Drives the router like a browser holding one session cookie.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn new(state: AppState) -> Self {
        let sessions = SessionConfig::new().layer(MemoryStore::default());
        Self {
            app: create_router(state, sessions),
            cookie: None,
        }
    }

    pub async fn login(&mut self, user_id: &str) {
        let response = self.post_form("/login", &format!("user_id={}", user_id)).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed for {}", user_id);
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
            if !pair.ends_with('=') {
                self.cookie = Some(pair);
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let version_header = response.headers().contains_key(VERSION_HEADER);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
            version_header,
        }
    }
}
