use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::middleware::AUTH_HEADER,
    state::AppState,
    users::{repo_types::User, services::avatar_url},
};

/// Inserts a user straight into the store. The hash is not a real password.
pub async fn seed_user(state: &AppState, name: &str, email: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        password_hash: "not-a-hash".into(),
        avatar: avatar_url(&state.config.avatar_url_template, email),
        created_at: OffsetDateTime::now_utc(),
    };
    state.users.insert(&user).await.unwrap();
    user
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(AUTH_HEADER, token);
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
