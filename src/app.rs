use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::{self, middleware::require_auth, middleware::AUTH_HEADER},
    posts, profiles,
    state::AppState,
    users,
};

pub fn build_app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(|| async { "API running" }))
        .merge(users::public_routes())
        .merge(auth::public_routes())
        .merge(profiles::public_routes());

    // the gate wraps only the handlers registered here; a path shared with
    // the public router keeps its public methods open
    let protected = Router::new()
        .merge(users::protected_routes())
        .merge(auth::protected_routes())
        .merge(profiles::protected_routes())
        .merge(posts::protected_routes())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let cors = cors_layer(&state.config.cors_origin);

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => AllowOrigin::exact(value),
        _ => {
            tracing::warn!(%origin, "CORS origin is a wildcard or not a valid header value; allowing any origin");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([HeaderName::from_static(AUTH_HEADER), header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::*;
    use crate::testing::send;

    async fn register(app: &Router, name: &str, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": name, "email": email, "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_post(app: &Router, token: &str, text: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/posts",
            Some(token),
            Some(json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["post"].clone()
    }

    #[tokio::test]
    async fn root_reports_running() {
        let app = build_app(AppState::fake());
        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("API running".into()));
    }

    #[tokio::test]
    async fn register_then_fetch_current_user() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "Ann@Example.com").await;

        let (status, body) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["email"], "ann@example.com");
        assert!(body["user"].get("password_hash").is_none());
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn login_issues_token_and_rejects_bad_password() {
        let app = build_app(AppState::fake());
        register(&app, "Ann", "ann@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "email": "ann@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "email": "ann@example.com", "password": "wrong-one" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["msg"], "Invalid credentials");
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let app = build_app(AppState::fake());
        register(&app, "Ann", "ann@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": "Other", "email": "ANN@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["msg"], "Email already exists");
    }

    #[tokio::test]
    async fn protected_route_without_token() {
        let app = build_app(AppState::fake());
        for (method, uri) in [
            (Method::GET, "/api/auth"),
            (Method::GET, "/api/posts"),
            (Method::GET, "/api/profile/me"),
            (Method::DELETE, "/api/users"),
        ] {
            let (status, body) = send(&app, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["msg"], "Token required");
        }
    }

    #[tokio::test]
    async fn public_methods_on_shared_paths_stay_open() {
        let app = build_app(AppState::fake());
        let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn expired_or_tampered_token_is_invalid() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let expired = state
            .keys
            .issue_at(Uuid::new_v4(), OffsetDateTime::now_utc() - Duration::hours(2))
            .unwrap();

        let mut tampered = register(&app, "Ann", "ann@example.com").await;
        tampered.push('x');

        for token in [expired.as_str(), tampered.as_str(), "garbage"] {
            let (status, body) = send(&app, Method::GET, "/api/auth", Some(token), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["msg"], "Invalid token");
        }
    }

    #[tokio::test]
    async fn empty_comment_is_a_validation_error() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;
        let post = create_post(&app, &token, "hello").await;

        let uri = format!("/api/posts/comment/{}", post["id"].as_str().unwrap());
        let (status, body) =
            send(&app, Method::POST, &uri, Some(&token), Some(json!({ "text": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["msg"], "Text required");
    }

    #[tokio::test]
    async fn only_the_author_deletes_a_post() {
        let app = build_app(AppState::fake());
        let author = register(&app, "Ann", "ann@example.com").await;
        let stranger = register(&app, "Bob", "bob@example.com").await;
        let post = create_post(&app, &author, "mine").await;
        let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["msg"], "Not the author of the post");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&author), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, &uri, Some(&author), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Post not found");
    }

    #[tokio::test]
    async fn liking_twice_is_rejected() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;
        let post = create_post(&app, &token, "hello").await;
        let uri = format!("/api/posts/like/{}", post["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::PUT, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["likes"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::PUT, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Post already been liked");
    }

    #[tokio::test]
    async fn experience_entries_are_prepended() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/profile",
            Some(&token),
            Some(json!({ "occupation": "Developer", "skills": "rust, sql" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["msg"], "Create profile successfully");
        assert_eq!(body["profile"]["skills"], json!(["rust", "sql"]));

        for title in ["First", "Second"] {
            let (status, body) = send(
                &app,
                Method::PUT,
                "/api/profile/experience",
                Some(&token),
                Some(json!({ "title": title, "company": "Acme", "from": "2020-01-01" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }

        let (status, body) = send(&app, Method::GET, "/api/profile/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = body["experience"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["Second", "First"]);
        assert_eq!(body["user"]["name"], "Ann");
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;

        let (status, body) = send(&app, Method::GET, "/api/posts/not-an-id", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Post not found");

        let (status, body) = send(&app, Method::GET, "/api/profile/user/42", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Profile not found");
    }

    #[tokio::test]
    async fn unknown_body_fields_are_rejected() {
        let app = build_app(AppState::fake());
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "name": "Ann",
                "email": "ann@example.com",
                "password": "secret1",
                "admin": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"][0]["msg"].is_string());
    }

    #[tokio::test]
    async fn deleted_account_keeps_posts_and_token_stops_resolving() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;
        create_post(&app, &token, "kept").await;

        let (status, body) = send(&app, Method::DELETE, "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msg"], "User deleted");

        // the token still verifies; the user behind it is gone
        let (status, body) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "User not found");

        let (status, body) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleted_account_cannot_create_a_profile() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;
        let (status, _) = send(&app, Method::DELETE, "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/profile",
            Some(&token),
            Some(json!({ "occupation": "Developer", "skills": "rust" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "User not found");

        let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn education_entries_are_prepended_and_removable() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/profile",
            Some(&token),
            Some(json!({ "occupation": "Developer", "skills": "rust" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let mut profile = Value::Null;
        for school in ["U1", "U2"] {
            let (status, body) = send(
                &app,
                Method::PUT,
                "/api/profile/education",
                Some(&token),
                Some(json!({
                    "school": school,
                    "degree": "BSc",
                    "field_of_study": "CS",
                    "from": "2015-09-01"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            profile = body;
        }
        assert_eq!(profile["education"][0]["school"], "U2");
        assert_eq!(profile["education"][1]["school"], "U1");

        let unknown = format!("/api/profile/education/{}", Uuid::new_v4());
        let (status, body) = send(&app, Method::DELETE, &unknown, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Education not found");

        let first = profile["education"][1]["id"].as_str().unwrap();
        let uri = format!("/api/profile/education/{first}");
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["education"].as_array().unwrap().len(), 1);
        assert_eq!(body["education"][0]["school"], "U2");
    }
}
