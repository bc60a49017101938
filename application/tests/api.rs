//! End-to-end tests of the REST API.

use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt as _;
use serde_json::{json, Value};
use service::infra::{Groq, InMemory};
use tower::ServiceExt as _;

/// Builds an application with empty storage and default settings.
fn app() -> Router {
    let config = application::config::Config::default();
    let settings = application::Settings {
        cookie: config.server.session_cookie,
        rate_limits: config.service.rate_limits,
    };
    let completion = Groq::new(config.service.completion.clone().into());
    let service = application::Service::new(
        config.service.into(),
        InMemory::default(),
        completion,
    );
    application::router(service, settings)
}

/// Performs a single request against the `app`.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, http::HeaderMap, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "127.0.0.1");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let request = if let Some(body) = body {
        request
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    } else {
        request.body(axum::body::Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, headers, body)
}

/// Registers a user and returns their session cookie.
async fn register(app: &Router, email: &str) -> String {
    let (status, headers, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Alice",
            "email": email,
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let set_cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

#[tokio::test]
async fn registration_issues_a_working_session() {
    let app = app();

    let (status, headers, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "hunter22",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["onboardingComplete"], false);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("athena-token="));
    assert!(cookie.contains("HttpOnly"));

    let cookie = cookie.split(';').next().unwrap();
    let (status, _, body) =
        send(&app, Method::GET, "/api/auth/me", Some(cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Alice");
}

#[tokio::test]
async fn every_response_carries_security_headers() {
    let app = app();

    let (status, headers, _) =
        send(&app, Method::GET, "/api/auth/me", None, None).await;

    // Even a rejection is header-injected.
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(
        headers[header::REFERRER_POLICY],
        "strict-origin-when-cross-origin",
    );
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(headers.contains_key("Permissions-Policy"));
}

#[tokio::test]
async fn cross_origin_mutations_are_rejected() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header("x-forwarded-for", "127.0.0.1")
        .header(header::HOST, "app.example.com")
        .header(header::ORIGIN, "https://evil.example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": "hunter22",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn same_origin_mutations_pass_the_gate() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header("x-forwarded-for", "127.0.0.1")
        .header(header::HOST, "app.example.com")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "hunter22",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let app = app();
    drop(register(&app, "alice@example.com").await);

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "alice@example.com",
            "password": "wrong-pass",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "WRONG_CREDENTIALS");
}

#[tokio::test]
async fn occupied_email_conflicts() {
    let app = app();
    drop(register(&app, "alice@example.com").await);

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Alice Again",
            "email": "alice@example.com",
            "password": "hunter22",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EMAIL_OCCUPIED");
}

#[tokio::test]
async fn login_attempts_are_rate_limited_per_ip() {
    let app = app();

    // Default quota is 10 per minute.
    for _ in 0..10 {
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({
                "email": "nobody@example.com",
                "password": "hunter22",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "nobody@example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "TOO_MANY_ATTEMPTS");
}

#[tokio::test]
async fn registration_attempts_are_rate_limited_per_ip() {
    let app = app();

    // Default quota is 5 per minute, counted before validation.
    for _ in 0..5 {
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Alice",
                "email": "not-an-email",
                "password": "hunter22",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "TOO_MANY_ATTEMPTS");
}

#[tokio::test]
async fn resources_are_sanitized_created_listed_and_deleted() {
    let app = app();
    let cookie = register(&app, "alice@example.com").await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/resources",
        Some(&cookie),
        Some(json!({
            "title": "Cours d'algèbre <script>alert(1)</script>",
            "type": "note",
            "subject": "Maths",
            "content": "Réviser les matrices",
            "tags": ["algèbre", ""],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resource"]["title"], "Cours d'algèbre alert(1)");
    assert_eq!(body["resource"]["type"], "note");
    assert_eq!(body["resource"]["tags"], json!(["algèbre"]));
    let id = body["resource"]["id"].as_str().unwrap().to_owned();

    let (status, _, body) =
        send(&app, Method::GET, "/api/resources", Some(&cookie), None)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resources"].as_array().unwrap().len(), 1);

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        "/api/resources",
        Some(&cookie),
        Some(json!({ "id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) =
        send(&app, Method::GET, "/api/resources", Some(&cookie), None)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn resource_of_another_user_cannot_be_deleted() {
    let app = app();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let (_, _, body) = send(
        &app,
        Method::POST,
        "/api/resources",
        Some(&alice),
        Some(json!({
            "title": "Notes",
            "type": "url",
            "subject": "Maths",
            "content": "https://example.com/notes",
        })),
    )
    .await;
    let id = body["resource"]["id"].as_str().unwrap().to_owned();

    let (status, _, body) = send(
        &app,
        Method::DELETE,
        "/api/resources",
        Some(&bob),
        Some(json!({ "id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn javascript_resource_links_are_rejected() {
    let app = app();
    let cookie = register(&app, "alice@example.com").await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/resources",
        Some(&cookie),
        Some(json!({
            "title": "Innocent link",
            "type": "url",
            "subject": "Maths",
            "content": "javascript:alert(document.cookie)",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CONTENT");
}

#[tokio::test]
async fn schedule_blocks_are_created_and_listed_in_week_order() {
    let app = app();
    let cookie = register(&app, "alice@example.com").await;

    for (title, day, start) in [
        ("Physique", 3, "14:00"),
        ("Maths", 1, "08:00"),
        ("Anglais", 1, "10:30"),
    ] {
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/api/schedule",
            Some(&cookie),
            Some(json!({
                "title": title,
                "dayOfWeek": day,
                "startTime": start,
                "endTime": "23:59",
                "type": "course",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) =
        send(&app, Method::GET, "/api/schedule", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let titles = body["scheduleBlocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Maths", "Anglais", "Physique"]);
}

#[tokio::test]
async fn generating_a_plan_without_skills_is_rejected() {
    let app = app();
    let cookie = register(&app, "alice@example.com").await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(&cookie),
        Some(json!({ "action": "generate" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_SKILLS");
}

#[tokio::test]
async fn onboarding_records_profile_and_skills() {
    let app = app();
    let cookie = register(&app, "alice@example.com").await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/onboarding",
        Some(&cookie),
        Some(json!({
            "level": "Terminale",
            "objectives": ["Réussir le bac"],
            "diagnosticResults": [{
                "subject": "Maths",
                "score": 3,
                "total": 5,
                "weakAreas": ["Les intégrales"],
            }],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["onboardingComplete"], true);
    assert_eq!(body["user"]["level"], "Terminale");

    let (status, _, body) =
        send(&app, Method::GET, "/api/dashboard", Some(&cookie), None)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"][0]["name"], "Maths");
    assert_eq!(body["skills"][0]["score"], 60);
    assert_eq!(body["stats"]["totalResources"], 0);
    assert_eq!(body["stats"]["completionRate"], 0);
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let app = app();

    for (method, uri) in [
        (Method::GET, "/api/resources"),
        (Method::GET, "/api/schedule"),
        (Method::GET, "/api/chat"),
        (Method::GET, "/api/dashboard"),
    ] {
        let (status, _, body) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHORIZATION_REQUIRED");
    }
}

#[tokio::test]
async fn garbage_session_cookie_is_rejected() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/api/dashboard",
        Some("athena-token=not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHORIZATION_REQUIRED");
}
