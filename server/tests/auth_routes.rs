mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use server::auth_router;
use tower::ServiceExt;
use types::Role;

fn login_request(email: &str, password: &str) -> Request<Body> {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .append_pair("password", password)
        .finish();

    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn session_cookie(response: &axum::response::Response) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let first = set_cookie.split(';').next()?;
    first
        .strip_prefix("lendit_session=")
        .map(ToString::to_string)
}

#[tokio::test]
async fn admin_login_redirects_to_admin_dashboard() {
    let api = common::spawn_lending_api().await;
    let app = auth_router(common::auth_state(&api));

    let response = app
        .oneshot(login_request("admin@example.com", common::PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age="));

    let cookie = session_cookie(&response).unwrap();
    let session = server::open(common::SECRET.as_bytes(), &cookie).unwrap();
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.email, "admin@example.com");
}

#[tokio::test]
async fn agent_login_redirects_to_agent_dashboard() {
    let api = common::spawn_lending_api().await;
    let app = auth_router(common::auth_state(&api));

    let response = app
        .oneshot(login_request("agent@example.com", common::PASSWORD))
        .await
        .unwrap();

    assert_eq!(location(&response), "/agent");
    let session = server::open(
        common::SECRET.as_bytes(),
        &session_cookie(&response).unwrap(),
    )
    .unwrap();
    assert_eq!(session.role, Role::Agent);
    assert_eq!(session.user_id, Some(2));
}

#[tokio::test]
async fn bad_password_goes_back_to_login_with_message() {
    let api = common::spawn_lending_api().await;
    let app = auth_router(common::auth_state(&api));

    let response = app
        .oneshot(login_request("agent@example.com", "nope"))
        .await
        .unwrap();

    assert_eq!(location(&response), "/login?error=Invalid+credentials");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn empty_form_is_rejected_before_calling_api() {
    let api = common::spawn_lending_api().await;
    let app = auth_router(common::auth_state(&api));

    let response = app.oneshot(login_request(" ", "")).await.unwrap();

    assert_eq!(
        location(&response),
        "/login?error=Email+and+password+are+required"
    );
}

#[tokio::test]
async fn unreachable_api_hides_details() {
    let api: url::Url = "http://127.0.0.1:9".parse().unwrap();
    let app = auth_router(common::auth_state(&api));

    let response = app
        .oneshot(login_request("admin@example.com", common::PASSWORD))
        .await
        .unwrap();

    assert_eq!(location(&response), "/login?error=Login+failed");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let api = common::spawn_lending_api().await;
    let app = auth_router(common::auth_state(&api));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(location(&response), "/login");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("lendit_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}
