use axum::{
    Form, Router,
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use types::{Claims, Result, Role, SESSION_COOKIE_NAME, UserSession, err};
use url::form_urlencoded;

use crate::{Config, LendingClient, seal};

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<Config>,
    pub client: LendingClient,
}

impl AuthState {
    pub fn new(config: Config, client: LendingClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: SecretString,
}

async fn login(State(state): State<AuthState>, Form(form): Form<LoginForm>) -> Response {
    match login_inner(&state, &form).await {
        Ok((role, cookie)) => {
            tracing::info!(email = %form.email, %role, "signed in");
            with_cookie(Redirect::to(role.home_path()), cookie)
        }
        Err(e) => {
            tracing::warn!(email = %form.email, error = %e, "sign-in failed");
            let message = match e.status {
                Some(status) if status < 500 => e.message,
                _ => "Login failed".to_string(),
            };
            let error: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
            Redirect::to(&format!("/login?error={error}")).into_response()
        }
    }
}

async fn login_inner(state: &AuthState, form: &LoginForm) -> Result<(Role, Cookie<'static>)> {
    let email = form.email.trim();
    if email.is_empty() || form.password.expose_secret().is_empty() {
        return Err(err!("Email and password are required").status(400));
    }

    let token = state
        .client
        .login(email, form.password.expose_secret())
        .await?;
    let claims = Claims::decode_unverified(token.access_token.expose_secret())?;
    let session = UserSession::new(token, claims)?;
    let role = session.role;

    let value = seal(
        state.config.session_secret.expose_secret().as_bytes(),
        &session,
    )?;

    let mut cookie = Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies)
        .build();

    if let Some(expires_at) = session.expires_at {
        let remaining = expires_at.as_second() - Timestamp::now().as_second();
        cookie.set_max_age(cookie::time::Duration::seconds(remaining.max(0)));
    }

    Ok((role, cookie))
}

async fn logout() -> impl IntoResponse {
    // Clear the session cookie
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build();

    with_cookie(Redirect::to("/login"), cookie)
}

fn with_cookie(redirect: Redirect, cookie: Cookie<'_>) -> Response {
    let mut response = redirect.into_response();
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(error) => tracing::error!(%error, "session cookie is not a valid header"),
    }
    response
}
