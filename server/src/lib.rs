mod auth_routes;
mod config;
mod lending;

use std::sync::OnceLock;

use axum::Router;
use axum::http::HeaderMap;
use base64::prelude::*;
use dioxus::fullstack::FullstackContext;
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use secrecy::ExposeSecret;
use sha2::Sha256;
use types::{Error, Result, Role, SESSION_COOKIE_NAME, UserSession, decode_session, encode_session, err};

pub use crate::auth_routes::{AuthState, auth_router};
pub use crate::config::Config;
pub use crate::lending::LendingClient;

type HmacSha256 = Hmac<Sha256>;

static CONFIG: OnceLock<Config> = OnceLock::new();
static LENDING_CLIENT: OnceLock<LendingClient> = OnceLock::new();

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Dioxus may already have installed a subscriber in dev builds.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration and build the auth routes. Must run before any server
/// function is called.
pub fn init() -> Result<Router> {
    let config = Config::load()?;
    tracing::info!(api_url = %config.api_url, "using lending API");

    let client = LendingClient::new(config.api_url.clone());
    let state = AuthState::new(config.clone(), client.clone());

    // A second init (e.g. on hot reload) keeps the first values.
    let _ = CONFIG.set(config);
    let _ = LENDING_CLIENT.set(client);

    Ok(auth_router(state))
}

fn config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| err!("server configuration not initialized"))
}

pub fn lending() -> Result<&'static LendingClient> {
    LENDING_CLIENT
        .get()
        .ok_or_else(|| err!("lending client not initialized"))
}

/// Sign a session for storage in the cookie: `<payload>.<signature>`.
pub fn seal(secret: &[u8], session: &UserSession) -> Result<String> {
    let payload = encode_session(session)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| err!("invalid session secret"))?;
    mac.update(payload.as_bytes());
    let signature = BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// Verify and decode a cookie value produced by [`seal`].
pub fn open(secret: &[u8], token: &str) -> Result<UserSession> {
    let (payload, signature_b64) = token
        .split_once('.')
        .ok_or_else(|| err!("invalid session format"))?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| err!("invalid session secret"))?;
    mac.update(payload.as_bytes());

    let signature = BASE64_URL_SAFE_NO_PAD.decode(signature_b64)?;
    mac.verify_slice(&signature)
        .map_err(|_| err!("session signature mismatch"))?;

    decode_session(payload)
}

/// Check that `session` may act as `role` at `now`.
pub fn authorize(session: &UserSession, role: Role, now: Timestamp) -> Result<()> {
    if session.is_expired(now) {
        return Err(Error::unauthorized("Your session has expired. Please sign in again."));
    }

    if session.role != role {
        return Err(Error::forbidden(format!(
            "access denied: '{}' is signed in as {}, this needs {}",
            session.email, session.role, role
        )));
    }

    Ok(())
}

pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;

    cookie_header.split(';').find_map(|cookie_str| {
        cookie_str
            .trim()
            .strip_prefix(SESSION_COOKIE_NAME)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

/// Extract the user session from the request cookie.
pub async fn get_session_from_cookie() -> Result<UserSession> {
    let headers: HeaderMap = FullstackContext::extract()
        .await
        .map_err(|e| err!("failed to read request headers: {e}"))?;

    let token =
        session_cookie(&headers).ok_or_else(|| Error::unauthorized("Please sign in."))?;

    let secret = config()?.session_secret.expose_secret().as_bytes();
    open(secret, token).map_err(|e| {
        tracing::debug!(error = %e, "rejecting session cookie");
        Error::unauthorized("Your session is invalid. Please sign in again.")
    })
}

/// Require a live session of any role.
pub async fn require_session() -> Result<UserSession> {
    let session = get_session_from_cookie().await?;
    if session.is_expired(Timestamp::now()) {
        return Err(Error::unauthorized("Your session has expired. Please sign in again."));
    }
    Ok(session)
}

/// Require a live session with the given role.
pub async fn require_role(role: Role) -> Result<UserSession> {
    let session = get_session_from_cookie().await?;
    authorize(&session, role, Timestamp::now()).inspect_err(|e| {
        tracing::warn!(email = %session.email, required = %role, error = %e, "request refused");
    })?;
    Ok(session)
}
