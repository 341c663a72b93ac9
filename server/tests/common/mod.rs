#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde_json::{Value, json};
use server::{AuthState, Config, LendingClient};
use tokio::net::TcpListener;
use url::Url;

pub const PASSWORD: &str = "hunter22";
pub const SECRET: &str = "integration test secret";

/// A JWT-shaped token with the given claims. The signature is never checked
/// on our side.
pub fn fake_token(email: &str, role: &str, user_id: i64) -> String {
    let header = BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = jiff::Timestamp::now().as_second() + 3600;
    let payload = BASE64_URL_SAFE_NO_PAD
        .encode(json!({"sub": email, "role": role, "user_id": user_id, "exp": exp}).to_string());
    format!("{header}.{payload}.signature")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
}

fn loan(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "borrower_id": 100 + id,
        "agent_id": 2,
        "amount": 1000.0 * id as f64,
        "loan_date": "2025-01-10",
        "interest_rate": 2.0,
        "repayment_method": "full",
        "payment_frequency": null,
        "status": status,
        "remaining_balance": 500.0,
        "agent_name": "Meera",
        "borrower_name": format!("Borrower {id}")
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let role = if email.starts_with("admin") { "admin" } else { "agent" };
    Json(json!({
        "access_token": fake_token(email, role, 2),
        "token_type": "bearer"
    }))
    .into_response()
}

#[derive(Deserialize)]
struct LoansParams {
    skip: Option<usize>,
    limit: Option<usize>,
    status: Option<String>,
}

/// Honours `skip`, `limit` and `status` when a caller sends them.
async fn loans(headers: HeaderMap, Query(params): Query<LoansParams>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate token");
    }
    let rows: Vec<Value> = [
        loan(1, "active"),
        loan(2, "completed"),
        loan(3, "active"),
        loan(4, "active"),
        loan(5, "completed"),
    ]
    .into_iter()
    .filter(|row| params.status.as_ref().is_none_or(|s| row["status"] == *s))
    .skip(params.skip.unwrap_or(0))
    .take(params.limit.unwrap_or(usize::MAX))
    .collect();
    Json(rows).into_response()
}

async fn loan_details(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate token");
    }
    if !(1..=5).contains(&id) {
        return detail(StatusCode::NOT_FOUND, "Loan not found");
    }
    let mut row = loan(id, "active");
    row["remaining_balance"] = json!(512.5);
    row["days_elapsed"] = json!(12);
    Json(row).into_response()
}

/// Refuses payloads missing a field the real API requires.
async fn issue(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate token");
    }
    for field in ["borrower_name", "amount", "interest_rate", "repayment_method", "agent_id"] {
        if body.get(field).is_none_or(Value::is_null) {
            return detail(StatusCode::UNPROCESSABLE_ENTITY, &format!("{field} is required"));
        }
    }
    if body["repayment_method"] == "interest" && body["payment_frequency"].is_null() {
        return detail(
            StatusCode::BAD_REQUEST,
            "Payment frequency is required for interest repayment",
        );
    }
    Json(json!({
        "message": "Loan issued successfully",
        "loan_id": 6,
        "borrower_id": 106,
        "agent_id": body["agent_id"],
        "amount": body["amount"],
        "status": "active"
    }))
    .into_response()
}

async fn users(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate token");
    }
    Json(json!([
        {"id": 1, "name": "Asha", "email": "admin@example.com", "role": "admin"},
        {"id": 2, "name": "Meera", "email": "agent@example.com", "role": "agent"},
    ]))
    .into_response()
}

async fn payments(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate token");
    }
    Json(json!([
        {"id": 1, "loan_id": 1, "amount_paid": 250.0, "payment_date": "2025-02-01", "loan_amount": 1000.0},
        {"id": 2, "loan_id": 3, "amount_paid": 75.5, "payment_date": null, "loan_amount": null},
    ]))
    .into_response()
}

async fn summary() -> Response {
    Json(json!([{"agent_name": "Meera", "total_outstanding": 1234.5}])).into_response()
}

async fn pay(Json(body): Json<Value>) -> Response {
    let amount = body["amount_paid"].as_f64().unwrap_or_default();
    if amount > 500.0 {
        return detail(StatusCode::BAD_REQUEST, "Payment exceeds remaining balance.");
    }
    Json(json!({
        "message": "Payment recorded successfully",
        "remaining_balance": 500.0 - amount
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(json!({"access_token": "x.y.z", "token_type": "bearer"})).into_response()
}

async fn delete_user(Path(id): Path<i64>) -> StatusCode {
    if id == 404 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

pub fn lending_api() -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/loans", get(loans))
        .route("/loans/summary", get(summary))
        .route("/loans/issue", post(issue))
        .route("/loans/{id}/details", get(loan_details))
        .route("/payments", get(payments))
        .route("/payments/pay", post(pay))
        .route("/users", get(users))
        .route("/users/{id}", delete(delete_user))
}

/// Serve the stand-in lending API on a random local port.
pub async fn spawn_lending_api() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, lending_api()).await.unwrap();
    });

    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

pub fn config(api_url: &Url) -> Config {
    Config::from_toml(&format!(
        r#"
        api_url = "{api_url}"
        session_secret = "{SECRET}"
        "#
    ))
    .unwrap()
}

pub fn auth_state(api_url: &Url) -> AuthState {
    AuthState::new(config(api_url), LendingClient::new(api_url.clone()))
}
