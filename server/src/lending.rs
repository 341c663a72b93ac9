use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use types::{
    AgentOutstanding, ApiErrorBody, Error, IssueLoan, Loan, LoanIssued, LoanPage, LoanQuery, LoginRequest,
    NewPayment, NewUser, Payment, PaymentReceipt, Result, TokenResponse, User,
};

trait ReqwestExt {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;
    async fn try_send_empty(self) -> Result<()>;
}

async fn checked(builder: RequestBuilder) -> Result<reqwest::Response> {
    let response = builder
        .send()
        .await
        .context("could not reach the lending API")
        .map_err(|e| Error::from(e).status(502))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = ApiErrorBody::message(&body, status.canonical_reason().unwrap_or("request failed"));
    tracing::warn!(%status, %message, "lending API returned an error");

    Err(Error::with_status(status.as_u16(), message))
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let body = checked(self)
            .await?
            .bytes()
            .await
            .context("failed to read lending API response")?;

        match serde_json::from_slice(&body) {
            Ok(r) => Ok(r),
            Err(error) => {
                tracing::debug!(?error, body_len = body.len(), "failed to parse response");
                Err(anyhow::Error::from(error)
                    .context("unexpected response from the lending API")
                    .into())
            }
        }
    }

    async fn try_send_empty(self) -> Result<()> {
        checked(self).await?;
        Ok(())
    }
}

/// Client for the lending REST API.
#[derive(Clone, Debug)]
pub struct LendingClient {
    client: Client,
    base_url: Url,
}

impl LendingClient {
    pub fn new(mut base_url: Url) -> Self {
        // Paths are joined relative to the base, so it has to end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    fn authed(&self, method: Method, path: &str, token: &SecretString) -> Result<RequestBuilder> {
        Ok(self
            .request(method, path)?
            .bearer_auth(token.expose_secret()))
    }

    fn get(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.authed(Method::GET, path.as_ref(), token)
    }

    fn post(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.authed(Method::POST, path.as_ref(), token)
    }

    fn delete(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.authed(Method::DELETE, path.as_ref(), token)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        self.request(Method::POST, "auth/login")?
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .try_send()
            .await
    }

    pub async fn register_user(&self, token: &SecretString, user: &NewUser) -> Result<()> {
        // The API answers with a token for the new user, which we have no use for.
        self.post("auth/register", token)?
            .json(user)
            .try_send::<IgnoredAny>()
            .await?;
        Ok(())
    }

    pub async fn list_users(&self, token: &SecretString) -> Result<Vec<User>> {
        self.get("users", token)?.try_send().await
    }

    pub async fn delete_user(&self, token: &SecretString, user_id: i64) -> Result<()> {
        self.delete(format!("users/{user_id}"), token)?
            .try_send_empty()
            .await
    }

    pub async fn list_loans(&self, token: &SecretString, query: &LoanQuery) -> Result<LoanPage> {
        let rows: Vec<Loan> = self
            .get("loans", token)?
            .query(&query.query_pairs())
            .try_send()
            .await?;

        Ok(query.apply(rows))
    }

    pub async fn all_loans(&self, token: &SecretString) -> Result<Vec<Loan>> {
        self.get("loans", token)?.try_send().await
    }

    pub async fn loan_details(&self, token: &SecretString, loan_id: i64) -> Result<Loan> {
        self.get(format!("loans/{loan_id}/details"), token)?
            .try_send()
            .await
    }

    pub async fn loan_summary(&self, token: &SecretString) -> Result<Vec<AgentOutstanding>> {
        self.get("loans/summary", token)?.try_send().await
    }

    pub async fn issue_loan(&self, token: &SecretString, loan: &IssueLoan) -> Result<LoanIssued> {
        self.post("loans/issue", token)?
            .json(loan)
            .try_send()
            .await
    }

    pub async fn list_payments(&self, token: &SecretString) -> Result<Vec<Payment>> {
        self.get("payments", token)?.try_send().await
    }

    pub async fn record_payment(
        &self,
        token: &SecretString,
        payment: &NewPayment,
    ) -> Result<PaymentReceipt> {
        self.post("payments/pay", token)?
            .json(payment)
            .try_send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> LendingClient {
        LendingClient::new(Url::parse(base).unwrap())
    }

    #[test]
    fn joins_paths_under_base() {
        assert_eq!(
            client("http://localhost:8000").url("loans").unwrap().as_str(),
            "http://localhost:8000/loans"
        );
        assert_eq!(
            client("http://lending.internal/api").url("/loans/3/details").unwrap().as_str(),
            "http://lending.internal/api/loans/3/details"
        );
        assert_eq!(
            client("http://lending.internal/api/").url("auth/login").unwrap().as_str(),
            "http://lending.internal/api/auth/login"
        );
    }
}
