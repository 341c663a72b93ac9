use dioxus::prelude::*;
use types::{
    AgentOutstanding, Loan, LoanDraft, LoanIssued, LoanMetrics, LoanPage, LoanQuery, NewUser, Payment,
    PaymentReceipt, SessionInfo, User,
};

#[cfg(feature = "server")]
use types::{IssueLoan, NewPayment, Role, UserSession};

/// Turn a backend error into one the browser can render, keeping the HTTP
/// status so the UI can tell an expired session from a failed request.
#[cfg(feature = "server")]
fn reply<T>(result: types::Result<T>) -> ServerFnResult<T> {
    result.map_err(|err| {
        if err.status.is_none_or(|code| code >= 500) {
            tracing::error!(error = %err, chain = ?err.chain, "server function failed");
        }
        ServerFnError::ServerError {
            message: err.message,
            code: err.status.unwrap_or(500),
            details: Some(serde_json::json!({
                "chain": err.chain,
                "backtrace": err.backtrace,
            })),
        }
    })
}

/// A missing or lapsed session is an ordinary signed-out visitor. Anything
/// else still signs them out, but gets logged.
#[cfg(feature = "server")]
fn signed_in(session: types::Result<UserSession>) -> Option<SessionInfo> {
    match session {
        Ok(session) => Some(session.info()),
        Err(e) if e.status == Some(401) => None,
        Err(e) => {
            tracing::error!(error = %e, chain = ?e.chain, "could not read the session");
            None
        }
    }
}

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<SessionInfo>> {
    Ok(signed_in(server::require_session().await))
}

/// One page of loans, as visible to the signed-in user.
#[post("/api/loans")]
pub async fn list_loans(query: LoanQuery) -> ServerFnResult<LoanPage> {
    reply(
        async {
            let session = server::require_session().await?;
            server::lending()?
                .list_loans(&session.access_token, &query)
                .await
        }
        .await,
    )
}

#[post("/api/loans/details")]
pub async fn loan_details(loan_id: i64) -> ServerFnResult<Loan> {
    reply(
        async {
            let session = server::require_session().await?;
            server::lending()?
                .loan_details(&session.access_token, loan_id)
                .await
        }
        .await,
    )
}

#[post("/api/loans/metrics")]
pub async fn loan_metrics() -> ServerFnResult<LoanMetrics> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            let loans = server::lending()?.all_loans(&session.access_token).await?;
            Ok(LoanMetrics::from_loans(&loans))
        }
        .await,
    )
}

#[post("/api/loans/summary")]
pub async fn loan_summary() -> ServerFnResult<Vec<AgentOutstanding>> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            let mut rows = server::lending()?
                .loan_summary(&session.access_token)
                .await?;
            rows.sort_by(|a, b| b.total_outstanding.total_cmp(&a.total_outstanding));
            Ok(rows)
        }
        .await,
    )
}

#[post("/api/payments")]
pub async fn list_payments() -> ServerFnResult<Vec<Payment>> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            let mut payments = server::lending()?
                .list_payments(&session.access_token)
                .await?;
            payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date).then(b.id.cmp(&a.id)));
            Ok(payments)
        }
        .await,
    )
}

/// Loans the signed-in agent is responsible for.
///
/// Tokens that carry no user id cannot be matched to loans, so those agents
/// see everything the API returns.
#[post("/api/agent/loans")]
pub async fn list_agent_loans() -> ServerFnResult<Vec<Loan>> {
    reply(
        async {
            let session = server::require_role(Role::Agent).await?;
            let loans = server::lending()?.all_loans(&session.access_token).await?;
            Ok(match session.user_id {
                Some(agent_id) => loans.into_iter().filter(|l| l.agent_id == agent_id).collect(),
                None => loans,
            })
        }
        .await,
    )
}

#[post("/api/agent/payments")]
pub async fn record_payment(loan_id: i64, amount_paid: f64) -> ServerFnResult<PaymentReceipt> {
    reply(
        async {
            let session = server::require_role(Role::Agent).await?;
            let receipt = server::lending()?
                .record_payment(
                    &session.access_token,
                    &NewPayment {
                        loan_id,
                        amount_paid,
                    },
                )
                .await?;
            tracing::info!(loan_id, amount_paid, remaining = receipt.remaining_balance, "payment recorded");
            Ok(receipt)
        }
        .await,
    )
}

#[post("/api/agent/loans/issue")]
pub async fn issue_loan(draft: LoanDraft) -> ServerFnResult<LoanIssued> {
    reply(
        async {
            let session = server::require_role(Role::Agent).await?;
            let agent_id = session.user_id.ok_or_else(|| {
                types::err!("your account has no agent id; ask an admin to re-issue your login")
                    .status(400)
            })?;
            let issued = server::lending()?
                .issue_loan(&session.access_token, &IssueLoan::new(draft, agent_id))
                .await?;
            tracing::info!(loan_id = issued.loan_id, agent_id, "loan issued");
            Ok(issued)
        }
        .await,
    )
}

#[post("/api/users")]
pub async fn list_users() -> ServerFnResult<Vec<User>> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            let mut users = server::lending()?.list_users(&session.access_token).await?;
            users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            Ok(users)
        }
        .await,
    )
}

#[post("/api/users/create")]
pub async fn create_user(user: NewUser) -> ServerFnResult<()> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            server::lending()?
                .register_user(&session.access_token, &user)
                .await?;
            tracing::info!(email = %user.email, role = %user.role, "user created");
            Ok(())
        }
        .await,
    )
}

#[post("/api/users/delete")]
pub async fn delete_user(user_id: i64) -> ServerFnResult<()> {
    reply(
        async {
            let session = server::require_role(Role::Admin).await?;
            server::lending()?
                .delete_user(&session.access_token, user_id)
                .await?;
            tracing::info!(user_id, by = %session.email, "user deleted");
            Ok(())
        }
        .await,
    )
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_while(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn lapsed_session_is_quietly_signed_out() {
        let logs = logged_while(|| {
            let session = signed_in(Err(types::Error::with_status(401, "Session expired")));
            assert_eq!(session, None);
        });
        assert!(logs.is_empty(), "unexpected log output: {logs}");
    }

    #[test]
    fn broken_session_is_logged() {
        let logs = logged_while(|| {
            let session = signed_in(Err(types::Error::with_status(500, "session secret missing")));
            assert_eq!(session, None);
        });
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("could not read the session"));
        assert!(logs.contains("session secret missing"));
    }
}
