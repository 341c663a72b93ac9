mod auth;
mod error;
pub mod forms;
mod lending;
mod metrics;
mod paging;
mod session;

pub use auth::{Claims, LoginRequest, Role, TokenResponse};
pub use error::{ApiErrorBody, Error, Result};
pub use lending::{
    AgentOutstanding, IssueLoan, Loan, LoanDraft, LoanIssued, LoanStatus, NewPayment, NewUser,
    Payment, PaymentFrequency, PaymentReceipt, RepaymentMethod, User, rupees,
};
pub use metrics::{LoanMetrics, StatusShare};
pub use paging::{DEFAULT_PAGE_SIZE, LoanPage, LoanQuery, PAGE_SIZES};
pub use session::{SESSION_COOKIE_NAME, SessionInfo, UserSession, decode_session, encode_session};

#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
