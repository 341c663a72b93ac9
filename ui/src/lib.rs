//! Components shared by the admin and agent dashboards.

use dioxus::prelude::*;

mod loadable;
pub use loadable::Loadable;

mod loans_table;
pub use loans_table::{LoansTable, Pagination};

mod metrics;
pub use metrics::{KeyMetrics, MetricCard};

/// The message to show for a failed server call.
pub fn server_message(err: &ServerFnError) -> String {
    match err {
        ServerFnError::ServerError { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Whether the API turned the request down (bad input, a conflict), as
/// opposed to the session lapsing or the backend failing.
pub fn is_rejection(err: &ServerFnError) -> bool {
    matches!(err, ServerFnError::ServerError { code, .. } if *code != 401 && (400..500).contains(code))
}
