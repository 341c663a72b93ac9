use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A serializable error for client rendering.
///
/// Built from an [`anyhow::Error`], so context added with `.context(..)` ends
/// up in `chain`. When `RUST_BACKTRACE=1` is set, `backtrace` is captured too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
    pub chain: Vec<String>,
    pub backtrace: Option<String>,
    /// HTTP status to report to the browser, if one applies.
    pub status: Option<u16>,
}

impl Error {
    pub fn msg(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            chain: vec![message.clone()],
            message,
            backtrace: None,
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::msg(message)
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_status(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_status(403, message)
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(report: anyhow::Error) -> Self {
        let backtrace = match report.backtrace().status() {
            std::backtrace::BacktraceStatus::Captured => Some(report.backtrace().to_string()),
            _ => None,
        };

        Self {
            message: report.to_string(),
            chain: report.chain().map(ToString::to_string).collect(),
            backtrace,
            status: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        anyhow::Error::from(error).into()
    }
}

impl From<base64::DecodeError> for Error {
    fn from(error: base64::DecodeError) -> Self {
        anyhow::Error::from(error).into()
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        anyhow::Error::from(error).into()
    }
}

impl From<jiff::Error> for Error {
    fn from(error: jiff::Error) -> Self {
        anyhow::Error::from(error).into()
    }
}

/// Error body returned by the lending API, `{"detail": ...}`.
///
/// `detail` is usually a string, but validation failures send a list of
/// objects instead.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Parse an error body, falling back to `fallback` when the body has no
    /// usable detail.
    pub fn message(body: &[u8], fallback: &str) -> String {
        let parsed: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
        match parsed.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Null) | None => fallback.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Build a [`crate::Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}
