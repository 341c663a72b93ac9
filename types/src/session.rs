use anyhow::Context;
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jiff::Timestamp;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{Claims, Result, Role, TokenResponse};

pub const SESSION_COOKIE_NAME: &str = "lendit_session";

/// Everything the backend needs to act on behalf of a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub email: String,
    pub user_id: Option<i64>,
    pub role: Role,
    #[serde(with = "secret_string")]
    pub access_token: SecretString,
    pub expires_at: Option<Timestamp>,
}

impl UserSession {
    pub fn new(token: TokenResponse, claims: Claims) -> Result<Self> {
        let expires_at = claims.exp.map(Timestamp::from_second).transpose()?;

        Ok(Self {
            email: claims.sub,
            user_id: claims.user_id,
            role: claims.role,
            access_token: token.access_token,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// The part of the session that is safe to hand to the browser.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            email: self.email.clone(),
            user_id: self.user_id,
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub email: String,
    pub user_id: Option<i64>,
    pub role: Role,
}

impl SessionInfo {
    pub fn initial(&self) -> String {
        self.email
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string()
    }
}

mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use secrecy::ExposeSecret;
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.into())
    }
}

pub fn encode_session(session: &UserSession) -> Result<String> {
    let json = serde_json::to_string(session).context("failed to serialize session")?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

pub fn decode_session(encoded: &str) -> Result<UserSession> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(encoded)
        .context("failed to decode base64")?;
    let json = String::from_utf8(bytes).context("invalid UTF-8 in session")?;
    Ok(serde_json::from_str(&json).context("failed to parse session JSON")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn session(exp: Option<i64>) -> UserSession {
        let token = TokenResponse {
            access_token: "header.payload.sig".to_string().into(),
            token_type: "bearer".into(),
        };
        let claims = Claims {
            sub: "ravi@example.com".into(),
            role: Role::Agent,
            user_id: Some(12),
            exp,
        };
        UserSession::new(token, claims).unwrap()
    }

    #[test]
    fn expiry_comes_from_claims() {
        let s = session(Some(1_700_000_000));
        let before = Timestamp::from_second(1_699_999_999).unwrap();
        let after = Timestamp::from_second(1_700_000_000).unwrap();
        assert!(!s.is_expired(before));
        assert!(s.is_expired(after));
    }

    #[test]
    fn session_without_expiry_never_expires() {
        assert!(!session(None).is_expired(Timestamp::MAX));
    }

    #[test]
    fn cookie_value_keeps_token() {
        let encoded = encode_session(&session(None)).unwrap();
        let decoded = decode_session(&encoded).unwrap();
        assert_eq!(decoded.access_token.expose_secret(), "header.payload.sig");
        assert_eq!(decoded.info(), session(None).info());
    }

    #[test]
    fn garbage_cookie_is_rejected() {
        assert!(decode_session("not base64!").is_err());
        assert!(decode_session(&BASE64_URL_SAFE_NO_PAD.encode("{}")).is_err());
    }

    #[test]
    fn info_initial() {
        assert_eq!(session(None).info().initial(), "R");
    }
}
