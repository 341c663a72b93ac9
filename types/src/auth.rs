use std::{fmt, str::FromStr};

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, err};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
        }
    }

    /// Where this role lands after signing in.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Agent => "/agent",
        }
    }

    pub fn dashboard_title(self) -> &'static str {
        match self {
            Role::Admin => "Admin Dashboard",
            Role::Agent => "Agent Dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            other => Err(err!("unsupported role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: String,
}

/// The payload of an access token issued by the lending API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// The user's email address.
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Expiry, in seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Read the claims out of a JWT without checking its signature.
    ///
    /// The lending API verifies every token it receives; here we only need
    /// the role and identity to pick a dashboard.
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(err!("malformed access token"));
        };

        let bytes = BASE64_URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let claims = serde_json::from_slice(&bytes)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(payload: serde_json::Value) -> String {
        let header = BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = BASE64_URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    #[test]
    fn decodes_role_and_subject() {
        let claims = Claims::decode_unverified(&token(json!({
            "sub": "asha@example.com",
            "role": "agent",
            "user_id": 4,
            "exp": 1_900_000_000,
        })))
        .unwrap();

        assert_eq!(claims.sub, "asha@example.com");
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.user_id, Some(4));
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn user_id_and_expiry_are_optional() {
        let claims =
            Claims::decode_unverified(&token(json!({"sub": "root@example.com", "role": "admin"})))
                .unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.user_id, None);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn rejects_unknown_role() {
        let result =
            Claims::decode_unverified(&token(json!({"sub": "x@example.com", "role": "owner"})));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(Claims::decode_unverified("only.two").is_err());
        assert!(Claims::decode_unverified("a.b.c.d").is_err());
        assert!(Claims::decode_unverified("").is_err());
    }

    #[test]
    fn tolerates_padded_payload() {
        let header = BASE64_URL_SAFE_NO_PAD.encode(b"{}");
        let payload = base64::prelude::BASE64_URL_SAFE
            .encode(json!({"sub": "a@b.c", "role": "admin"}).to_string());
        let claims = Claims::decode_unverified(&format!("{header}.{payload}.sig")).unwrap();
        assert_eq!(claims.sub, "a@b.c");
    }

    #[test]
    fn role_paths() {
        assert_eq!(Role::Admin.home_path(), "/admin");
        assert_eq!(Role::Agent.home_path(), "/agent");
        assert_eq!("agent".parse::<Role>().unwrap(), Role::Agent);
        assert!("Agent".parse::<Role>().is_err());
    }
}
