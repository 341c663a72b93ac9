use std::path::Path;

use anyhow::Context;
use config::{Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use types::Result;
use url::Url;

/// Backend settings.
///
/// Read from `lendit.toml` (optional) and `LENDIT_*` environment variables,
/// the latter taking precedence.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Base URL of the lending API, e.g. `http://localhost:8000`.
    pub api_url: Url,
    /// Key for signing the session cookie.
    pub session_secret: SecretString,
    /// Mark the session cookie `Secure`. Turn on when served over HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("lendit.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("LENDIT"))
            .build()
            .context("failed to read configuration")?;

        Ok(config
            .try_deserialize()
            .context("invalid configuration")?)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .context("failed to read configuration")?;

        Ok(config
            .try_deserialize()
            .context("invalid configuration")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn reads_toml() {
        let config = Config::from_toml(
            r#"
            api_url = "http://localhost:8000"
            session_secret = "correct horse battery staple"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(
            config.session_secret.expose_secret(),
            "correct horse battery staple"
        );
        assert!(!config.secure_cookies);
    }

    #[test]
    fn api_url_is_required() {
        assert!(Config::from_toml(r#"session_secret = "s""#).is_err());
    }

    #[test]
    fn rejects_bad_url() {
        let result = Config::from_toml(
            r#"
            api_url = "not a url"
            session_secret = "s"
            "#,
        );
        assert!(result.is_err());
    }
}
