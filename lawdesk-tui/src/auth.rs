//! Authentication context injected into the REST client.
//!
//! Built once from configuration and attached to every request; nothing
//! else reads credentials.

use crate::config::{AuthConfig, ConfigError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fmt;

#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        if let Some(token) = &config.bearer_token {
            return Ok(Self::bearer(token.trim()));
        }
        if let Some(path) = &config.token_path {
            let token = std::fs::read_to_string(path)?;
            let token = token.trim();
            if token.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.token_path",
                    reason: format!("{} is empty", path.display()),
                });
            }
            return Ok(Self::bearer(token));
        }
        Ok(Self::anonymous())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Headers attached to every request.
    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "auth.bearer_token",
                    reason: e.to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bearer_header() {
        let headers = AuthContext::bearer("abc").header_map().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_anonymous_has_no_header() {
        let headers = AuthContext::anonymous().header_map().unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_token_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token  ").unwrap();
        let config = AuthConfig {
            bearer_token: None,
            token_path: Some(file.path().to_path_buf()),
        };
        let auth = AuthContext::from_config(&config).unwrap();
        assert_eq!(
            auth.header_map().unwrap().get(AUTHORIZATION).unwrap(),
            "Bearer file-token"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", AuthContext::bearer("secret"));
        assert!(!rendered.contains("secret"));
    }
}
