//! Storage credentials read from the environment

use crate::config::CredentialsConfig;
use std::collections::HashMap;
use std::fmt;

/// Where environment variables come from
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Access key pair, plus a session token for temporary credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Both key variables must be set and non-empty
    pub fn from_env(env: &dyn EnvSource, names: &CredentialsConfig) -> Option<Self> {
        let non_empty = |key: &str| env.var(key).filter(|v| !v.is_empty());

        let access_key_id = non_empty(&names.access_key_env)?;
        let secret_access_key = non_empty(&names.secret_key_env)?;

        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty(&names.session_token_env),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_both_keys_required() {
        let names = CredentialsConfig::default();

        assert!(Credentials::from_env(&env(&[]), &names).is_none());
        assert!(Credentials::from_env(&env(&[("AWS_ACCESS_KEY_ID", "AKID")]), &names).is_none());
        assert!(
            Credentials::from_env(&env(&[("AWS_SECRET_ACCESS_KEY", "secret")]), &names).is_none()
        );

        let creds = Credentials::from_env(
            &env(&[("AWS_ACCESS_KEY_ID", "AKID"), ("AWS_SECRET_ACCESS_KEY", "secret")]),
            &names,
        )
        .unwrap();
        assert_eq!(creds.access_key_id, "AKID");
        assert_eq!(creds.session_token, None);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let names = CredentialsConfig::default();
        let vars = env(&[("AWS_ACCESS_KEY_ID", ""), ("AWS_SECRET_ACCESS_KEY", "secret")]);
        assert!(Credentials::from_env(&vars, &names).is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials {
            access_key_id: "AKID".to_string(),
            secret_access_key: "very-secret".to_string(),
            session_token: Some("token".to_string()),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("very-secret"));
        assert!(shown.contains("AKID"));
    }
}
