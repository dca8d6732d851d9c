use std::fmt;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{CibotError, Result};

/// Opaque API token. Deliberately excluded from Debug output so a token
/// can never leak through logs or panic messages.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated interactive user. Owned by the presentation layer and
/// passed by reference into every gateway call; the gateway never stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// Validates a username/password pair and produces a session.
pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<Session>;
}

#[derive(Debug, Deserialize)]
struct CredentialEntry {
    username: String,
    password: String,
    role: Role,
}

/// Credential store backed by a JSON file of `{username, password, role}`
/// entries. Loaded once at startup; the file is the source of truth for
/// who may open a chat session (CI-server credentials are separate, see
/// `config::Credentials`).
pub struct CredentialFile {
    entries: Vec<CredentialEntry>,
}

impl CredentialFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CibotError::Config(format!("Failed to read users file {}: {e}", path.display()))
        })?;

        let entries: Vec<CredentialEntry> = serde_json::from_str(&contents).map_err(|e| {
            CibotError::Config(format!(
                "Failed to parse users file {}: {e}",
                path.display()
            ))
        })?;

        Ok(Self { entries })
    }
}

impl Authenticator for CredentialFile {
    fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.username == username && entry.password == password);

        match entry {
            Some(entry) => Ok(Session::new(entry.username.clone(), entry.role)),
            None => {
                warn!("Failed login attempt for user '{username}'");
                Err(CibotError::Authorization(
                    "Invalid username or password".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store() -> CredentialFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"[
  {{"username": "alice", "password": "wonderland", "role": "user"}},
  {{"username": "root", "password": "toor", "role": "admin"}}
]"#
        )
        .unwrap();

        CredentialFile::load(temp_file.path()).unwrap()
    }

    #[test]
    fn test_authenticate_known_user() {
        let session = store().authenticate("alice", "wonderland").unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.role, Role::User);
        assert!(!session.role.is_admin());
    }

    #[test]
    fn test_authenticate_admin_role() {
        let session = store().authenticate("root", "toor").unwrap();
        assert!(session.role.is_admin());
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let result = store().authenticate("alice", "nope");
        assert!(matches!(result, Err(CibotError::Authorization(_))));
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let result = store().authenticate("mallory", "wonderland");
        assert!(matches!(result, Err(CibotError::Authorization(_))));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "not json").unwrap();

        let result = CredentialFile::load(temp_file.path());
        assert!(matches!(result, Err(CibotError::Config(_))));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::from("super-secret");
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.as_str(), "super-secret");
    }
}
