use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::Token;
use crate::error::{CibotError, Result};

/// Configuration file structure for cibot.
///
/// Everything here is optional; a missing file yields defaults. CI server
/// credentials are deliberately NOT part of this file; they come from the
/// environment (see [`Credentials`]) so tokens never land on disk twice.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// CI server connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Interactive-login settings
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Override file for the endpoint templates
    pub endpoints_file: Option<PathBuf>,

    /// Request timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuthConfig {
    /// Credential store for chat logins
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
        }
    }
}

fn default_users_file() -> PathBuf {
    PathBuf::from("config/users.json")
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./cibot.toml
    /// 3. ./cibot.json
    /// 4. ./cibot.yaml
    /// 5. ./cibot.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["cibot.toml", "cibot.json", "cibot.yaml", "cibot.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CibotError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents).map_err(|e| {
                CibotError::Config(format!("Failed to parse TOML config {}: {e}", path.display()))
            }),
            "json" => serde_json::from_str(&contents).map_err(|e| {
                CibotError::Config(format!("Failed to parse JSON config {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                CibotError::Config(format!("Failed to parse YAML config {}: {e}", path.display()))
            }),
            _ => toml::from_str(&contents)
                .ok()
                .or_else(|| serde_json::from_str(&contents).ok())
                .or_else(|| serde_yaml::from_str(&contents).ok())
                .ok_or_else(|| {
                    CibotError::Config(format!("Failed to parse config file {}", path.display()))
                }),
        }
    }
}

/// CI server credentials resolved from the environment.
///
/// `JENKINS_BASE_URL` (with `JENKINS_URL` as a fallback), `JENKINS_USER`
/// and `JENKINS_API_TOKEN` are all required; startup fails with one error
/// listing every missing variable.
#[derive(Debug)]
pub struct Credentials {
    pub base_url: String,
    pub user: String,
    pub token: Token,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("JENKINS_BASE_URL").or_else(|| lookup("JENKINS_URL"));
        let user = lookup("JENKINS_USER");
        let token = lookup("JENKINS_API_TOKEN");

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push("JENKINS_BASE_URL");
        }
        if user.is_none() {
            missing.push("JENKINS_USER");
        }
        if token.is_none() {
            missing.push("JENKINS_API_TOKEN");
        }

        match (base_url, user, token) {
            (Some(base_url), Some(user), Some(token)) => Ok(Self {
                base_url,
                user,
                token: Token::from(token),
            }),
            _ => Err(CibotError::Config(format!(
                "Missing environment variables: {}. Please check your environment.",
                missing.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| (*v).to_string())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.server.endpoints_file.is_none());
        assert!(config.server.timeout_secs.is_none());
        assert_eq!(config.auth.users_file, PathBuf::from("config/users.json"));
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[server]
endpoints-file = "/etc/cibot/endpoints.json"
timeout-secs = 30

[auth]
users-file = "/etc/cibot/users.json"
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.server.endpoints_file,
            Some(PathBuf::from("/etc/cibot/endpoints.json"))
        );
        assert_eq!(config.server.timeout_secs, Some(30));
        assert_eq!(config.auth.users_file, PathBuf::from("/etc/cibot/users.json"));
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "server": {
    "timeout-secs": 10
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.server.timeout_secs, Some(10));
        assert!(config.server.endpoints_file.is_none());
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let result = Config::load(Some(Path::new("nonexistent.toml")));
        assert!(matches!(result, Err(CibotError::Config(_))));
    }

    #[test]
    fn test_credentials_all_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("JENKINS_BASE_URL", "http://ci.example.com:8080"),
            ("JENKINS_USER", "svc-cibot"),
            ("JENKINS_API_TOKEN", "11abcdef"),
        ]))
        .unwrap();

        assert_eq!(creds.base_url, "http://ci.example.com:8080");
        assert_eq!(creds.user, "svc-cibot");
        assert_eq!(creds.token.as_str(), "11abcdef");
    }

    #[test]
    fn test_credentials_url_fallback() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("JENKINS_URL", "http://ci.example.com:8080"),
            ("JENKINS_USER", "svc-cibot"),
            ("JENKINS_API_TOKEN", "11abcdef"),
        ]))
        .unwrap();

        assert_eq!(creds.base_url, "http://ci.example.com:8080");
    }

    #[test]
    fn test_credentials_missing_token_is_named() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("JENKINS_BASE_URL", "http://ci.example.com:8080"),
            ("JENKINS_USER", "svc-cibot"),
        ]))
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("JENKINS_API_TOKEN"));
        assert!(!message.contains("JENKINS_USER"));
    }

    #[test]
    fn test_credentials_all_missing_listed() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("JENKINS_BASE_URL"));
        assert!(message.contains("JENKINS_USER"));
        assert!(message.contains("JENKINS_API_TOKEN"));
    }
}
