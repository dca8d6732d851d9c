use std::collections::HashMap;
use std::path::Path;

use crate::error::{CibotError, Result};

/// Endpoint templates every registry must provide.
const REQUIRED_KEYS: [&str; 5] = [
    "jobs_endpoint",
    "build_endpoint",
    "last_build_summary",
    "specific_build_summary",
    "job_health",
];

/// Default templates shipped with the binary.
const BUILTIN_ENDPOINTS: &str = include_str!("../config/endpoints.json");

/// Maps logical operation keys to CI server path templates with
/// `{job_name}` / `{build_number}` placeholders. Loaded once at startup;
/// immutable thereafter.
#[derive(Debug)]
pub struct EndpointRegistry {
    templates: HashMap<String, String>,
}

impl EndpointRegistry {
    /// Registry built from the templates embedded at compile time.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ENDPOINTS)
    }

    /// Registry loaded from an override file supplied via app config.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CibotError::Config(format!(
                "Failed to read endpoints file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }

    fn from_json(contents: &str) -> Result<Self> {
        let templates: HashMap<String, String> = serde_json::from_str(contents)
            .map_err(|e| CibotError::Config(format!("Failed to parse endpoints: {e}")))?;

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .filter(|key| !templates.contains_key(**key))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(CibotError::Config(format!(
                "Endpoints resource is missing required keys: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { templates })
    }

    /// Fill the named placeholders of the template addressed by `key` and
    /// return the resulting relative path. Substitution values are
    /// percent-encoded, so job names with spaces or slashes stay one path
    /// segment.
    pub fn resolve(&self, key: &str, substitutions: &[(&str, &str)]) -> Result<String> {
        let template = self
            .templates
            .get(key)
            .ok_or_else(|| CibotError::Config(format!("Unknown endpoint key: {key}")))?;

        let mut path = template.clone();
        for (name, value) in substitutions {
            path = path.replace(
                &format!("{{{name}}}"),
                urlencoding::encode(value).as_ref(),
            );
        }

        if let Some(start) = path.find('{') {
            let end = path[start..].find('}').map_or(path.len(), |i| start + i + 1);
            return Err(CibotError::Config(format!(
                "Unresolved placeholder {} in endpoint '{key}'",
                &path[start..end]
            )));
        }

        Ok(path)
    }
}
