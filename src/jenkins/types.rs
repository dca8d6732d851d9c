use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named job as listed by the CI server. Transient, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
}

/// Response from the CI server for the job list endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Raw build record as returned by `.../api/json`.
#[derive(Debug, Deserialize)]
pub(super) struct BuildInfo {
    pub number: u32,
    pub result: Option<String>,
    pub url: String,
    /// Build start, epoch milliseconds
    pub timestamp: Option<i64>,
    /// Wall-clock duration, milliseconds
    pub duration: Option<i64>,
}

/// Response from the per-job endpoint; only the health report is consumed.
#[derive(Debug, Deserialize)]
pub(super) struct JobInfo {
    #[serde(rename = "healthReport", default)]
    pub health_report: Vec<HealthCheck>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildStatus {
    Success,
    Failure,
    Unknown,
    /// Synthesized when the server omits `result`: the build has not
    /// finished yet.
    Running,
}

impl BuildStatus {
    /// The server reports `result: null` until a build completes, and may
    /// report vocabulary outside SUCCESS/FAILURE (ABORTED, UNSTABLE) that
    /// collapses to Unknown here.
    pub fn from_result(result: Option<&str>) -> Self {
        match result {
            None => BuildStatus::Running,
            Some("SUCCESS") => BuildStatus::Success,
            Some("FAILURE") => BuildStatus::Failure,
            Some(_) => BuildStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::Unknown => "UNKNOWN",
            BuildStatus::Running => "RUNNING",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized view of one build, derived per call.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub number: u32,
    pub status: BuildStatus,
    pub url: String,
    pub started_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
}

impl From<BuildInfo> for BuildSummary {
    fn from(info: BuildInfo) -> Self {
        Self {
            number: info.number,
            status: BuildStatus::from_result(info.result.as_deref()),
            url: info.url,
            started_at: info
                .timestamp
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            duration_ms: info.duration.filter(|ms| *ms > 0),
        }
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Build #{} Status: {} - {}",
            self.number, self.status, self.url
        )
    }
}

/// One entry of a job's health report. Deployed CI servers emit either a
/// bare status string or a scored object; both are accepted and passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthCheck {
    Status(String),
    Scored {
        description: String,
        score: i64,
    },
}

impl HealthCheck {
    pub fn label(&self) -> &str {
        match self {
            HealthCheck::Status(status) => status,
            HealthCheck::Scored { description, .. } => description,
        }
    }
}

/// Ordered per-check sequence for one job, exactly as the server sent it.
pub type HealthReport = Vec<HealthCheck>;
