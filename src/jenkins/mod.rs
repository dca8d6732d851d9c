mod client;
mod gateway;
mod policy;
mod types;

pub use client::JenkinsClient;
pub use gateway::{JenkinsGateway, JOB_DISPLAY_LIMIT};
pub use types::{BuildStatus, BuildSummary, HealthCheck, HealthReport, Job};
