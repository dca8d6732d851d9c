use indexmap::IndexMap;
use log::{info, warn};

use crate::auth::Session;
use crate::endpoints::EndpointRegistry;
use crate::error::{CibotError, Result};

use super::client::JenkinsClient;
use super::policy::{is_permitted, OperationKind};
use super::types::{BuildInfo, BuildSummary, HealthReport, Job, JobInfo, JobList};

/// Jobs returned per listing. Anything beyond this must be re-requested by
/// the presentation layer; the gateway does not paginate.
pub const JOB_DISPLAY_LIMIT: usize = 10;

/// Role-checked command surface over the CI server.
///
/// Every operation takes the caller's session, performs at most one HTTP
/// exchange, and returns a normalized value. The gateway holds no mutable
/// state, so concurrent sessions in a multi-user host are independent.
pub struct JenkinsGateway {
    client: JenkinsClient,
    endpoints: EndpointRegistry,
}

impl JenkinsGateway {
    pub fn new(client: JenkinsClient, endpoints: EndpointRegistry) -> Self {
        Self { client, endpoints }
    }

    fn authorize(&self, session: &Session, job_name: &str, kind: OperationKind) -> Result<()> {
        if is_permitted(session, job_name, kind) {
            return Ok(());
        }

        warn!(
            "Denied {kind:?} on '{job_name}' for '{}' (role {})",
            session.username, session.role
        );
        Err(CibotError::Authorization("Access denied".to_string()))
    }

    /// Fetch the job list, drop jobs the session may not see, and cap the
    /// result at [`JOB_DISPLAY_LIMIT`] entries.
    pub async fn list_jobs(&self, session: &Session) -> Result<Vec<Job>> {
        info!(
            "Listing jobs for '{}' (role {})",
            session.username, session.role
        );

        let path = self.endpoints.resolve("jobs_endpoint", &[])?;
        let list: JobList = self.client.get_json(&path).await?;

        let mut jobs: Vec<Job> = list
            .jobs
            .into_iter()
            .filter(|job| is_permitted(session, &job.name, OperationKind::List))
            .collect();
        jobs.truncate(JOB_DISPLAY_LIMIT);

        Ok(jobs)
    }

    /// Queue a build with query-style parameters. The authorization check
    /// runs before any request is issued; a denied trigger never reaches
    /// the network.
    pub async fn trigger_job(
        &self,
        session: &Session,
        job_name: &str,
        parameters: &IndexMap<String, String>,
    ) -> Result<()> {
        self.authorize(session, job_name, OperationKind::Trigger)?;

        info!(
            "Triggering '{job_name}' for '{}' with {} parameter(s)",
            session.username,
            parameters.len()
        );

        let path = self
            .endpoints
            .resolve("build_endpoint", &[("job_name", job_name)])?;
        self.client.post_expect_created(&path, parameters).await
    }

    pub async fn last_build_summary(
        &self,
        session: &Session,
        job_name: &str,
    ) -> Result<BuildSummary> {
        self.authorize(session, job_name, OperationKind::Summary)?;

        let path = self
            .endpoints
            .resolve("last_build_summary", &[("job_name", job_name)])?;
        let build: BuildInfo = self.client.get_json(&path).await?;

        Ok(build.into())
    }

    pub async fn build_summary(
        &self,
        session: &Session,
        job_name: &str,
        build_number: u32,
    ) -> Result<BuildSummary> {
        self.authorize(session, job_name, OperationKind::Summary)?;

        let path = self.endpoints.resolve(
            "specific_build_summary",
            &[
                ("job_name", job_name),
                ("build_number", &build_number.to_string()),
            ],
        )?;
        let build: BuildInfo = self.client.get_json(&path).await?;

        Ok(build.into())
    }

    /// Return the health-check sequence exactly as the server sent it.
    /// Aggregation (healthy/unhealthy counts) is a presentation concern.
    pub async fn job_health(&self, session: &Session, job_name: &str) -> Result<HealthReport> {
        self.authorize(session, job_name, OperationKind::Health)?;

        let path = self
            .endpoints
            .resolve("job_health", &[("job_name", job_name)])?;
        let job: JobInfo = self.client.get_json(&path).await?;

        Ok(job.health_report)
    }
}
