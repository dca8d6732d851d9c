use indexmap::IndexMap;

use crate::auth::Session;
use crate::error::Result;
use crate::jenkins::{BuildSummary, HealthReport, JenkinsGateway, Job};

/// Closed set of commands the adapter may hand to the gateway. An external
/// agent runtime (or the terminal prompt parser below) produces these; the
/// gateway never sees free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCommand {
    ListJobs,
    TriggerJob {
        job: String,
        parameters: IndexMap<String, String>,
    },
    LastBuildSummary {
        job: String,
    },
    SpecificBuildSummary {
        job: String,
        number: u32,
    },
    JobHealth {
        job: String,
    },
}

/// One callable published to the external agent runtime.
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Stable tool names and natural-language descriptions. The names are part
/// of the integration contract with the agent runtime; renaming one is a
/// breaking change for every deployed agent configuration.
pub fn catalog() -> &'static [ToolSpec] {
    &[
        ToolSpec {
            name: "list_jobs",
            description: "Lists available Jenkins jobs for the current user.",
        },
        ToolSpec {
            name: "trigger_job",
            description: "Triggers a Jenkins job, optionally with key=value parameters.",
        },
        ToolSpec {
            name: "last_build_summary",
            description: "Fetches the last build summary of a Jenkins job.",
        },
        ToolSpec {
            name: "specific_build_summary",
            description: "Fetches the summary of a specific Jenkins build. \
                          Example: 'build summary of my-job with build number 42'.",
        },
        ToolSpec {
            name: "job_health",
            description: "Checks the health status of a Jenkins job.",
        },
    ]
}

/// Typed union of operation payloads, returned by [`dispatch`].
#[derive(Debug)]
pub enum ToolReply {
    Jobs(Vec<Job>),
    Triggered { job: String },
    Summary(BuildSummary),
    Health { job: String, report: HealthReport },
}

/// Extract a command from one line of terminal input.
///
/// Grammar (case-insensitive keywords, job names verbatim):
///   jobs | list [all] jobs
///   trigger <job> [key=value ...]
///   last <job>
///   summary <job> [<number>]
///   health <job>
///   build summary of <job> with build number <number>
///
/// Returns None for anything unrecognized; the caller prints the help.
pub fn parse(input: &str) -> Option<ToolCommand> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(command) = parse_long_form(trimmed) {
        return Some(command);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let keyword = tokens[0].to_lowercase();

    match keyword.as_str() {
        "jobs" | "list" => Some(ToolCommand::ListJobs),
        "trigger" => {
            let job = (*tokens.get(1)?).to_string();
            let mut parameters = IndexMap::new();
            for token in &tokens[2..] {
                let (key, value) = token.split_once('=')?;
                parameters.insert(key.to_string(), value.to_string());
            }
            Some(ToolCommand::TriggerJob { job, parameters })
        }
        "last" => Some(ToolCommand::LastBuildSummary {
            job: (*tokens.get(1)?).to_string(),
        }),
        "summary" => {
            let job = (*tokens.get(1)?).to_string();
            match tokens.get(2) {
                Some(raw) => {
                    let number = raw.parse().ok()?;
                    Some(ToolCommand::SpecificBuildSummary { job, number })
                }
                None => Some(ToolCommand::LastBuildSummary { job }),
            }
        }
        "health" => Some(ToolCommand::JobHealth {
            job: (*tokens.get(1)?).to_string(),
        }),
        _ => None,
    }
}

/// `build summary of <job> with build number <n>`, the phrase the chat UI
/// historically taught its users.
fn parse_long_form(input: &str) -> Option<ToolCommand> {
    const PREFIX: &str = "build summary of ";
    const MARKER: &str = " with build number ";

    // ASCII lowercasing keeps byte offsets aligned with the original input.
    let lower = input.to_ascii_lowercase();
    if !lower.starts_with(PREFIX) {
        return None;
    }

    let marker = lower[PREFIX.len()..].find(MARKER)?;
    let job = input[PREFIX.len()..PREFIX.len() + marker].trim().to_string();
    let number_text = &input[PREFIX.len() + marker + MARKER.len()..];
    let number = number_text.trim().parse().ok()?;

    if job.is_empty() {
        return None;
    }

    Some(ToolCommand::SpecificBuildSummary { job, number })
}

/// Execute one command against the gateway on behalf of a session.
pub async fn dispatch(
    gateway: &JenkinsGateway,
    session: &Session,
    command: ToolCommand,
) -> Result<ToolReply> {
    match command {
        ToolCommand::ListJobs => Ok(ToolReply::Jobs(gateway.list_jobs(session).await?)),
        ToolCommand::TriggerJob { job, parameters } => {
            gateway.trigger_job(session, &job, &parameters).await?;
            Ok(ToolReply::Triggered { job })
        }
        ToolCommand::LastBuildSummary { job } => Ok(ToolReply::Summary(
            gateway.last_build_summary(session, &job).await?,
        )),
        ToolCommand::SpecificBuildSummary { job, number } => Ok(ToolReply::Summary(
            gateway.build_summary(session, &job, number).await?,
        )),
        ToolCommand::JobHealth { job } => {
            let report = gateway.job_health(session, &job).await?;
            Ok(ToolReply::Health { job, report })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_stable() {
        let names: Vec<&str> = catalog().iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec![
                "list_jobs",
                "trigger_job",
                "last_build_summary",
                "specific_build_summary",
                "job_health"
            ]
        );
    }

    #[test]
    fn test_parse_list_variants() {
        assert_eq!(parse("jobs"), Some(ToolCommand::ListJobs));
        assert_eq!(parse("list all jobs"), Some(ToolCommand::ListJobs));
        assert_eq!(parse("  LIST  "), Some(ToolCommand::ListJobs));
    }

    #[test]
    fn test_parse_trigger_with_parameters() {
        let command = parse("trigger deploy env=prod region=eu-west-1").unwrap();
        match command {
            ToolCommand::TriggerJob { job, parameters } => {
                assert_eq!(job, "deploy");
                assert_eq!(parameters.get("env").map(String::as_str), Some("prod"));
                assert_eq!(
                    parameters.get("region").map(String::as_str),
                    Some("eu-west-1")
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_trigger_without_parameters() {
        let command = parse("trigger nightly").unwrap();
        assert_eq!(
            command,
            ToolCommand::TriggerJob {
                job: "nightly".to_string(),
                parameters: IndexMap::new(),
            }
        );
    }

    #[test]
    fn test_parse_trigger_rejects_malformed_parameter() {
        assert_eq!(parse("trigger deploy prod"), None);
        assert_eq!(parse("trigger"), None);
    }

    #[test]
    fn test_parse_summary_forms() {
        assert_eq!(
            parse("last deploy"),
            Some(ToolCommand::LastBuildSummary {
                job: "deploy".to_string()
            })
        );
        assert_eq!(
            parse("summary deploy"),
            Some(ToolCommand::LastBuildSummary {
                job: "deploy".to_string()
            })
        );
        assert_eq!(
            parse("summary deploy 42"),
            Some(ToolCommand::SpecificBuildSummary {
                job: "deploy".to_string(),
                number: 42
            })
        );
    }

    #[test]
    fn test_parse_long_form_summary() {
        assert_eq!(
            parse("build summary of my-job with build number 42"),
            Some(ToolCommand::SpecificBuildSummary {
                job: "my-job".to_string(),
                number: 42
            })
        );
        assert_eq!(
            parse("Build Summary of Deploy with build number 7"),
            Some(ToolCommand::SpecificBuildSummary {
                job: "Deploy".to_string(),
                number: 7
            })
        );
    }

    #[test]
    fn test_parse_health() {
        assert_eq!(
            parse("health deploy"),
            Some(ToolCommand::JobHealth {
                job: "deploy".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("make me a sandwich"), None);
        assert_eq!(parse("summary deploy notanumber"), None);
    }
}
