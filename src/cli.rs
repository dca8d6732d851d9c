use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use crate::auth::{Authenticator, CredentialFile, Session};
use crate::config::{Config, Credentials};
use crate::endpoints::EndpointRegistry;
use crate::jenkins::{JenkinsClient, JenkinsGateway};
use crate::output;
use crate::tools::{self, ToolReply};

#[derive(Parser)]
#[command(name = "cibot")]
#[command(author, version, about = "Chat-driven CI job control", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a cibot config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session against the CI server
    Chat,

    /// Print the tool catalog published to the agent runtime
    Tools,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Chat => self.execute_chat().await,
            Commands::Tools => {
                output::print_catalog(tools::catalog());
                Ok(())
            }
        }
    }

    async fn execute_chat(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let credentials = Credentials::from_env()?;

        let endpoints = match &config.server.endpoints_file {
            Some(path) => EndpointRegistry::load(path)?,
            None => EndpointRegistry::builtin()?,
        };

        let client = JenkinsClient::new(
            credentials,
            config.server.timeout_secs.map(Duration::from_secs),
        )?;
        let gateway = JenkinsGateway::new(client, endpoints);

        let authenticator = CredentialFile::load(&config.auth.users_file)?;

        let Some(session) = login(&authenticator)? else {
            return Ok(());
        };

        info!(
            "Chat session opened for '{}' (role {})",
            session.username, session.role
        );
        output::print_welcome(&session);
        output::print_help();

        chat_loop(&gateway, &session).await
    }
}

/// One login attempt, matching the single-shot flow of the chat UI. A
/// failed attempt prints the reason and ends the program without a session.
fn login(authenticator: &impl Authenticator) -> Result<Option<Session>> {
    let Some(username) = prompt("👤 Username: ")? else {
        return Ok(None);
    };
    let Some(password) = prompt("🔑 Password: ")? else {
        return Ok(None);
    };

    match authenticator.authenticate(&username, &password) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            output::print_error(&err);
            Ok(None)
        }
    }
}

async fn chat_loop(gateway: &JenkinsGateway, session: &Session) -> Result<()> {
    loop {
        let Some(line) = prompt("💬 > ")? else {
            break;
        };

        match line.to_lowercase().as_str() {
            "" => continue,
            "exit" | "quit" => {
                println!("👋 Exiting. Goodbye!");
                break;
            }
            "help" => {
                output::print_help();
                continue;
            }
            _ => {}
        }

        let Some(command) = tools::parse(&line) else {
            output::print_warning("Unknown command.");
            output::print_help();
            continue;
        };

        // Gateway faults are rendered and the loop continues; only I/O on
        // the terminal itself ends the session.
        match tools::dispatch(gateway, session, command).await {
            Ok(ToolReply::Jobs(jobs)) => output::print_jobs(&jobs),
            Ok(ToolReply::Triggered { job }) => output::print_triggered(&job),
            Ok(ToolReply::Summary(summary)) => output::print_summary(&summary),
            Ok(ToolReply::Health { job, report }) => output::print_health(&job, &report),
            Err(err) => output::print_error(&err),
        }
    }

    Ok(())
}

/// Prompt on stderr and read one trimmed line; None on EOF.
fn prompt(label: &str) -> Result<Option<String>> {
    eprint!("{label}");
    std::io::stderr().flush()?;

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}
