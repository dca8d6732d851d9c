use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};
use console::style;

use crate::auth::Session;
use crate::jenkins::{
    BuildStatus, BuildSummary, HealthCheck, HealthReport, Job, JOB_DISPLAY_LIMIT,
};

/// Scored health entries at or above this are counted as healthy.
const HEALTHY_SCORE_FLOOR: i64 = 80;

// Styling helpers

fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

fn bright_red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().red()
}

fn cyan(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}

fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

fn bright(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright()
}

fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

// Banner

pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🤖 cibot"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Chat-driven CI job control")
    );
}

pub fn print_welcome(session: &Session) {
    println!(
        "{}",
        bright_green(format!(
            "✅ Welcome, {}! You are logged in as '{}'.",
            session.username, session.role
        ))
    );
}

pub fn print_help() {
    println!("{} {}", bright("💬"), bright("Commands").underlined());
    println!("  {}                         {}", cyan("jobs"), dim("list available jobs"));
    println!(
        "  {}   {}",
        cyan("trigger <job> [k=v ...]"),
        dim("queue a build, optionally with parameters")
    );
    println!("  {}                   {}", cyan("last <job>"), dim("last build summary"));
    println!(
        "  {}            {}",
        cyan("summary <job> [<n>]"),
        dim("summary of build n (or the last build)")
    );
    println!("  {}                 {}", cyan("health <job>"), dim("job health report"));
    println!("  {}                         {}", cyan("exit"), dim("leave the chat"));
}

// Result rendering

pub fn print_jobs(jobs: &[Job]) {
    println!("{}", render_jobs(jobs));
}

fn render_jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return format!("{}", bright_yellow("No jobs visible for your account."));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(TableColor::Cyan),
            Cell::new("Job Name").fg(TableColor::Cyan),
        ]);

    for (idx, job) in jobs.iter().enumerate() {
        table.add_row(vec![Cell::new(idx + 1), Cell::new(&job.name)]);
    }

    let mut output = format!("{table}");
    if jobs.len() == JOB_DISPLAY_LIMIT {
        output.push_str(&format!(
            "\n{}",
            dim(format!(
                "(showing the first {JOB_DISPLAY_LIMIT} jobs)"
            ))
        ));
    }
    output
}

pub fn print_summary(summary: &BuildSummary) {
    let status = match summary.status {
        BuildStatus::Success => bright_green(summary.status),
        BuildStatus::Failure => bright_red(summary.status),
        BuildStatus::Running => bright_yellow(summary.status),
        BuildStatus::Unknown => dim(summary.status),
    };

    println!(
        "Build {} Status: {} - {}",
        cyan(format!("#{}", summary.number)),
        status,
        summary.url
    );

    if let Some(started_at) = summary.started_at {
        let mut line = format!("started {}", started_at.format("%Y-%m-%d %H:%M UTC"));
        if let Some(duration_ms) = summary.duration_ms {
            line.push_str(&format!(", took {}", format_duration(duration_ms)));
        }
        println!("  {}", dim(line));
    }
}

pub fn print_triggered(job: &str) {
    println!(
        "{}",
        bright_green(format!("✅ Job '{job}' triggered successfully!"))
    );
}

pub fn print_health(job: &str, report: &HealthReport) {
    println!("{}", render_health(job, report));
}

fn render_health(job: &str, report: &HealthReport) -> String {
    if report.is_empty() {
        return format!("{}", bright_yellow("⚠️ No health report available."));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(TableColor::Cyan),
            Cell::new("Check").fg(TableColor::Cyan),
            Cell::new("State").fg(TableColor::Cyan),
        ]);

    for (idx, check) in report.iter().enumerate() {
        let state_cell = if is_healthy(check) {
            Cell::new("Healthy").fg(TableColor::Green)
        } else {
            Cell::new("Unhealthy").fg(TableColor::Red)
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(check.label()),
            state_cell,
        ]);
    }

    let healthy = report.iter().filter(|check| is_healthy(check)).count();
    let unhealthy = report.len() - healthy;

    format!(
        "{table}\nJob '{job}' has {} healthy and {} unhealthy checks.",
        bright_green(healthy),
        bright_red(unhealthy)
    )
}

fn is_healthy(check: &HealthCheck) -> bool {
    match check {
        HealthCheck::Status(status) => status == "Good",
        HealthCheck::Scored { score, .. } => *score >= HEALTHY_SCORE_FLOOR,
    }
}

pub fn print_catalog(specs: &[crate::tools::ToolSpec]) {
    println!("{} {}", bright("🧰"), bright("Tool catalog").underlined());
    for spec in specs {
        println!("  {}", cyan(spec.name));
        println!("    {}", dim(spec.description));
    }
}

pub fn print_error(err: &impl std::fmt::Display) {
    println!("{}", bright_red(format!("❌ {err}")));
}

pub fn print_warning(message: &str) {
    println!("{}", bright_yellow(format!("⚠️ {message}")));
}

fn format_duration(duration_ms: i64) -> String {
    let total_secs = duration_ms / 1000;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
