use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chimera_core::language::{languages_with_samples, sample_snippet};
use chimera_core::report::CodeAnalysisReport;
use chimera_core::{MigrationSettings, Notification, NotificationLevel, SettingsChange};
use chimera_infrastructure::SettingsStorage;
use colored::Colorize;

/// Reads code from `path`, or from stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read code from stdin")?;
            Ok(buffer)
        }
    }
}

/// Returns the bundled sample for `example_for` when given, otherwise reads the input.
pub fn load_code(input: Option<&Path>, example_for: Option<&str>) -> Result<String> {
    let Some(lang) = example_for else {
        return read_input(input);
    };
    sample_snippet(lang).map(str::to_string).with_context(|| {
        let available: Vec<&str> = languages_with_samples().collect();
        format!(
            "No sample snippet for '{lang}'. Samples exist for: {}",
            available.join(", ")
        )
    })
}

/// Loads `settings.toml`, falling back to the built-in defaults.
pub fn load_settings() -> Result<MigrationSettings> {
    let storage = SettingsStorage::new().context("Failed to locate settings file")?;
    storage
        .load_or_default()
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

/// Applies `key=value` overrides in order.
pub fn apply_overrides(
    settings: MigrationSettings,
    overrides: &[String],
) -> Result<MigrationSettings> {
    overrides.iter().try_fold(settings, |settings, raw| -> Result<MigrationSettings> {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("Invalid override '{raw}', expected KEY=VALUE"))?;
        let change = SettingsChange::parse(key.trim(), value.trim())?;
        Ok(settings.apply(change)?)
    })
}

pub fn print_notification(notification: &Notification) {
    let label = match notification.level {
        NotificationLevel::Success => "success".green().bold(),
        NotificationLevel::Info => "info".blue().bold(),
        NotificationLevel::Warning => "warning".yellow().bold(),
        NotificationLevel::Error => "error".red().bold(),
    };
    eprintln!("{label}: {}", notification.message);
}

pub fn print_report(report: &CodeAnalysisReport) {
    println!("{}", "Analysis report".bold());
    println!("  Language:              {}", report.language_detected);
    println!(
        "  Lines:                 {} ({} comment, {} blank)",
        report.lines_of_code, report.comment_lines, report.blank_lines
    );
    println!(
        "  Cyclomatic complexity: {} {}",
        report.cyclomatic_complexity,
        "(placeholder)".dimmed()
    );
    println!(
        "  Maintainability index: {} {}",
        report.maintainability_index,
        "(placeholder)".dimmed()
    );
    println!(
        "  Readability score:     {} {}",
        report.readability_score,
        "(placeholder)".dimmed()
    );

    if !report.potential_security_issues.is_empty() {
        println!("{}", "Security findings".bold());
        for issue in &report.potential_security_issues {
            let line = issue
                .line
                .map(|line| format!("line {line}, "))
                .unwrap_or_default();
            println!(
                "  [{}] {} ({}{}): {} {}",
                issue.severity.to_string().red(),
                issue.vulnerability,
                line,
                issue.tool,
                issue.description,
                issue.recommendation.dimmed()
            );
        }
    }

    if !report.performance_insights.is_empty() {
        println!("{}", "Performance".bold());
        for insight in &report.performance_insights {
            println!(
                "  {}: {} [{}] {}",
                insight.metric,
                insight.value,
                insight.status,
                insight.recommendation.dimmed()
            );
        }
    }
}

pub fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}
