use std::path::Path;

use anyhow::{Context, Result};
use chimera_application::PostProcessingServices;
use chimera_core::language::canonical_language;

use super::utils::{load_code, load_settings, print_report};

/// Reports on a code sample with the same services a migration uses for its output.
pub async fn run(lang: &str, input: Option<&Path>, example: bool, json: bool) -> Result<()> {
    let lang = canonical_language(lang)
        .with_context(|| format!("Unsupported language '{lang}'. Run `chimera languages`."))?;
    let code = load_code(input, example.then_some(lang))?;
    let settings = load_settings()?;
    let services = PostProcessingServices::default();

    let report = services.metrics.analyze(&code, lang).await?;
    let issues = services.security.scan(&code, lang, &settings).await?;
    let insights = services
        .performance
        .analyze_and_suggest(&code, lang, &settings)
        .await?;
    let report = report
        .with_security_issues(issues)
        .with_performance_insights(insights);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
