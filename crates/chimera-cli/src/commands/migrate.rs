use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chimera_application::MigrationUseCase;
use chimera_core::settings::FeatureToggle;
use chimera_core::{
    AIProvider, ChimeraError, GenerationClient, MigrationEvent, MigrationSettings, SettingsChange,
};
use chimera_infrastructure::SecretServiceImpl;
use chimera_interaction::GeminiGenerationClient;
use colored::Colorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::utils::{
    apply_overrides, load_code, load_settings, print_diff, print_notification, print_report,
};

pub struct MigrateArgs {
    pub from: String,
    pub to: String,
    pub input: Option<PathBuf>,
    pub example: bool,
    pub overrides: Vec<String>,
    pub diff: bool,
    pub report: bool,
}

/// Builds the generation client for the configured provider.
fn build_client(settings: &MigrationSettings) -> Result<Arc<dyn GenerationClient>> {
    match settings.ai_config.provider {
        AIProvider::Gemini => {
            let secrets = SecretServiceImpl::new().context("Failed to locate secret file")?;
            Ok(Arc::new(GeminiGenerationClient::from_secret_service(
                Arc::new(secrets),
            )))
        }
        other => Err(ChimeraError::configuration(format!(
            "Provider '{other}' is not supported yet; set provider=gemini"
        ))
        .into()),
    }
}

pub async fn run(args: MigrateArgs) -> Result<()> {
    let code = load_code(args.input.as_deref(), args.example.then_some(args.from.as_str()))?;
    let mut settings = apply_overrides(load_settings()?, &args.overrides)?;
    if args.diff {
        settings = settings.apply(SettingsChange::Toggle(FeatureToggle::DiffView, true))?;
    }

    let client = build_client(&settings)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let use_case = MigrationUseCase::new(client).with_event_sender(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                MigrationEvent::Progress { message } => {
                    eprintln!("{} {}", "::".dimmed(), message.dimmed())
                }
                MigrationEvent::Notification(notification) => print_notification(&notification),
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, cancelling migration");
                cancel.cancel();
            }
        })
    };

    let result = use_case
        .run_migration_with_cancel(&code, &args.from, &args.to, &settings, cancel)
        .await;
    ctrl_c.abort();

    // Closing the channel lets the printer drain and finish before the output.
    drop(use_case);
    printer.await.context("Progress printer panicked")?;

    match result {
        Ok(result) => {
            println!("{}", result.output_code);
            if args.report
                && let Some(report) = &result.output_report
            {
                println!();
                print_report(report);
            }
            if args.diff
                && let Some(diff) = &result.diff
            {
                println!();
                print_diff(diff);
            }
            Ok(())
        }
        Err(e) => {
            // The notification is the terminal message; skip anyhow's report.
            print_notification(&e.notification());
            let code = if matches!(e, ChimeraError::Cancelled) { 130 } else { 1 };
            std::process::exit(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_gemini_provider_is_rejected() {
        let settings = MigrationSettings::default()
            .apply(SettingsChange::Provider(AIProvider::ChatGpt))
            .unwrap();

        let err = build_client(&settings).err().unwrap();
        let err = err.downcast_ref::<ChimeraError>().unwrap();
        assert!(err.is_configuration());
    }
}
