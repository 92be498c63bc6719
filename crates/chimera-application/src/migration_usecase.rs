//! Migration use case implementation.
//!
//! `MigrationUseCase` runs one migration end-to-end: optional project context,
//! prompt assembly, the generation call, fence extraction and the enabled
//! post-processing services, finishing with a history entry.

use crate::prompt::build_migration_prompt;
use crate::services::PostProcessingServices;
use chimera_core::fence::extract_code;
use chimera_core::language::canonical_language;
use chimera_core::report::CodeAnalysisReport;
use chimera_core::services::TestRunOutcome;
use chimera_core::{
    ChimeraError, GenerationClient, GenerationRequest, MigrationEvent, MigrationHistory,
    MigrationHistoryEntry, MigrationSettings, MigrationStatus, Notification, Result,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Placeholder project descriptor handed to the context analyzer.
const CONTEXT_REPO: &str = "repo";
const CONTEXT_BRANCH: &str = "main";
const CONTEXT_PATH: &str = "src";

/// Final notification of every successful run.
pub const COMPLETION_MESSAGE: &str = "Migration complete!";

/// Everything a finished run hands back to the presentation layer.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    pub output_code: String,
    /// `None` only when the metrics step itself failed.
    pub output_report: Option<CodeAnalysisReport>,
    pub diff: Option<String>,
    pub test_outcome: Option<TestRunOutcome>,
    pub history_entry: MigrationHistoryEntry,
    /// Advisory and terminal notifications, in the order they were raised.
    pub notifications: Vec<Notification>,
}

/// Use case for running code migrations.
///
/// # Pipeline
///
/// Steps run strictly in order, each awaited before the next starts:
///
/// 1. Context analysis (fatal on error)
/// 2. Prompt assembly
/// 3. Generation (fatal on error, cancellable)
/// 4. Fence extraction
/// 5. Formatting and documentation
/// 6. Metrics, security scan and performance insights
/// 7. Post-migration tests and cost estimate
/// 8. Diff, then the history entry
///
/// The run duration is measured before the diff. Steps from 5 on are isolated: a failing service is logged, reported as a
/// warning notification and skipped, and the history entry is recorded as
/// [`MigrationStatus::Partial`]. Advisory findings never change the status.
///
/// # Concurrency
///
/// At most one run is in flight per use case. A second call while a run is
/// active fails with [`ChimeraError::Busy`] instead of queueing.
pub struct MigrationUseCase {
    client: Arc<dyn GenerationClient>,
    services: PostProcessingServices,
    history: RwLock<MigrationHistory>,
    running: AtomicBool,
    events: Option<UnboundedSender<MigrationEvent>>,
}

impl MigrationUseCase {
    /// Creates a use case with the default post-processing services.
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            services: PostProcessingServices::default(),
            history: RwLock::new(MigrationHistory::new()),
            running: AtomicBool::new(false),
            events: None,
        }
    }

    /// Replaces the post-processing services.
    pub fn with_services(mut self, services: PostProcessingServices) -> Self {
        self.services = services;
        self
    }

    /// Streams progress messages and notifications to `sender` while runs execute.
    pub fn with_event_sender(mut self, sender: UnboundedSender<MigrationEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Returns whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Snapshot of the session history, most recent first.
    pub async fn history(&self) -> MigrationHistory {
        self.history.read().await.clone()
    }

    /// Runs one migration that cannot be cancelled.
    pub async fn run_migration(
        &self,
        input_code: &str,
        from_lang: &str,
        to_lang: &str,
        settings: &MigrationSettings,
    ) -> Result<MigrationResult> {
        self.run_migration_with_cancel(
            input_code,
            from_lang,
            to_lang,
            settings,
            CancellationToken::new(),
        )
        .await
    }

    /// Runs one migration, abandoning the generation call when `cancel` fires.
    ///
    /// A cancelled run returns [`ChimeraError::Cancelled`] and writes no history.
    /// Dropping the in-flight request aborts it on the client side only.
    pub async fn run_migration_with_cancel(
        &self,
        input_code: &str,
        from_lang: &str,
        to_lang: &str,
        settings: &MigrationSettings,
        cancel: CancellationToken,
    ) -> Result<MigrationResult> {
        let _guard = RunGuard::acquire(&self.running).ok_or(ChimeraError::Busy)?;

        if input_code.trim().is_empty() {
            return Err(ChimeraError::validation("Input code is empty"));
        }
        let from = canonical_language(from_lang).ok_or_else(|| {
            ChimeraError::validation(format!("Unsupported source language: {from_lang}"))
        })?;
        let to = canonical_language(to_lang).ok_or_else(|| {
            ChimeraError::validation(format!("Unsupported target language: {to_lang}"))
        })?;
        settings.validate()?;

        let started = Instant::now();
        tracing::info!(
            from,
            to,
            model = %settings.ai_config.model_name,
            "Starting migration"
        );
        let mut run = RunLog::new(self.events.clone());

        let context = if settings.enable_contextual_analysis {
            run.progress("Analyzing project context...");
            self.services
                .context
                .analyze_project(CONTEXT_REPO, CONTEXT_BRANCH, CONTEXT_PATH)
                .await?
        } else {
            String::new()
        };

        let prompt = build_migration_prompt(input_code, from, to, &context, settings)?;

        run.progress(format!(
            "Generating code with {}...",
            settings.ai_config.model_name
        ));
        let request = GenerationRequest::from_config(prompt, &settings.ai_config);
        let generated = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Migration cancelled during generation");
                return Err(ChimeraError::Cancelled);
            }
            result = self.client.generate(request) => result?,
        };

        let mut code = extract_code(&generated);

        if settings.enable_auto_format {
            run.progress("Formatting code...");
            match self
                .services
                .formatter
                .format(&code, to, settings.style_guide())
                .await
            {
                Ok(formatted) => code = formatted,
                Err(e) => run.step_failed("formatting", e),
            }
        }

        if settings.generate_documentation {
            run.progress("Generating documentation...");
            match self.services.documentor.generate_docs(&code, to).await {
                Ok(docs) => code = format!("{docs}\n\n{code}"),
                Err(e) => run.step_failed("documentation", e),
            }
        }

        let output_code = code;

        run.progress("Analyzing output...");
        let mut report = match self.services.metrics.analyze(&output_code, to).await {
            Ok(report) => Some(report),
            Err(e) => {
                run.step_failed("metrics", e);
                None
            }
        };

        if settings.enable_security_scan {
            match self.services.security.scan(&output_code, to, settings).await {
                Ok(issues) => {
                    if !issues.is_empty() {
                        run.notify(Notification::warning(format!(
                            "Found {} security issues.",
                            issues.len()
                        )));
                    }
                    report = report.map(|r| r.with_security_issues(issues));
                }
                Err(e) => run.step_failed("security scan", e),
            }
        }

        if settings.enable_performance_opt {
            match self
                .services
                .performance
                .analyze_and_suggest(&output_code, to, settings)
                .await
            {
                Ok(insights) => report = report.map(|r| r.with_performance_insights(insights)),
                Err(e) => run.step_failed("performance analysis", e),
            }
        }

        if let (Some(threshold), Some(analyzed)) = (settings.complexity_threshold, &report)
            && analyzed.cyclomatic_complexity > threshold
        {
            run.notify(Notification::warning(format!(
                "Cyclomatic complexity {} exceeds threshold {}.",
                analyzed.cyclomatic_complexity, threshold
            )));
        }

        let test_outcome = if settings.post_migration_testing {
            run.progress("Running automated tests...");
            match self.services.testing.run_tests(&output_code, to).await {
                Ok(outcome) => {
                    run.notify(if outcome.success {
                        Notification::success("Automated tests passed.")
                    } else {
                        Notification::error(format!("Automated tests failed: {}", outcome.results))
                    });
                    Some(outcome)
                }
                Err(e) => {
                    run.step_failed("testing", e);
                    None
                }
            }
        } else {
            None
        };

        let cost = match self
            .services
            .cost
            .estimate(input_code, &output_code, settings)
            .await
        {
            Ok(cost) => {
                if let Some(limit) = settings.cost_limit_usd
                    && cost > limit
                {
                    run.notify(Notification::warning(format!(
                        "Estimated cost ${cost:.4} exceeds limit ${limit:.4}."
                    )));
                }
                Some(cost)
            }
            Err(e) => {
                run.step_failed("cost estimate", e);
                None
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        // Computed ahead of the history write so the entry can carry it.
        let diff = if settings.enable_diff_view {
            match self
                .services
                .diff
                .generate_unified_diff(input_code, &output_code)
                .await
            {
                Ok(diff) => Some(diff),
                Err(e) => {
                    run.step_failed("diff", e);
                    None
                }
            }
        } else {
            None
        };

        let status = if run.failed_steps.is_empty() {
            MigrationStatus::Success
        } else {
            MigrationStatus::Partial
        };
        let mut entry = MigrationHistoryEntry::new(
            input_code,
            output_code.as_str(),
            from,
            to,
            settings.clone(),
            status,
            duration_ms,
        );
        entry.cost_estimate_usd = cost;
        entry.diff = diff.clone();
        if !run.failed_steps.is_empty() {
            entry.error_message = Some(format!(
                "Post-processing failed: {}",
                run.failed_steps.join(", ")
            ));
        }

        self.history.write().await.prepend(entry.clone());

        run.notify(Notification::success(COMPLETION_MESSAGE));
        tracing::info!(
            id = %entry.id,
            status = %entry.status,
            duration_ms,
            "Migration finished"
        );

        Ok(MigrationResult {
            output_code,
            output_report: report,
            diff,
            test_outcome,
            history_entry: entry,
            notifications: run.notifications,
        })
    }
}

/// Clears the admission flag on every exit path.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Notifications and isolated failures collected during one run.
struct RunLog {
    events: Option<UnboundedSender<MigrationEvent>>,
    notifications: Vec<Notification>,
    failed_steps: Vec<&'static str>,
}

impl RunLog {
    fn new(events: Option<UnboundedSender<MigrationEvent>>) -> Self {
        Self {
            events,
            notifications: Vec::new(),
            failed_steps: Vec::new(),
        }
    }

    fn emit(&self, event: MigrationEvent) {
        if let Some(sender) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = sender.send(event);
        }
    }

    fn progress(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.emit(MigrationEvent::Progress { message });
    }

    fn notify(&mut self, notification: Notification) {
        self.emit(MigrationEvent::Notification(notification.clone()));
        self.notifications.push(notification);
    }

    fn step_failed(&mut self, step: &'static str, error: ChimeraError) {
        tracing::warn!(step, "Post-processing step failed, keeping previous value: {}", error);
        self.failed_steps.push(step);
        self.notify(Notification::warning(format!("{step} skipped: {error}")));
    }
}
