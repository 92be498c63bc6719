//! Pipeline tests for MigrationUseCase against a stub generation client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chimera_application::services::{PLACEHOLDER_PROJECT_CONTEXT, PostProcessingServices};
use chimera_application::{COMPLETION_MESSAGE, MigrationUseCase};
use chimera_core::services::{CodeFormatter, ContextAnalyzer};
use chimera_core::{
    ChimeraError, GenerationClient, GenerationRequest, MigrationEvent, MigrationSettings,
    MigrationStatus, NotificationLevel, Result,
};
use tokio::sync::{Notify, mpsc};
use tokio_util::sync::CancellationToken;

/// Replays canned responses and counts calls; the last response repeats.
struct StubClient {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    gate: Option<Arc<Notify>>,
}

impl StubClient {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            gate: None,
        }
    }

    fn returning(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Blocks every call until the gate is notified.
    fn gated(text: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::returning(text)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        }
    }
}

struct FailingFormatter;

#[async_trait]
impl CodeFormatter for FailingFormatter {
    async fn format(&self, _code: &str, _lang: &str, _style_guide: &str) -> Result<String> {
        Err(ChimeraError::post_processing("formatter", "unbalanced brackets"))
    }
}

struct FailingContext;

#[async_trait]
impl ContextAnalyzer for FailingContext {
    async fn analyze_project(&self, _repo: &str, _branch: &str, _path: &str) -> Result<String> {
        Err(ChimeraError::internal("repository unreachable"))
    }
}

fn all_off() -> MigrationSettings {
    MigrationSettings {
        enable_auto_format: false,
        enable_lint_fix: false,
        enable_security_scan: false,
        enable_performance_opt: false,
        enable_diff_view: false,
        enable_contextual_analysis: false,
        post_migration_testing: false,
        generate_documentation: false,
        ..MigrationSettings::default()
    }
}

fn use_case(client: &Arc<StubClient>) -> MigrationUseCase {
    MigrationUseCase::new(client.clone())
}

#[tokio::test]
async fn test_fenced_python_scenario() {
    let client = Arc::new(StubClient::returning("```python\nx = 1\n```"));
    let use_case = use_case(&client);

    let result = use_case
        .run_migration("var x = 1;", "JavaScript", "Python", &all_off())
        .await
        .unwrap();

    assert_eq!(result.output_code, "x = 1");
    assert_eq!(result.history_entry.status, MigrationStatus::Success);
    assert_eq!(client.calls(), 1);

    let history = use_case.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].output_code, "x = 1");
    assert_eq!(history.entries()[0].from_lang, "JavaScript");
    assert!(history.entries()[0].cost_estimate_usd.is_some());
    assert_eq!(
        result.notifications.last().map(|n| n.message.as_str()),
        Some(COMPLETION_MESSAGE)
    );
}

#[tokio::test]
async fn test_empty_input_fails_before_generation() {
    let client = Arc::new(StubClient::returning("unused"));
    let use_case = use_case(&client);

    for input in ["", "   \n\t"] {
        let err = use_case
            .run_migration(input, "JavaScript", "Python", &all_off())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    assert_eq!(client.calls(), 0);
    assert!(use_case.history().await.is_empty());
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let client = Arc::new(StubClient::returning("unused"));
    let use_case = use_case(&client);

    let err = use_case
        .run_migration("x", "Klingon", "Python", &all_off())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_writes_no_history() {
    let client = Arc::new(StubClient::new(vec![
        Ok("```\nfirst\n```".to_string()),
        Err(ChimeraError::generation("quota exceeded")),
    ]));
    let use_case = use_case(&client);

    use_case
        .run_migration("a", "Go", "Rust", &all_off())
        .await
        .unwrap();
    let err = use_case
        .run_migration("b", "Go", "Rust", &all_off())
        .await
        .unwrap_err();

    assert!(err.is_generation());
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(use_case.history().await.len(), 1);
}

#[tokio::test]
async fn test_missing_credential_aborts_cleanly() {
    let client = Arc::new(StubClient::new(vec![
        Err(ChimeraError::configuration("Gemini API key not configured")),
        Ok("```\nrecovered\n```".to_string()),
    ]));
    let use_case = use_case(&client);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let use_case = use_case.with_event_sender(tx);

    let err = use_case
        .run_migration("a", "Go", "Rust", &all_off())
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("API key not configured"));
    assert!(use_case.history().await.is_empty());
    assert!(!use_case.is_running());
    while let Ok(event) = rx.try_recv() {
        assert!(matches!(event, MigrationEvent::Progress { .. }), "{event:?}");
    }

    let result = use_case
        .run_migration("a", "Go", "Rust", &all_off())
        .await
        .unwrap();
    assert_eq!(result.output_code, "recovered");
    assert_eq!(use_case.history().await.len(), 1);
}

#[tokio::test]
async fn test_context_failure_aborts_before_generation() {
    let client = Arc::new(StubClient::returning("```\nunused\n```"));
    let services = PostProcessingServices {
        context: Arc::new(FailingContext),
        ..PostProcessingServices::default()
    };
    let use_case = MigrationUseCase::new(client.clone()).with_services(services);
    let settings = MigrationSettings {
        enable_contextual_analysis: true,
        ..all_off()
    };

    let err = use_case
        .run_migration("a", "Go", "Rust", &settings)
        .await
        .unwrap_err();

    assert!(matches!(err, ChimeraError::Internal(_)));
    assert!(err.to_string().contains("repository unreachable"));
    assert_eq!(client.calls(), 0);
    assert!(use_case.history().await.is_empty());
    assert!(!use_case.is_running());
}

#[tokio::test]
async fn test_unfenced_response_is_used_verbatim() {
    let raw = "  print('hi')\n# no fence here\n";
    let client = Arc::new(StubClient::returning(raw));
    let use_case = use_case(&client);

    let result = use_case
        .run_migration("console.log('hi')", "JavaScript", "Python", &all_off())
        .await
        .unwrap();

    assert_eq!(result.output_code, raw);
}

#[tokio::test]
async fn test_history_is_most_recent_first() {
    let client = Arc::new(StubClient::returning("```\nok\n```"));
    let use_case = use_case(&client);

    for input in ["first", "second", "third"] {
        use_case
            .run_migration(input, "Python", "Go", &all_off())
            .await
            .unwrap();
    }

    let history = use_case.history().await;
    let inputs: Vec<&str> = history
        .entries()
        .iter()
        .map(|e| e.input_code.as_str())
        .collect();
    assert_eq!(inputs, vec!["third", "second", "first"]);
    assert!(
        history
            .entries()
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp)
    );
}

#[tokio::test]
async fn test_format_and_documentation_are_applied_in_order() {
    let client = Arc::new(StubClient::returning(
        "Here you go:\n```typescript\nfunction f() {\nreturn 1;\n}\n```\nDone.",
    ));
    let use_case = use_case(&client);
    let settings = MigrationSettings {
        enable_auto_format: true,
        generate_documentation: true,
        code_style_guide: Some("Airbnb".to_string()),
        ..all_off()
    };

    let result = use_case
        .run_migration("def f(): return 1", "Python", "TypeScript", &settings)
        .await
        .unwrap();

    assert!(result.output_code.starts_with("/**\n"));
    assert!(
        result
            .output_code
            .ends_with(" */\n\nfunction f() {\n  return 1;\n}")
    );
    assert_eq!(result.history_entry.status, MigrationStatus::Success);
}

#[tokio::test]
async fn test_security_findings_are_advisory() {
    let client = Arc::new(StubClient::returning("```python\ny = eval(x)\n```"));
    let use_case = use_case(&client);
    let settings = MigrationSettings {
        enable_security_scan: true,
        ..all_off()
    };

    let result = use_case
        .run_migration("let y = eval(x);", "JavaScript", "Python", &settings)
        .await
        .unwrap();

    let report = result.output_report.unwrap();
    assert_eq!(report.potential_security_issues.len(), 1);
    assert_eq!(report.potential_security_issues[0].line, Some(1));
    assert!(result.notifications.iter().any(|n| {
        n.level == NotificationLevel::Warning && n.message == "Found 1 security issues."
    }));
    assert_eq!(result.history_entry.status, MigrationStatus::Success);
}

#[tokio::test]
async fn test_testing_diff_and_context_steps() {
    let client = Arc::new(StubClient::returning("```\nb\n```"));
    let use_case = use_case(&client);
    let settings = MigrationSettings {
        enable_diff_view: true,
        enable_contextual_analysis: true,
        post_migration_testing: true,
        ..all_off()
    };

    let result = use_case
        .run_migration("a", "Python", "Go", &settings)
        .await
        .unwrap();

    assert!(
        client
            .last_prompt()
            .unwrap()
            .contains(&format!("Project Context: {PLACEHOLDER_PROJECT_CONTEXT}"))
    );
    let diff = result.diff.unwrap();
    assert!(diff.contains("-a\n+b"));
    assert_eq!(result.history_entry.diff.as_deref(), Some(diff.as_str()));
    assert!(result.test_outcome.unwrap().success);
    assert!(
        result
            .notifications
            .iter()
            .any(|n| n.message == "Automated tests passed.")
    );
}

#[tokio::test]
async fn test_cost_limit_raises_warning_only() {
    let client = Arc::new(StubClient::returning("```\nsome output\n```"));
    let use_case = use_case(&client);
    let settings = MigrationSettings {
        cost_limit_usd: Some(0.0),
        ..all_off()
    };

    let result = use_case
        .run_migration("some input", "Python", "Go", &settings)
        .await
        .unwrap();

    assert_eq!(result.history_entry.status, MigrationStatus::Success);
    assert!(
        result
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Warning && n.message.contains("exceeds limit"))
    );
}

#[tokio::test]
async fn test_failing_service_marks_run_partial() {
    let client = Arc::new(StubClient::returning("```\nfn main() {}\n```"));
    let services = PostProcessingServices {
        formatter: Arc::new(FailingFormatter),
        ..PostProcessingServices::default()
    };
    let use_case = MigrationUseCase::new(client.clone()).with_services(services);
    let settings = MigrationSettings {
        enable_auto_format: true,
        ..all_off()
    };

    let result = use_case
        .run_migration("func main() {}", "Go", "Rust", &settings)
        .await
        .unwrap();

    assert_eq!(result.output_code, "fn main() {}");
    assert_eq!(result.history_entry.status, MigrationStatus::Partial);
    assert!(
        result
            .history_entry
            .error_message
            .as_deref()
            .unwrap()
            .contains("formatting")
    );
    assert!(
        result
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Warning && n.message.starts_with("formatting"))
    );
    assert_eq!(use_case.history().await.len(), 1);
}

#[tokio::test]
async fn test_second_run_while_busy_is_rejected() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(StubClient::gated("```\nok\n```", gate.clone()));
    let use_case = use_case(&client);
    let settings = all_off();

    let (first, second) = tokio::join!(
        use_case.run_migration("a", "Python", "Go", &settings),
        async {
            let result = use_case.run_migration("b", "Python", "Go", &settings).await;
            gate.notify_one();
            result
        }
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(ChimeraError::Busy)));
    assert_eq!(client.calls(), 1);
    assert!(!use_case.is_running());

    // Admission is open again; pre-release the gate for the next call.
    gate.notify_one();
    use_case
        .run_migration("c", "Python", "Go", &settings)
        .await
        .unwrap();
    assert_eq!(use_case.history().await.len(), 2);
}

#[tokio::test]
async fn test_cancellation_discards_the_run() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(StubClient::gated("```\nnever\n```", gate));
    let use_case = use_case(&client);
    let cancel = CancellationToken::new();
    let settings = all_off();

    let (result, _) = tokio::join!(
        use_case.run_migration_with_cancel("a", "Python", "Go", &settings, cancel.clone()),
        async { cancel.cancel() }
    );

    assert!(matches!(result, Err(ChimeraError::Cancelled)));
    assert_eq!(client.calls(), 1);
    assert!(use_case.history().await.is_empty());
    assert!(!use_case.is_running());
}

#[tokio::test]
async fn test_events_are_streamed_in_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Arc::new(StubClient::returning("```\nok\n```"));
    let use_case = MigrationUseCase::new(client.clone()).with_event_sender(tx);

    use_case
        .run_migration("a", "Python", "Go", &all_off())
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(matches!(
        events.first(),
        Some(MigrationEvent::Progress { message }) if message.starts_with("Generating code with")
    ));
    assert!(matches!(
        events.last(),
        Some(MigrationEvent::Notification(n)) if n.message == COMPLETION_MESSAGE
    ));
}
