//! Contracts of the post-processing services.
//!
//! Each service is stateless and independently replaceable. They are async
//! because a production implementation may call out to a network-backed
//! tool; the orchestrator awaits each one before starting the next.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::{CodeAnalysisReport, PerformanceAnalysisResult, SecurityScanResult};
use crate::settings::MigrationSettings;

/// Computes a descriptive report for a code sample.
#[async_trait]
pub trait MetricsAnalyzer: Send + Sync {
    async fn analyze(&self, code: &str, lang: &str) -> Result<CodeAnalysisReport>;
}

/// Re-indents generated code.
#[async_trait]
pub trait CodeFormatter: Send + Sync {
    async fn format(&self, code: &str, lang: &str, style_guide: &str) -> Result<String>;
}

/// Produces a documentation block to prepend to generated code.
#[async_trait]
pub trait CodeDocumentor: Send + Sync {
    async fn generate_docs(&self, code: &str, lang: &str) -> Result<String>;
}

/// Scans code for security findings.
///
/// Must return an empty list when `settings.enable_security_scan` is off.
#[async_trait]
pub trait SecurityScanner: Send + Sync {
    async fn scan(
        &self,
        code: &str,
        lang: &str,
        settings: &MigrationSettings,
    ) -> Result<Vec<SecurityScanResult>>;
}

/// Produces a human-readable delta between two texts.
#[async_trait]
pub trait DiffGenerator: Send + Sync {
    async fn generate_unified_diff(&self, original: &str, modified: &str) -> Result<String>;
}

/// Estimates the USD cost of a run.
///
/// The estimate is non-negative and non-decreasing in
/// `input.len() + output.len()`.
#[async_trait]
pub trait CostEstimator: Send + Sync {
    async fn estimate(&self, input: &str, output: &str, settings: &MigrationSettings)
    -> Result<f64>;
}

/// Suggests performance improvements.
///
/// Must return an empty list when `settings.enable_performance_opt` is off.
#[async_trait]
pub trait PerformanceOptimizer: Send + Sync {
    async fn analyze_and_suggest(
        &self,
        code: &str,
        lang: &str,
        settings: &MigrationSettings,
    ) -> Result<Vec<PerformanceAnalysisResult>>;
}

/// Describes the surrounding project to enrich the prompt.
#[async_trait]
pub trait ContextAnalyzer: Send + Sync {
    async fn analyze_project(&self, repo: &str, branch: &str, path: &str) -> Result<String>;
}

/// Outcome of the post-migration test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunOutcome {
    pub success: bool,
    pub results: String,
}

/// Runs automated tests against migrated code.
#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run_tests(&self, code: &str, lang: &str) -> Result<TestRunOutcome>;
}
