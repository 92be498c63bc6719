//! Code analysis report model.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::settings::ExternalService;

/// Severity of a security finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// One finding produced by the security scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScanResult {
    pub tool: ExternalService,
    pub severity: Severity,
    pub vulnerability: String,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerformanceStatus {
    Optimal,
    Warning,
    Critical,
}

/// Value of a performance metric: either a number or a label such as `O(n)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Number(value) => write!(f, "{value}"),
            MetricValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// One observation produced by the performance optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysisResult {
    pub metric: String,
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub status: PerformanceStatus,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSmell {
    pub description: String,
    pub line: usize,
    pub severity: Severity,
}

/// Immutable description of one code sample.
///
/// `cyclomatic_complexity`, `maintainability_index` and `readability_score`
/// are placeholder values, not the output of a real analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysisReport {
    pub language_detected: String,
    pub lines_of_code: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub cyclomatic_complexity: u32,
    pub maintainability_index: u32,
    pub readability_score: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub potential_security_issues: Vec<SecurityScanResult>,
    #[serde(default)]
    pub performance_insights: Vec<PerformanceAnalysisResult>,
    #[serde(default)]
    pub code_smells: Vec<CodeSmell>,
    #[serde(default)]
    pub architectural_suggestions: Vec<String>,
}

impl CodeAnalysisReport {
    /// Replaces the security findings, discarding any previous list.
    pub fn with_security_issues(mut self, issues: Vec<SecurityScanResult>) -> Self {
        self.potential_security_issues = issues;
        self
    }

    /// Replaces the performance insights, discarding any previous list.
    pub fn with_performance_insights(mut self, insights: Vec<PerformanceAnalysisResult>) -> Self {
        self.performance_insights = insights;
        self
    }
}
