//! Heuristic performance suggestions.
//!
//! Loop nesting is estimated from indentation: a loop header nested under
//! a still-open loop header increases the depth.

use async_trait::async_trait;
use chimera_core::report::{MetricValue, PerformanceAnalysisResult, PerformanceStatus};
use chimera_core::services::PerformanceOptimizer;
use chimera_core::settings::MigrationSettings;
use chimera_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// Line count above which a file is flagged as too large.
pub const MAX_LINES: usize = 300;

static LOOP_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(for|while|loop|foreach|do)\b|\.(forEach|map|filter|reduce)\s*\(")
        .expect("loop pattern is valid")
});

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Deepest loop nesting found in `code`.
pub fn max_loop_depth(code: &str) -> usize {
    let mut open: Vec<usize> = Vec::new();
    let mut deepest = 0;

    for line in code.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_of(line);
        while open.last().is_some_and(|&loop_indent| loop_indent >= indent) {
            open.pop();
        }
        if LOOP_HEADER.is_match(line) {
            open.push(indent);
            deepest = deepest.max(open.len());
        }
    }
    deepest
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPerformanceOptimizer;

impl HeuristicPerformanceOptimizer {
    pub fn new() -> Self {
        Self
    }

    pub fn suggestions(&self, code: &str) -> Vec<PerformanceAnalysisResult> {
        let depth = max_loop_depth(code);
        let (complexity, status, recommendation) = match depth {
            0 => ("O(1)", PerformanceStatus::Optimal, "No changes needed."),
            1 => ("O(n)", PerformanceStatus::Optimal, "No changes needed."),
            2 => (
                "O(n^2)",
                PerformanceStatus::Warning,
                "Nested loops detected; consider a lookup table or a single pass.",
            ),
            _ => (
                "O(n^3)",
                PerformanceStatus::Critical,
                "Deeply nested loops detected; restructure the algorithm or precompute results.",
            ),
        };

        let mut results = vec![PerformanceAnalysisResult {
            metric: "Loop Efficiency".to_string(),
            value: MetricValue::Text(complexity.to_string()),
            unit: None,
            threshold: None,
            status,
            recommendation: recommendation.to_string(),
        }];

        let line_count = code.lines().count();
        if line_count > MAX_LINES {
            results.push(PerformanceAnalysisResult {
                metric: "Module Size".to_string(),
                value: MetricValue::Number(line_count as f64),
                unit: Some("lines".to_string()),
                threshold: Some(MAX_LINES as f64),
                status: PerformanceStatus::Warning,
                recommendation: "Split the module into smaller units.".to_string(),
            });
        }
        results
    }
}

#[async_trait]
impl PerformanceOptimizer for HeuristicPerformanceOptimizer {
    async fn analyze_and_suggest(
        &self,
        code: &str,
        _lang: &str,
        settings: &MigrationSettings,
    ) -> Result<Vec<PerformanceAnalysisResult>> {
        if !settings.enable_performance_opt {
            return Ok(Vec::new());
        }
        Ok(self.suggestions(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_depth_by_indentation() {
        assert_eq!(max_loop_depth("x = 1"), 0);
        assert_eq!(max_loop_depth("for i in a:\n    print(i)\nfor j in b:\n    print(j)"), 1);

        let nested = "for i in a:\n    for j in b:\n        total += i * j\n";
        assert_eq!(max_loop_depth(nested), 2);

        let braces = "for (let i = 0; i < n; i++) {\n  while (x) {\n    items.forEach(f);\n  }\n}";
        assert_eq!(max_loop_depth(braces), 3);
    }

    #[test]
    fn test_nested_loops_raise_warning() {
        let results = HeuristicPerformanceOptimizer::new()
            .suggestions("for i in a:\n    for j in b:\n        pass");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, MetricValue::Text("O(n^2)".to_string()));
        assert_eq!(results[0].status, PerformanceStatus::Warning);
    }

    #[tokio::test]
    async fn test_disabled_returns_empty_list() {
        let settings = MigrationSettings {
            enable_performance_opt: false,
            ..MigrationSettings::default()
        };
        let results = HeuristicPerformanceOptimizer::new()
            .analyze_and_suggest("for x in y:\n    for z in x:\n        pass", "Python", &settings)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_large_module_is_flagged() {
        let settings = MigrationSettings {
            enable_performance_opt: true,
            ..MigrationSettings::default()
        };
        let code = "x = 1\n".repeat(MAX_LINES + 1);
        let results = HeuristicPerformanceOptimizer::new()
            .analyze_and_suggest(&code, "Python", &settings)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].metric, "Module Size");
    }
}
