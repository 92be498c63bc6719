//! Metrics reporter.
//!
//! Line, comment and blank counts come from literal text scanning. The
//! complexity, maintainability and readability scores are MOCK values drawn
//! at random from fixed ranges; they do not reflect the code.

use async_trait::async_trait;
use chimera_core::report::CodeAnalysisReport;
use chimera_core::services::MetricsAnalyzer;
use chimera_core::Result;
use rand::Rng;
use std::ops::RangeInclusive;

/// Range of the placeholder cyclomatic complexity.
pub const COMPLEXITY_RANGE: RangeInclusive<u32> = 1..=10;
/// Range of the placeholder maintainability index.
pub const MAINTAINABILITY_RANGE: RangeInclusive<u32> = 60..=99;
/// Range of the placeholder readability score.
pub const READABILITY_RANGE: RangeInclusive<u32> = 70..=99;

const COMMENT_MARKERS: &[&str] = &["//", "#"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsReporter;

impl MetricsReporter {
    pub fn new() -> Self {
        Self
    }

    /// Builds a report for `code`, labelled with `lang`.
    pub fn report(&self, code: &str, lang: &str) -> CodeAnalysisReport {
        let counts = LineCounts::scan(code);
        let mut rng = rand::thread_rng();

        CodeAnalysisReport {
            language_detected: lang.to_string(),
            lines_of_code: counts.total,
            comment_lines: counts.comments,
            blank_lines: counts.blank,
            cyclomatic_complexity: rng.gen_range(COMPLEXITY_RANGE),
            maintainability_index: rng.gen_range(MAINTAINABILITY_RANGE),
            readability_score: rng.gen_range(READABILITY_RANGE),
            dependencies: Vec::new(),
            potential_security_issues: Vec::new(),
            performance_insights: Vec::new(),
            code_smells: Vec::new(),
            architectural_suggestions: Vec::new(),
        }
    }
}

#[async_trait]
impl MetricsAnalyzer for MetricsReporter {
    async fn analyze(&self, code: &str, lang: &str) -> Result<CodeAnalysisReport> {
        Ok(self.report(code, lang))
    }
}

/// Deterministic line statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub total: usize,
    pub comments: usize,
    pub blank: usize,
}

impl LineCounts {
    pub fn scan(code: &str) -> Self {
        let mut counts = Self {
            total: 0,
            comments: 0,
            blank: 0,
        };
        for line in code.split('\n') {
            counts.total += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                counts.blank += 1;
            } else if COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
                counts.comments += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counts() {
        let code = "// header\nfn main() {\n\n    # not rust but counted\n}\n";
        let counts = LineCounts::scan(code);

        // Trailing newline yields a final empty line.
        assert_eq!(counts.total, 6);
        assert_eq!(counts.comments, 2);
        assert_eq!(counts.blank, 2);
    }

    #[test]
    fn test_empty_code_is_one_blank_line() {
        assert_eq!(
            LineCounts::scan(""),
            LineCounts {
                total: 1,
                comments: 0,
                blank: 1
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_scores_stay_in_range() {
        let reporter = MetricsReporter::new();
        for _ in 0..50 {
            let report = reporter.analyze("x = 1", "Python").await.unwrap();
            assert_eq!(report.language_detected, "Python");
            assert!(COMPLEXITY_RANGE.contains(&report.cyclomatic_complexity));
            assert!(MAINTAINABILITY_RANGE.contains(&report.maintainability_index));
            assert!(READABILITY_RANGE.contains(&report.readability_score));
            assert!(report.potential_security_issues.is_empty());
        }
    }
}
