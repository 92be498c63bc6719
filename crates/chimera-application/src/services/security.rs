//! Pattern-based security scanner.
//!
//! A fixed rule table matched line by line. Findings carry the 1-based line
//! number of the match; each rule reports at most once per line.

use async_trait::async_trait;
use chimera_core::report::{SecurityScanResult, Severity};
use chimera_core::services::SecurityScanner;
use chimera_core::settings::{ExternalService, MigrationSettings};
use chimera_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
    tool: ExternalService,
    severity: Severity,
    vulnerability: &'static str,
    description: &'static str,
    recommendation: &'static str,
    pattern: Regex,
}

impl Rule {
    fn finding(&self, line: usize) -> SecurityScanResult {
        SecurityScanResult {
            tool: self.tool,
            severity: self.severity,
            vulnerability: self.vulnerability.to_string(),
            description: self.description.to_string(),
            recommendation: self.recommendation.to_string(),
            line: Some(line),
            cve: None,
        }
    }
}

fn rule(
    tool: ExternalService,
    severity: Severity,
    vulnerability: &'static str,
    description: &'static str,
    recommendation: &'static str,
    pattern: &str,
) -> Rule {
    Rule {
        tool,
        severity,
        vulnerability,
        description,
        recommendation,
        pattern: Regex::new(pattern).expect("security rule pattern is valid"),
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            ExternalService::Snyk,
            Severity::Critical,
            "Unsafe Eval",
            "Avoid usage of eval().",
            "Refactor to safe parsing.",
            r"\beval\s*\(",
        ),
        rule(
            ExternalService::Snyk,
            Severity::High,
            "Dynamic Code Execution",
            "exec() runs arbitrary code built at runtime.",
            "Replace dynamic execution with explicit dispatch.",
            r"\bexec\s*\(",
        ),
        rule(
            ExternalService::SonarQube,
            Severity::High,
            "DOM-based XSS",
            "Assigning to innerHTML can inject untrusted markup.",
            "Use textContent or a sanitizer before inserting HTML.",
            r"\.innerHTML\s*=|dangerouslySetInnerHTML",
        ),
        rule(
            ExternalService::GitGuardian,
            Severity::Critical,
            "Hardcoded Secret",
            "A credential appears to be embedded in source code.",
            "Load secrets from the environment or a secret manager.",
            r#"(?i)\b(api[_-]?key|secret|password|passwd|token)\b\s*[:=]\s*["'][^"']{4,}["']"#,
        ),
        rule(
            ExternalService::SonarQube,
            Severity::High,
            "Shell Injection",
            "Spawning a shell with interpolated input allows command injection.",
            "Pass arguments as a list and avoid shell=True.",
            r"shell\s*=\s*True",
        ),
        rule(
            ExternalService::Snyk,
            Severity::Medium,
            "Insecure Deserialization",
            "Deserializing untrusted data can execute arbitrary code.",
            "Use a safe format such as JSON or a safe loader.",
            r"\bpickle\.loads?\s*\(|\byaml\.load\s*\(",
        ),
        rule(
            ExternalService::SonarQube,
            Severity::Low,
            "Weak Hash Algorithm",
            "MD5 and SHA-1 are not collision resistant.",
            "Use SHA-256 or a dedicated password hash.",
            r"(?i)\b(md5|sha1)\b",
        ),
    ]
});

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternSecurityScanner;

impl PatternSecurityScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn findings(&self, code: &str) -> Vec<SecurityScanResult> {
        code.lines()
            .enumerate()
            .flat_map(|(index, line)| {
                RULES
                    .iter()
                    .filter(move |rule| rule.pattern.is_match(line))
                    .map(move |rule| rule.finding(index + 1))
            })
            .collect()
    }
}

#[async_trait]
impl SecurityScanner for PatternSecurityScanner {
    async fn scan(
        &self,
        code: &str,
        lang: &str,
        settings: &MigrationSettings,
    ) -> Result<Vec<SecurityScanResult>> {
        if !settings.enable_security_scan {
            return Ok(Vec::new());
        }
        let findings = self.findings(code);
        tracing::debug!(lang, count = findings.len(), "Security scan finished");
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> MigrationSettings {
        MigrationSettings {
            enable_security_scan: true,
            ..MigrationSettings::default()
        }
    }

    #[test]
    fn test_rule_table_builds() {
        assert_eq!(RULES.len(), 7);
    }

    #[tokio::test]
    async fn test_eval_is_reported_with_line_number() {
        let code = "x = 1\ny = eval(input())\n";
        let findings = PatternSecurityScanner::new()
            .scan(code, "Python", &enabled())
            .await
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].vulnerability, "Unsafe Eval");
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].tool, ExternalService::Snyk);
        assert_eq!(findings[0].line, Some(2));
    }

    #[tokio::test]
    async fn test_disabled_scan_returns_empty_list() {
        let settings = MigrationSettings {
            enable_security_scan: false,
            ..MigrationSettings::default()
        };
        let findings = PatternSecurityScanner::new()
            .scan("eval('1')", "JavaScript", &settings)
            .await
            .unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_multiple_rules() {
        let code = "const API_KEY = \"sk-123456\";\nel.innerHTML = html;\nsubprocess.run(cmd, shell=True)";
        let names: Vec<String> = PatternSecurityScanner::new()
            .findings(code)
            .into_iter()
            .map(|f| f.vulnerability)
            .collect();
        assert_eq!(names, vec!["Hardcoded Secret", "DOM-based XSS", "Shell Injection"]);
    }

    #[test]
    fn test_clean_code_has_no_findings() {
        assert!(PatternSecurityScanner::new()
            .findings("def add(a, b):\n    return a + b")
            .is_empty());
    }
}
