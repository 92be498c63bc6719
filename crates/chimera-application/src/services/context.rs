use async_trait::async_trait;
use chimera_core::services::ContextAnalyzer;
use chimera_core::Result;

/// Description returned for every project until repository inspection exists.
pub const PLACEHOLDER_PROJECT_CONTEXT: &str = "Project uses React 18, TailwindCSS, and TypeScript.";

/// Context analyzer that does not inspect the repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContextAnalyzer;

impl StaticContextAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContextAnalyzer for StaticContextAnalyzer {
    async fn analyze_project(&self, repo: &str, branch: &str, path: &str) -> Result<String> {
        tracing::debug!(repo, branch, path, "Using placeholder project context");
        Ok(PLACEHOLDER_PROJECT_CONTEXT.to_string())
    }
}
