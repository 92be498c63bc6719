//! Migration settings domain model.
//!
//! Settings are an immutable value: a run reads a snapshot, and every edit
//! goes through [`MigrationSettings::apply`], which validates the change and
//! returns a new value.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ChimeraError, Result};

/// Style guide used when a run has none configured.
pub const DEFAULT_STYLE_GUIDE: &str = "Standard";

/// LLM vendors selectable in the settings panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum AIProvider {
    #[strum(to_string = "ChatGPT (OpenAI)", serialize = "chat_gpt", serialize = "openai")]
    ChatGpt,
    #[strum(to_string = "Gemini (Google)", serialize = "gemini")]
    Gemini,
    #[strum(to_string = "Claude (Anthropic)", serialize = "claude")]
    Claude,
    #[strum(to_string = "Llama (Meta)", serialize = "llama")]
    Llama,
    #[strum(to_string = "Mistral AI", serialize = "mistral")]
    Mistral,
    #[strum(to_string = "Grok (xAI)", serialize = "grok")]
    Grok,
    #[strum(to_string = "Falcon (TII)", serialize = "falcon")]
    Falcon,
    #[strum(to_string = "Cohere", serialize = "cohere")]
    Cohere,
    #[strum(to_string = "Azure OpenAI", serialize = "azure_open_ai")]
    AzureOpenAi,
    #[strum(to_string = "AWS Bedrock", serialize = "aws_bedrock")]
    AwsBedrock,
    #[strum(to_string = "Google Vertex AI", serialize = "google_vertex_ai")]
    GoogleVertexAi,
    #[strum(to_string = "Custom Fine-Tuned Model", serialize = "custom_fine_tuned")]
    CustomFineTuned,
}

/// External tools and platforms referenced by settings and scan findings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ExternalService {
    #[strum(to_string = "GitHub", serialize = "github")]
    GitHub,
    #[strum(to_string = "GitLab", serialize = "gitlab")]
    GitLab,
    #[strum(to_string = "Azure DevOps", serialize = "azure_devops")]
    AzureDevOps,
    #[strum(to_string = "Bitbucket", serialize = "bitbucket")]
    Bitbucket,
    #[strum(to_string = "GitHub Actions", serialize = "github_actions")]
    GitHubActions,
    #[strum(to_string = "Jenkins", serialize = "jenkins")]
    Jenkins,
    #[strum(to_string = "GitLab CI", serialize = "gitlab_ci")]
    GitLabCi,
    #[strum(to_string = "Azure Pipelines", serialize = "azure_pipelines")]
    AzurePipelines,
    #[strum(to_string = "Amazon Web Services", serialize = "aws")]
    Aws,
    #[strum(to_string = "Microsoft Azure", serialize = "azure")]
    Azure,
    #[strum(to_string = "Google Cloud Platform", serialize = "gcp")]
    Gcp,
    #[strum(to_string = "Snyk", serialize = "snyk")]
    Snyk,
    #[strum(to_string = "SonarQube", serialize = "sonarqube")]
    SonarQube,
    #[strum(to_string = "GitGuardian", serialize = "gitguardian")]
    GitGuardian,
}

/// How the model is asked to approach the migration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MigrationStrategy {
    #[default]
    Direct,
    RefactorThenMigrate,
    Incremental,
}

/// Model selection and generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIModelConfig {
    pub provider: AIProvider,
    pub model_name: String,
    /// Sampling temperature, within `[0, 2]`
    pub temperature: f32,
    /// Maximum output tokens, strictly positive
    pub max_tokens: u32,
    /// Nucleus sampling, within `[0, 1]`
    pub top_p: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_token_input: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_token_output: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for AIModelConfig {
    fn default() -> Self {
        Self {
            provider: AIProvider::Gemini,
            model_name: "gemini-3-flash-preview".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            top_p: 0.95,
            cost_per_token_input: Some(0.0001),
            cost_per_token_output: Some(0.0004),
            max_retries: Some(3),
            timeout_ms: Some(60_000),
        }
    }
}

impl AIModelConfig {
    /// Checks the generation parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(ChimeraError::validation("Model name must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChimeraError::validation(format!(
                "Temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ChimeraError::validation("Max tokens must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ChimeraError::validation(format!(
                "Top-p must be within [0, 1], got {}",
                self.top_p
            )));
        }
        for rate in [self.cost_per_token_input, self.cost_per_token_output]
            .into_iter()
            .flatten()
        {
            if rate < 0.0 {
                return Err(ChimeraError::validation("Token cost rates must not be negative"));
            }
        }
        Ok(())
    }
}

/// Configuration snapshot for one migration run.
///
/// Toggles are independent: none of them implies or excludes another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    pub ai_config: AIModelConfig,
    pub enable_auto_format: bool,
    pub enable_lint_fix: bool,
    pub enable_security_scan: bool,
    pub enable_performance_opt: bool,
    pub enable_diff_view: bool,
    pub enable_contextual_analysis: bool,
    pub post_migration_testing: bool,
    pub generate_documentation: bool,
    pub migration_strategy: MigrationStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_style_guide: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_limit_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt_append: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_vcs_integration: Option<ExternalService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_ci_integration: Option<ExternalService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cloud_platform: Option<ExternalService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_reviewer_ai: Option<AIProvider>,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            ai_config: AIModelConfig::default(),
            enable_auto_format: true,
            enable_lint_fix: true,
            enable_security_scan: false,
            enable_performance_opt: false,
            enable_diff_view: true,
            enable_contextual_analysis: false,
            post_migration_testing: false,
            generate_documentation: false,
            migration_strategy: MigrationStrategy::Direct,
            code_style_guide: Some("Airbnb".to_string()),
            cost_limit_usd: None,
            complexity_threshold: None,
            custom_prompt_append: None,
            target_vcs_integration: None,
            target_ci_integration: None,
            target_cloud_platform: None,
            code_reviewer_ai: None,
        }
    }
}

/// The boolean feature switches of [`MigrationSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeatureToggle {
    AutoFormat,
    LintFix,
    SecurityScan,
    PerformanceOpt,
    DiffView,
    ContextualAnalysis,
    PostMigrationTesting,
    GenerateDocumentation,
}

/// One edit coming from the settings panel (or a CLI override).
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsChange {
    Provider(AIProvider),
    ModelName(String),
    Temperature(f32),
    MaxTokens(u32),
    TopP(f32),
    MaxRetries(Option<u32>),
    TimeoutMs(Option<u64>),
    Toggle(FeatureToggle, bool),
    Strategy(MigrationStrategy),
    StyleGuide(Option<String>),
    CostLimit(Option<f64>),
    ComplexityThreshold(Option<u32>),
    CustomPromptAppend(Option<String>),
}

impl SettingsChange {
    /// Parses a `key=value` style override.
    ///
    /// An empty value clears optional fields. Toggle keys are the
    /// [`FeatureToggle`] names, e.g. `security_scan=true`.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let key = key.trim();
        let value = value.trim();
        let optional = |value: &str| -> Option<String> {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        let change = match key {
            "provider" => Self::Provider(parse_value(key, value)?),
            "model" | "model_name" => Self::ModelName(value.to_string()),
            "temperature" => Self::Temperature(parse_value(key, value)?),
            "max_tokens" => Self::MaxTokens(parse_value(key, value)?),
            "top_p" => Self::TopP(parse_value(key, value)?),
            "max_retries" => Self::MaxRetries(parse_optional(key, value)?),
            "timeout_ms" => Self::TimeoutMs(parse_optional(key, value)?),
            "strategy" | "migration_strategy" => Self::Strategy(parse_value(key, value)?),
            "style_guide" | "code_style_guide" => Self::StyleGuide(optional(value)),
            "cost_limit" | "cost_limit_usd" => Self::CostLimit(parse_optional(key, value)?),
            "complexity_threshold" => Self::ComplexityThreshold(parse_optional(key, value)?),
            "custom_prompt" | "custom_prompt_append" => Self::CustomPromptAppend(optional(value)),
            other => {
                let toggle = FeatureToggle::from_str(other).map_err(|_| {
                    let known: Vec<String> = FeatureToggle::iter().map(|t| t.to_string()).collect();
                    ChimeraError::validation(format!(
                        "Unknown setting '{other}' (toggles: {})",
                        known.join(", ")
                    ))
                })?;
                Self::Toggle(toggle, parse_value(key, value)?)
            }
        };
        Ok(change)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| ChimeraError::validation(format!("Invalid value '{value}' for '{key}'")))
}

fn parse_optional<T: FromStr>(key: &str, value: &str) -> Result<Option<T>> {
    if value.is_empty() {
        Ok(None)
    } else {
        parse_value(key, value).map(Some)
    }
}

impl MigrationSettings {
    /// Returns whether `toggle` is enabled.
    pub fn is_enabled(&self, toggle: FeatureToggle) -> bool {
        match toggle {
            FeatureToggle::AutoFormat => self.enable_auto_format,
            FeatureToggle::LintFix => self.enable_lint_fix,
            FeatureToggle::SecurityScan => self.enable_security_scan,
            FeatureToggle::PerformanceOpt => self.enable_performance_opt,
            FeatureToggle::DiffView => self.enable_diff_view,
            FeatureToggle::ContextualAnalysis => self.enable_contextual_analysis,
            FeatureToggle::PostMigrationTesting => self.post_migration_testing,
            FeatureToggle::GenerateDocumentation => self.generate_documentation,
        }
    }

    /// The configured style guide, or [`DEFAULT_STYLE_GUIDE`].
    pub fn style_guide(&self) -> &str {
        self.code_style_guide
            .as_deref()
            .filter(|guide| !guide.trim().is_empty())
            .unwrap_or(DEFAULT_STYLE_GUIDE)
    }

    /// Validates the whole snapshot.
    pub fn validate(&self) -> Result<()> {
        self.ai_config.validate()?;
        if let Some(limit) = self.cost_limit_usd
            && limit < 0.0
        {
            return Err(ChimeraError::validation("Cost limit must not be negative"));
        }
        Ok(())
    }

    /// Produces a new settings value with `change` applied.
    ///
    /// `self` is left untouched, so a run holding the previous snapshot is
    /// unaffected.
    pub fn apply(&self, change: SettingsChange) -> Result<Self> {
        let mut next = self.clone();
        match change {
            SettingsChange::Provider(provider) => next.ai_config.provider = provider,
            SettingsChange::ModelName(name) => next.ai_config.model_name = name,
            SettingsChange::Temperature(value) => next.ai_config.temperature = value,
            SettingsChange::MaxTokens(value) => next.ai_config.max_tokens = value,
            SettingsChange::TopP(value) => next.ai_config.top_p = value,
            SettingsChange::MaxRetries(value) => next.ai_config.max_retries = value,
            SettingsChange::TimeoutMs(value) => next.ai_config.timeout_ms = value,
            SettingsChange::Toggle(toggle, enabled) => {
                let slot = match toggle {
                    FeatureToggle::AutoFormat => &mut next.enable_auto_format,
                    FeatureToggle::LintFix => &mut next.enable_lint_fix,
                    FeatureToggle::SecurityScan => &mut next.enable_security_scan,
                    FeatureToggle::PerformanceOpt => &mut next.enable_performance_opt,
                    FeatureToggle::DiffView => &mut next.enable_diff_view,
                    FeatureToggle::ContextualAnalysis => &mut next.enable_contextual_analysis,
                    FeatureToggle::PostMigrationTesting => &mut next.post_migration_testing,
                    FeatureToggle::GenerateDocumentation => &mut next.generate_documentation,
                };
                *slot = enabled;
            }
            SettingsChange::Strategy(strategy) => next.migration_strategy = strategy,
            SettingsChange::StyleGuide(guide) => next.code_style_guide = guide,
            SettingsChange::CostLimit(limit) => next.cost_limit_usd = limit,
            SettingsChange::ComplexityThreshold(value) => next.complexity_threshold = value,
            SettingsChange::CustomPromptAppend(text) => next.custom_prompt_append = text,
        }
        next.validate()?;
        Ok(next)
    }
}
