//! Migration prompt assembly.
//!
//! The prompt is a typed request rendered through a Jinja2 template, so the
//! section order is fixed by the template rather than by string pushes.

use chimera_core::settings::MigrationSettings;
use chimera_core::{ChimeraError, Result};
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

const TEMPLATE_NAME: &str = "migration";

const MIGRATION_TEMPLATE: &str = r#"You are a world-class code migration expert.
Task: Migrate the following {{ from_lang }} code to {{ to_lang }}.

Project Context: {{ context }}

Code Style: {{ style_guide }}
Strategy: {{ strategy }}
Instructions:
{% for instruction in instructions -%}
- {{ instruction }}
{% endfor -%}
{% if custom_suffix %}{{ custom_suffix }}
{% endif %}
Input Code:
```{{ from_lang }}
{{ input_code }}
```"#;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, MIGRATION_TEMPLATE)
        .expect("migration template is valid");
    env
});

/// Everything the template needs for one run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPromptRequest<'a> {
    pub from_lang: &'a str,
    pub to_lang: &'a str,
    /// Project description; empty when contextual analysis is off.
    pub context: &'a str,
    pub style_guide: &'a str,
    pub strategy: String,
    pub instructions: Vec<String>,
    pub custom_suffix: Option<&'a str>,
    pub input_code: &'a str,
}

impl<'a> MigrationPromptRequest<'a> {
    pub fn new(
        input_code: &'a str,
        from_lang: &'a str,
        to_lang: &'a str,
        context: &'a str,
        settings: &'a MigrationSettings,
    ) -> Self {
        Self {
            from_lang,
            to_lang,
            context,
            style_guide: settings.style_guide(),
            strategy: settings.migration_strategy.to_string(),
            instructions: vec![
                "Maintain all logic and functionality.".to_string(),
                format!("Use modern {to_lang} idioms."),
                "Return ONLY the code, inside a markdown block.".to_string(),
            ],
            custom_suffix: settings
                .custom_prompt_append
                .as_deref()
                .map(str::trim)
                .filter(|suffix| !suffix.is_empty()),
            input_code,
        }
    }

    pub fn render(&self) -> Result<String> {
        TEMPLATES
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(self))
            .map_err(|e| ChimeraError::internal(format!("Failed to render prompt: {e}")))
    }
}

/// Builds the prompt for migrating `input_code` from `from_lang` to `to_lang`.
pub fn build_migration_prompt(
    input_code: &str,
    from_lang: &str,
    to_lang: &str,
    context: &str,
    settings: &MigrationSettings,
) -> Result<String> {
    MigrationPromptRequest::new(input_code, from_lang, to_lang, context, settings).render()
}
