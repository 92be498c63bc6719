//! Header documentation in the target language's comment syntax.

use async_trait::async_trait;
use chimera_core::services::CodeDocumentor;
use chimera_core::Result;

/// Comment syntax used to wrap the generated header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    /// `/** ... */`
    Block,
    /// `# ...`
    Hash,
    /// `-- ...`
    DoubleDash,
    /// `<!-- ... -->`
    Markup,
}

impl CommentStyle {
    fn for_language(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "python" | "django" | "flask" | "fastapi" | "ruby" | "perl" | "bash"
            | "powershell" | "r" | "elixir" | "yaml" | "kubernetes yaml" | "docker compose"
            | "ansible" | "terraform" => CommentStyle::Hash,
            "sql" | "postgresql" | "mysql" | "haskell" | "lua" => CommentStyle::DoubleDash,
            "html" | "xml" | "markdown" | "vue" => CommentStyle::Markup,
            _ => CommentStyle::Block,
        }
    }

    fn wrap(self, lines: &[String]) -> String {
        match self {
            CommentStyle::Block => {
                let body: Vec<String> = lines.iter().map(|l| format!(" * {l}")).collect();
                format!("/**\n{}\n */", body.join("\n"))
            }
            CommentStyle::Hash => prefix_lines(lines, "# "),
            CommentStyle::DoubleDash => prefix_lines(lines, "-- "),
            CommentStyle::Markup => format!("<!--\n{}\n-->", lines.join("\n")),
        }
    }
}

fn prefix_lines(lines: &[String], prefix: &str) -> String {
    lines
        .iter()
        .map(|l| format!("{prefix}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDocumentor;

impl HeaderDocumentor {
    pub fn new() -> Self {
        Self
    }

    pub fn header(&self, code: &str, lang: &str) -> String {
        let line_count = code.lines().count();
        let lines = vec![
            format!("Automatically generated documentation for {lang} code."),
            "This module handles core business logic.".to_string(),
            format!("Lines: {line_count}"),
        ];
        CommentStyle::for_language(lang).wrap(&lines)
    }
}

#[async_trait]
impl CodeDocumentor for HeaderDocumentor {
    async fn generate_docs(&self, code: &str, lang: &str) -> Result<String> {
        Ok(self.header(code, lang))
    }
}
