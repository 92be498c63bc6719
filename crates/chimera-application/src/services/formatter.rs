//! Bracket-depth re-indentation.
//!
//! Not language-aware and does not validate syntax: every line is trimmed
//! and re-indented by the running count of lines that end in an opening
//! bracket minus lines that start with a closing one.

use async_trait::async_trait;
use chimera_core::services::CodeFormatter;
use chimera_core::Result;

/// Style guides whose indent unit is four spaces; everything else uses two.
const FOUR_SPACE_GUIDES: &[&str] = &["pep8", "black", "psr-12", "psr12", "rustfmt", "google java"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFormatter;

impl BracketFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Indent unit for a style guide.
    pub fn indent_unit(style_guide: &str) -> &'static str {
        let guide = style_guide.trim().to_ascii_lowercase();
        if FOUR_SPACE_GUIDES.contains(&guide.as_str()) {
            "    "
        } else {
            "  "
        }
    }

    pub fn reindent(&self, code: &str, style_guide: &str) -> String {
        let unit = Self::indent_unit(style_guide);
        let mut depth: usize = 0;

        code.split('\n')
            .map(|line| {
                let line = line.trim();
                if line.starts_with(['}', ']', ')']) {
                    depth = depth.saturating_sub(1);
                }
                let formatted = if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", unit.repeat(depth), line)
                };
                if line.ends_with(['{', '(', '[']) {
                    depth += 1;
                }
                formatted
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl CodeFormatter for BracketFormatter {
    async fn format(&self, code: &str, _lang: &str, style_guide: &str) -> Result<String> {
        Ok(self.reindent(code, style_guide))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindents_nested_blocks() {
        let code = "function f() {\nif (x) {\nreturn [\n1,\n];\n}\n}";
        let expected = "function f() {\n  if (x) {\n    return [\n      1,\n    ];\n  }\n}";
        assert_eq!(BracketFormatter::new().reindent(code, "Airbnb"), expected);
    }

    #[test]
    fn test_four_space_style_guides() {
        let code = "def f(\na,\n):";
        assert_eq!(
            BracketFormatter::new().reindent(code, "PEP8"),
            "def f(\n    a,\n):"
        );
    }

    #[test]
    fn test_blank_lines_stay_empty_and_depth_never_negative() {
        let code = "}\n\n  x\n";
        assert_eq!(BracketFormatter::new().reindent(code, "Standard"), "}\n\nx\n");
    }

    #[test]
    fn test_reformatting_is_idempotent() {
        let formatter = BracketFormatter::new();
        let samples = [
            "class A {\n    method() {\n  return 1;\n }\n}",
            "x = [\n1,\n2\n]\nprint(x)",
            "   \n\t{\n\t\t}\n))\n",
            "",
        ];
        for guide in ["Standard", "PEP8"] {
            for sample in samples {
                let once = formatter.reindent(sample, guide);
                let twice = formatter.reindent(&once, guide);
                assert_eq!(once, twice, "not idempotent for {sample:?} with {guide}");
            }
        }
    }
}
