//! Markdown code-fence extraction for generated text.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    // Opener: three backticks, an optional language tag, newline. Body is lazy
    // so the first closing fence wins.
    Regex::new(r"```[\w+#.\-]*[ \t]*\n([\s\S]+?)```").expect("fence pattern is valid")
});

/// Returns the trimmed body of the first fenced code block, if any.
pub fn find_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim())
}

/// Extracts the canonical generated code from a model response.
///
/// Absence of a fence is not an error: the raw text is returned unchanged.
pub fn extract_code(text: &str) -> String {
    match find_fenced_block(text) {
        Some(body) => body.to_string(),
        None => text.to_string(),
    }
}
