//! Language catalog and heuristic language detection.

/// Every language label the migrator accepts as a source or target.
pub const LANGUAGES: &[&str] = &[
    "SASS",
    "CSS",
    "JavaScript",
    "TypeScript",
    "Python",
    "Go",
    "React",
    "Vue",
    "Angular",
    "Tailwind CSS",
    "Java",
    "C#",
    "C++",
    "Rust",
    "PHP",
    "Ruby",
    "Kotlin",
    "Swift",
    "Objective-C",
    "SQL",
    "NoSQL",
    "HTML",
    "XML",
    "JSON",
    "YAML",
    "Markdown",
    "Bash",
    "PowerShell",
    "Docker Compose",
    "Kubernetes YAML",
    "Terraform",
    "Ansible",
    "R",
    "MATLAB",
    "Perl",
    "Scala",
    "Dart",
    "Elixir",
    "F#",
    "Haskell",
    "Lua",
    "Solidity",
    "GraphQL",
    "gRPC",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "AWS CloudFormation",
    "Serverless Framework",
    "Next.js",
    "NestJS",
    "FastAPI",
    "Django",
    "Flask",
    "Spring Boot",
];

/// Label returned by [`detect_language`] when no marker matches.
pub const DEFAULT_DETECTED_LANGUAGE: &str = "JavaScript";

/// Candidate languages and their markers, in tie-breaking order.
const DETECTION_MARKERS: &[(&str, &[&str])] = &[
    (
        "TypeScript",
        &["interface", "type", "const", "let", "async", "import", "export", "tsx"],
    ),
    (
        "JavaScript",
        &["var", "function", "const", "let", "async", "import", "export"],
    ),
    ("Python", &["def", "class", "import", "from", "if __name__"]),
    ("Go", &["package", "import", "func", "var", "type", "struct"]),
    (
        "React",
        &["import React", "useState", "useEffect", "<div", "className"],
    ),
    ("CSS", &["{", "}", ":", ";", "body", ".class", "#id", "@media"]),
];

/// Returns the catalog's canonical spelling of `label`, matching case-insensitively.
pub fn canonical_language(label: &str) -> Option<&'static str> {
    let wanted = label.trim();
    LANGUAGES
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
}

/// Checks whether `label` names a catalog language.
pub fn is_supported_language(label: &str) -> bool {
    canonical_language(label).is_some()
}

/// Best-effort classification of a snippet.
///
/// Each candidate scores one point per marker present in the code. Only a
/// strictly higher score replaces the current best, so the first candidate
/// reaching the maximum wins. Advisory only; never overrides a user choice.
pub fn detect_language(code: &str) -> &'static str {
    let mut best_score = 0;
    let mut detected = DEFAULT_DETECTED_LANGUAGE;

    for (language, markers) in DETECTION_MARKERS {
        let score = markers
            .iter()
            .filter(|marker| code.contains(*marker))
            .count();
        if score > best_score {
            best_score = score;
            detected = language;
        }
    }

    detected
}

/// Starter code for the languages that ship one.
const SAMPLE_SNIPPETS: &[(&str, &str)] = &[
    (
        "SASS",
        r#"// SASS Example
$primary-color: #333;
$font-stack: 'Roboto', sans-serif;

body {
  color: $primary-color;
  font-family: $font-stack;
  margin: 0;
  padding: 0;

  @media screen and (max-width: 768px) {
    font-size: 0.9em;
  }
}

.button {
  background-color: lighten($primary-color, 20%);
  padding: 10px 15px;
  border-radius: 5px;
  &:hover {
    background-color: darken($primary-color, 10%);
    cursor: pointer;
  }
}"#,
    ),
    (
        "JavaScript",
        r#"// JavaScript Example (ES5 to ES6+ refactoring)
var old_function = function(name, age) {
    console.log("Hello, my name is " + name + " and I am " + age + " years old.");
    var result = { name: name, age: age };
    return result;
};

var data = [1, 2, 3];
var mapped_data = data.map(function(item) {
    return item * 2;
});"#,
    ),
    (
        "Python",
        r#"## Python Example
from typing import List, Dict, Any

class Product:
    def __init__(self, name: str, price: float):
        self.name = name
        self.price = price

    def get_display_price(self) -> str:
        return f"${self.price:.2f}"

if __name__ == "__main__":
    p = Product("Laptop", 1200.50)
    print(p.get_display_price())
"#,
    ),
];

/// Returns the sample snippet for `label`, if that language has one.
pub fn sample_snippet(label: &str) -> Option<&'static str> {
    let language = canonical_language(label)?;
    SAMPLE_SNIPPETS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, code)| *code)
}

/// Languages with a sample snippet, in catalog order.
pub fn languages_with_samples() -> impl Iterator<Item = &'static str> {
    LANGUAGES
        .iter()
        .copied()
        .filter(|language| SAMPLE_SNIPPETS.iter().any(|(name, _)| name == language))
}
