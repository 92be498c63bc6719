use chimera_core::language::{LANGUAGES, sample_snippet};
use colored::Colorize;

pub fn run() {
    for language in LANGUAGES {
        if sample_snippet(language).is_some() {
            println!("{language} {}", "(sample: --example)".dimmed());
        } else {
            println!("{language}");
        }
    }
}
