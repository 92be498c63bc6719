pub mod analyze;
pub mod detect;
pub mod languages;
pub mod migrate;
pub mod settings;
pub mod utils;
