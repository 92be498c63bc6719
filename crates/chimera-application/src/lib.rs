//! Application layer for the Chimera code migrator.
//!
//! Wires the generation client and the post-processing services into the
//! migration pipeline.

pub mod migration_usecase;
pub mod prompt;
pub mod services;

pub use migration_usecase::{COMPLETION_MESSAGE, MigrationResult, MigrationUseCase};
pub use prompt::{MigrationPromptRequest, build_migration_prompt};
pub use services::PostProcessingServices;
