//! Infrastructure layer for chimera: configuration paths and file storage
//! for settings and secrets.

pub mod paths;
pub mod secret_service;
pub mod storage;

pub use paths::ChimeraPaths;
pub use secret_service::SecretServiceImpl;
pub use storage::SettingsStorage;
