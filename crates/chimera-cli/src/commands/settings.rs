use anyhow::{Context, Result, bail};
use chimera_core::MigrationSettings;
use chimera_infrastructure::SettingsStorage;

use super::utils::load_settings;

pub fn show(json: bool) -> Result<()> {
    let settings = load_settings()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", toml::to_string_pretty(&settings)?);
    }
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let storage = SettingsStorage::new().context("Failed to locate settings file")?;
    write_defaults(&storage, force)?;
    println!("Wrote default settings to {}", storage.path().display());
    Ok(())
}

fn write_defaults(storage: &SettingsStorage, force: bool) -> Result<()> {
    if storage.path().exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            storage.path().display()
        );
    }
    storage
        .save(&MigrationSettings::default())
        .with_context(|| format!("Failed to write {}", storage.path().display()))
}
