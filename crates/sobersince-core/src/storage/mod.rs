mod settings;

pub use settings::{keys, FileSettings, MemorySettings, Profile, SettingsStore};

use std::io;
use std::path::PathBuf;

/// Returns `~/.config/sobersince[-dev]/` based on SOBERSINCE_ENV.
///
/// Set SOBERSINCE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SOBERSINCE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sobersince-dev")
    } else {
        base_dir.join("sobersince")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
