//! Storage initialization
//!
//! First-run setup: directories, empty record files and default settings.

use tracing::info;

use crate::config::paths::FinTrackPaths;
use crate::config::settings::Settings;
use crate::error::FinTrackResult;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running this twice is harmless.
/// Returns the settings now in effect.
pub fn initialize_storage(paths: &FinTrackPaths) -> FinTrackResult<Settings> {
    paths.ensure_directories()?;

    let empty_files = [
        (paths.accounts_file(), serde_json::json!({ "accounts": [] })),
        (paths.transactions_file(), serde_json::json!({ "transactions": [] })),
        (paths.budgets_file(), serde_json::json!({ "budgets": [] })),
    ];
    for (path, empty) in empty_files {
        if !path.exists() {
            write_json_atomic(&path, &empty)?;
        }
    }

    let settings = Settings::load_or_create(paths)?;
    if !paths.is_initialized() {
        settings.save(paths)?;
        info!(base_dir = %paths.base_dir().display(), "initialized data directory");
    }

    Ok(settings)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FinTrackPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.accounts_file().exists());
        assert!(paths.transactions_file().exists());
        assert!(paths.budgets_file().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.current_user = UserId::from("dana");
        settings.save(&paths).unwrap();

        let effective = initialize_storage(&paths).unwrap();
        assert_eq!(effective.current_user, UserId::from("dana"));
    }
}
