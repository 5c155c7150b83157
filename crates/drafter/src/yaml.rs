//! YAML output codec and recipe file writing

use crate::Result;
use autorecipe_errors::{Error, RecipeError};
use autorecipe_events::{AppEvent, EventEmitter, RecipeEvent};
use autorecipe_types::RecipeDocument;
use std::path::{Path, PathBuf};

/// Serialize a recipe document, keeping section order
///
/// # Errors
///
/// Returns `RecipeError::SerializeFailed` if a value cannot be represented
/// in YAML.
pub fn render(document: &RecipeDocument) -> Result<String> {
    serde_yml::to_string(document).map_err(|e| {
        RecipeError::SerializeFailed {
            message: e.to_string(),
        }
        .into()
    })
}

/// `<file name>.bak` next to `path`
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

/// Write rendered YAML to `path`
///
/// Parent directories are created. An existing file is moved to its backup
/// path first unless `overwrite` is set. Returns the backup location when
/// one was made.
///
/// # Errors
///
/// Returns `RecipeError::WriteFailed` if the directory, backup or file
/// cannot be written.
pub fn write<E: EventEmitter + ?Sized>(
    yaml: &str,
    path: &Path,
    overwrite: bool,
    events: &E,
) -> Result<Option<PathBuf>> {
    let write_failed = |e: std::io::Error| -> Error {
        RecipeError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let mut backup = None;
    if path.exists() && !overwrite {
        let target = backup_path(path);
        std::fs::rename(path, &target).map_err(write_failed)?;
        events.emit_warning(format!(
            "Existing {} backed up to {}",
            path.display(),
            target.display()
        ));
        events.emit(AppEvent::Recipe(RecipeEvent::BackupCreated {
            original: path.to_path_buf(),
            backup: target.clone(),
        }));
        backup = Some(target);
    }

    std::fs::write(path, yaml).map_err(write_failed)?;
    tracing::debug!(path = %path.display(), bytes = yaml.len(), "recipe written");
    events.emit_recipe_written(path);
    Ok(backup)
}
