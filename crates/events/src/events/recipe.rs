use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Events emitted while a recipe is drafted and written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecipeEvent {
    /// Project metadata was loaded
    MetadataLoaded { path: PathBuf, name: String },

    /// A dynamic version was resolved by a strategy
    VersionResolved { strategy: String, version: String },

    /// Every version strategy failed and the placeholder was used
    VersionPlaceholder { placeholder: String },

    /// A recipe section was produced
    SectionGenerated { section: String },

    /// An existing recipe was moved aside before writing
    BackupCreated { original: PathBuf, backup: PathBuf },

    /// The recipe was written to disk
    Written { path: PathBuf },
}
