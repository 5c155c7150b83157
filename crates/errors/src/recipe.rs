//! Recipe generation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RecipeError {
    #[error("{path} not found")]
    InputNotFound { path: String },

    #[error("invalid TOML: {message}")]
    InvalidToml { message: String },

    #[error("[project] table not found in {path}")]
    MissingProjectTable { path: String },

    #[error("Version not found in project table and not marked as dynamic")]
    MissingVersion,

    #[error("invalid override at {key}: {message}")]
    InvalidOverride { key: String, message: String },

    #[error("failed to serialize recipe: {message}")]
    SerializeFailed { message: String },

    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}

impl UserFacingError for RecipeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InputNotFound { .. } => {
                Some("Run from the project root or pass the metadata file with --input.")
            }
            Self::MissingProjectTable { .. } => {
                Some("Declare the package metadata in a [project] table.")
            }
            Self::MissingVersion => Some(
                "Set project.version, or list \"version\" in project.dynamic to resolve it from the build backend.",
            ),
            Self::InvalidOverride { .. } => {
                Some("Fix the value under [tool.conda.recipe] and retry.")
            }
            Self::WriteFailed { .. } => Some("Ensure the output directory is writable."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InputNotFound { .. } => "recipe.input_not_found",
            Self::InvalidToml { .. } => "recipe.invalid_toml",
            Self::MissingProjectTable { .. } => "recipe.missing_project_table",
            Self::MissingVersion => "recipe.missing_version",
            Self::InvalidOverride { .. } => "recipe.invalid_override",
            Self::SerializeFailed { .. } => "recipe.serialize_failed",
            Self::WriteFailed { .. } => "recipe.write_failed",
        };
        Some(code)
    }
}
