//! `pyproject.toml` loading and the typed `[project]` view

use crate::Result;
use autorecipe_errors::{Error, RecipeError};
use autorecipe_types::LicenseFile;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed project metadata file
///
/// Keeps the raw table for dotted-path lookups into `[tool.*]` alongside the
/// typed `[project]` and `[build-system]` views.
#[derive(Debug, Clone)]
pub struct PyProject {
    path: PathBuf,
    raw: toml::Table,
    project: ProjectMetadata,
    build_system: BuildSystem,
}

/// The `[project]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub dynamic: Vec<String>,
    pub requires_python: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub optional_dependencies: IndexMap<String, toml::Value>,
    #[serde(default)]
    pub urls: IndexMap<String, String>,
    pub license: Option<License>,
    pub license_files: Option<LicenseFile>,
    pub description: Option<String>,
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
}

/// `project.license` in any of its accepted shapes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum License {
    Expression(String),
    Text { text: String },
    File { file: String },
}

/// The `[build-system]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSystem {
    #[serde(default)]
    pub build_backend: String,
}

impl ProjectMetadata {
    /// Whether `field` is listed in `project.dynamic`
    #[must_use]
    pub fn is_dynamic(&self, field: &str) -> bool {
        self.dynamic.iter().any(|f| f == field)
    }

    /// URL fields keyed by lowercased label
    #[must_use]
    pub fn urls_normalized(&self) -> IndexMap<String, &str> {
        self.urls
            .iter()
            .map(|(label, url)| (label.to_lowercase(), url.as_str()))
            .collect()
    }
}

impl PyProject {
    /// Read and parse a metadata file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, is not valid
    /// TOML, or has no `[project]` table.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecipeError::InputNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(&e, path))?;
        Self::parse(&contents, path)
    }

    /// Parse metadata from a string; `path` is used for the project root and
    /// in error messages
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid TOML or have no usable
    /// `[project]` table.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let raw: toml::Table = toml::from_str(contents).map_err(|e| RecipeError::InvalidToml {
            message: format!("{}: {e}", path.display()),
        })?;

        let project = match raw.get("project") {
            Some(toml::Value::Table(table)) => toml::Value::Table(table.clone())
                .try_into::<ProjectMetadata>()
                .map_err(|e| RecipeError::InvalidToml {
                    message: format!("{}: [project]: {e}", path.display()),
                })?,
            _ => {
                return Err(RecipeError::MissingProjectTable {
                    path: path.display().to_string(),
                }
                .into())
            }
        };

        let build_system = match raw.get("build-system") {
            Some(value @ toml::Value::Table(_)) => value
                .clone()
                .try_into::<BuildSystem>()
                .map_err(|e| RecipeError::InvalidToml {
                    message: format!("{}: [build-system]: {e}", path.display()),
                })?,
            _ => BuildSystem::default(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            raw,
            project,
            build_system,
        })
    }

    /// Path the metadata was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the metadata file
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn project(&self) -> &ProjectMetadata {
        &self.project
    }

    /// The `build-backend` string, empty when not declared
    #[must_use]
    pub fn build_backend(&self) -> &str {
        &self.build_system.build_backend
    }

    /// Nested lookup with `.` notation, `None` when any segment is missing
    #[must_use]
    pub fn get(&self, dotted: &str) -> Option<&toml::Value> {
        toml_get(&self.raw, dotted)
    }

    /// Whether the dotted path resolves to a table
    #[must_use]
    pub fn has_table(&self, dotted: &str) -> bool {
        matches!(self.get(dotted), Some(toml::Value::Table(_)))
    }
}

/// Nested lookup with `.` notation
#[must_use]
pub fn toml_get<'a>(table: &'a toml::Table, dotted: &str) -> Option<&'a toml::Value> {
    let mut parts = dotted.split('.');
    let mut current = table.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}
