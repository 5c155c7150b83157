//! The `[tool.conda.recipe]` override namespace
//!
//! Every table is validated up front so a value of the wrong type fails the
//! run before any resolver looks at it.

use crate::metadata::PyProject;
use crate::Result;
use autorecipe_errors::RecipeError;
use autorecipe_types::{LicenseFile, Script};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

pub const NAMESPACE: &str = "tool.conda.recipe";

/// Validated override tables
#[derive(Debug, Clone, Default)]
pub struct RecipeOverrides {
    pub source: Option<toml::Table>,
    pub build: Option<BuildOverrides>,
    pub requirements: RequirementOverrides,
    pub test: Option<toml::Value>,
    pub about: Option<AboutOverrides>,
    pub extra: Option<toml::Table>,
    pub extra_context: IndexMap<String, toml::Value>,
    pub output: Option<OutputOverrides>,
}

/// `[tool.conda.recipe.build]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildOverrides {
    pub script: Option<Script>,
    pub number: Option<u64>,
    pub entry_points: Option<Vec<String>>,
    pub skip: Option<OneOrMany>,
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// A string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// `[tool.conda.recipe.requirements]`
///
/// Bucket values stay raw here; the requirements resolver normalises them and
/// reports shape errors with the bucket name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementOverrides {
    pub build: Option<toml::Value>,
    pub host: Option<toml::Value>,
    pub run: Option<toml::Value>,
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// `[tool.conda.recipe.about]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AboutOverrides {
    pub summary: Option<String>,
    pub license: Option<String>,
    pub license_file: Option<LicenseFile>,
    pub homepage: Option<String>,
    pub documentation: Option<String>,
    pub repository: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// `[tool.conda.recipe.output]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputOverrides {
    pub path: Option<PathBuf>,
}

impl RecipeOverrides {
    /// Read and validate every override table
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::InvalidOverride` naming the offending key when a
    /// table has values of the wrong type.
    pub fn from_pyproject(pyproject: &PyProject) -> Result<Self> {
        let extra_context: IndexMap<String, toml::Value> =
            typed(pyproject, "extra_context")?.unwrap_or_default();
        for (key, value) in &extra_context {
            if matches!(value, toml::Value::Array(_) | toml::Value::Table(_)) {
                return Err(RecipeError::InvalidOverride {
                    key: format!("{NAMESPACE}.extra_context.{key}"),
                    message: "context values must be strings, numbers or booleans".to_string(),
                }
                .into());
            }
        }

        Ok(Self {
            source: typed(pyproject, "source")?,
            build: typed(pyproject, "build")?,
            requirements: typed(pyproject, "requirements")?.unwrap_or_default(),
            test: pyproject.get(&format!("{NAMESPACE}.test")).cloned(),
            about: typed(pyproject, "about")?,
            extra: typed(pyproject, "extra")?,
            extra_context,
            output: typed(pyproject, "output")?,
        })
    }
}

fn typed<T: DeserializeOwned>(pyproject: &PyProject, key: &str) -> Result<Option<T>> {
    let dotted = format!("{NAMESPACE}.{key}");
    let Some(value) = pyproject.get(&dotted) else {
        return Ok(None);
    };
    value.clone().try_into::<T>().map(Some).map_err(|e| {
        RecipeError::InvalidOverride {
            key: dotted,
            message: e.to_string(),
        }
        .into()
    })
}
