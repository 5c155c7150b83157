//! rattler-build recipe document model
//!
//! Sections serialize in declaration order, which is the order rattler-build
//! users expect to read them in. Optional sections are skipped entirely.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Context, Requirement};

/// Complete recipe document
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDocument {
    pub context: Context,
    pub package: PackageSection,
    pub source: SourceSpec,
    pub build: BuildSection,
    pub requirements: RequirementsSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<TestSection>,
    pub about: AboutSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<toml::Table>,
}

/// Package identity, always expressed through context variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,
}

impl PackageSection {
    /// `${{ name }}` / `${{ version }}`
    #[must_use]
    pub fn templated() -> Self {
        Self {
            name: "${{ name }}".to_string(),
            version: "${{ version }}".to_string(),
        }
    }
}

impl Default for PackageSection {
    fn default() -> Self {
        Self::templated()
    }
}

/// Where the build fetches sources from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceSpec {
    /// Local checkout, relative to the recipe directory
    Path { path: String },
    /// Git repository with an optional tag or branch
    Git {
        git: String,
        #[serde(flatten)]
        reference: Option<GitReference>,
    },
    /// Archive download
    Url { url: String },
    /// User-provided source table, emitted as written
    Explicit(toml::Table),
}

impl SourceSpec {
    /// Short label for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path { .. } => "path",
            Self::Git { .. } => "git",
            Self::Url { .. } => "url",
            Self::Explicit(_) => "explicit",
        }
    }
}

/// Revision selector for a git source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GitReference {
    Tag(String),
    Branch(String),
}

/// Build script for the recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Inline(String),
    Lines(Vec<String>),
    Detailed(toml::Table),
}

impl From<&str> for Script {
    fn from(script: &str) -> Self {
        Self::Inline(script.to_string())
    }
}

/// Build section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSection {
    pub script: Script,
    pub number: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,
    /// Keys from the override table with no dedicated field
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// Build, host, and run dependency buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequirementsSection {
    pub build: Vec<Requirement>,
    pub host: Vec<Requirement>,
    pub run: Vec<Requirement>,
    /// Other requirement keys such as `run_constraints`, copied from overrides
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// Test section, either inferred or copied from the override table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TestSection {
    Synthesized(SynthesizedTests),
    Explicit(toml::Value),
}

/// Inferred test configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesizedTests {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
}

impl SynthesizedTests {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.commands.is_empty() && self.requires.is_empty()
    }
}

/// One license file or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LicenseFile {
    Single(String),
    Multiple(Vec<String>),
}

/// About section
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AboutSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_file: Option<LicenseFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_source_flattens_reference() {
        let source = SourceSpec::Git {
            git: "https://github.com/acme/widgets".to_string(),
            reference: Some(GitReference::Tag("v1.0.0".to_string())),
        };
        let value: serde_yml::Value = serde_yml::to_value(&source).unwrap();
        assert_eq!(value["git"], "https://github.com/acme/widgets");
        assert_eq!(value["tag"], "v1.0.0");

        let bare = SourceSpec::Git {
            git: "https://github.com/acme/widgets".to_string(),
            reference: None,
        };
        let yaml = serde_yml::to_string(&bare).unwrap();
        assert_eq!(yaml.trim(), "git: https://github.com/acme/widgets");
    }

    #[test]
    fn test_build_section_skips_empty_lists() {
        let build = BuildSection {
            script: Script::from("$PYTHON -m pip install . -vv --no-build-isolation"),
            number: 0,
            entry_points: Vec::new(),
            skip: vec!["py<39".to_string()],
            extra: IndexMap::new(),
        };
        let value: serde_yml::Value = serde_yml::to_value(&build).unwrap();
        assert!(value.get("entry_points").is_none());
        assert_eq!(value["skip"][0], "py<39");
        assert_eq!(value["number"], 0);
    }

    #[test]
    fn test_package_section_is_templated() {
        let package = PackageSection::default();
        assert_eq!(package.name, "${{ name }}");
        assert_eq!(package.version, "${{ version }}");
    }
}
