//! Dependency entries as they appear in a recipe's requirement buckets

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A single entry in a requirements bucket
///
/// Plain entries are match specs such as `numpy >=1.20`. Conditional entries
/// render as `{if: <selector>, then: [...]}` and are only active when the
/// selector holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    Plain(String),
    Conditional(ConditionalRequirement),
}

/// Selector-guarded group of dependencies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionalRequirement {
    #[serde(rename = "if")]
    pub condition: String,
    pub then: Vec<String>,
}

impl Requirement {
    /// Create a plain requirement
    pub fn plain(spec: impl Into<String>) -> Self {
        Self::Plain(spec.into())
    }

    /// Create a conditional requirement guarding a single dependency
    pub fn conditional(condition: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::Conditional(ConditionalRequirement {
            condition: condition.into(),
            then: vec![dependency.into()],
        })
    }

    /// The plain match spec, if this is not a conditional entry
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(spec) => Some(spec),
            Self::Conditional(_) => None,
        }
    }

    #[must_use]
    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::Conditional(_))
    }
}

impl From<&str> for Requirement {
    fn from(spec: &str) -> Self {
        Self::Plain(spec.to_string())
    }
}

impl From<String> for Requirement {
    fn from(spec: String) -> Self {
        Self::Plain(spec)
    }
}

/// Remove repeated plain entries, keeping the first occurrence
///
/// Conditional entries are passed through untouched, even when two of them
/// are structurally identical.
#[must_use]
pub fn dedupe(requirements: impl IntoIterator<Item = Requirement>) -> Vec<Requirement> {
    let mut seen = IndexSet::new();
    requirements
        .into_iter()
        .filter(|requirement| match requirement {
            Requirement::Plain(spec) => seen.insert(spec.clone()),
            Requirement::Conditional(_) => true,
        })
        .collect()
}
