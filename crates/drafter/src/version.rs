//! Version resolution
//!
//! A static `project.version` is used as-is. A dynamic version is asked of
//! the build backend's tooling, falling back to an environment placeholder
//! that rattler-build expands at build time.

use crate::env::DraftEnv;
use crate::rules::{first_match, Rule};
use crate::Result;
use autorecipe_errors::{RecipeError, UserFacingError};
use autorecipe_events::{AppEvent, EventEmitter, RecipeEvent};

/// Rendered when no strategy can produce a version
pub const VERSION_PLACEHOLDER: &str = "${{ env.get('PYPROJECT_VERSION', default='0.1.0') }}";

/// How the context version was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// `project.version`
    Static(String),
    /// A dynamic version produced by a backend strategy
    Resolved {
        strategy: &'static str,
        version: String,
    },
    /// Every strategy failed
    Placeholder,
}

impl VersionOutcome {
    /// The value written to the context
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(version) | Self::Resolved { version, .. } => version,
            Self::Placeholder => VERSION_PLACEHOLDER,
        }
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Static(_))
    }

    /// Whether the version is a real value rather than the placeholder
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Placeholder)
    }
}

/// Resolve the project's version
///
/// # Errors
///
/// Returns `RecipeError::MissingVersion` when the version is neither declared
/// nor listed in `project.dynamic`.
pub(crate) fn resolve(env: &DraftEnv<'_>) -> Result<VersionOutcome> {
    let project = env.project();
    if project.is_dynamic("version") {
        if project.version.is_some() {
            env.emit_warning("Version is marked as dynamic but also present in project table");
        }
        return Ok(resolve_dynamic(env));
    }

    match project.version.as_deref().map(str::trim) {
        Some(version) if !version.is_empty() => Ok(VersionOutcome::Static(version.to_string())),
        _ => Err(RecipeError::MissingVersion.into()),
    }
}

fn strategies<'a>() -> [Rule<DraftEnv<'a>, String>; 3] {
    [
        Rule::new("setuptools_scm", from_setuptools_scm),
        Rule::new("hatch", from_hatch),
        Rule::new("poetry", from_poetry),
    ]
}

/// Run the backend fallback chain; never fails
pub(crate) fn resolve_dynamic(env: &DraftEnv<'_>) -> VersionOutcome {
    if let Some((strategy, version)) = first_match(&strategies(), env) {
        env.emit(AppEvent::Recipe(RecipeEvent::VersionResolved {
            strategy: strategy.to_string(),
            version: version.clone(),
        }));
        return VersionOutcome::Resolved { strategy, version };
    }

    env.emit_warning("Could not resolve dynamic version, using environment variable placeholder");
    env.emit(AppEvent::Recipe(RecipeEvent::VersionPlaceholder {
        placeholder: VERSION_PLACEHOLDER.to_string(),
    }));
    VersionOutcome::Placeholder
}

fn uses_setuptools_scm(env: &DraftEnv<'_>) -> bool {
    let backend = env.backend();
    backend.contains("setuptools_scm")
        || backend.contains("setuptools-scm")
        || env.pyproject.has_table("tool.setuptools_scm")
}

fn from_setuptools_scm(env: &DraftEnv<'_>) -> Option<String> {
    if !uses_setuptools_scm(env) {
        return None;
    }

    match env.scm.describe_version(env.project_root) {
        Ok(version) => return Some(version),
        Err(e) => env.emit_warning(format!(
            "setuptools_scm in-process query failed: {}",
            e.user_message()
        )),
    }

    env.emit_warning("setuptools_scm not available in-process, trying command line");
    run_version_tool(env, env.python, &["-m", "setuptools_scm"])
}

fn from_hatch(env: &DraftEnv<'_>) -> Option<String> {
    let backend = env.backend();
    if !(backend.contains("hatchling") || backend.contains("hatch")) {
        return None;
    }
    run_version_tool(env, env.python, &["-m", "hatch", "version"])
}

fn from_poetry(env: &DraftEnv<'_>) -> Option<String> {
    if !env.backend().contains("poetry") {
        return None;
    }
    run_version_tool(env, "poetry", &["version", "-s"])
}

fn run_version_tool(env: &DraftEnv<'_>, program: &str, args: &[&str]) -> Option<String> {
    match env.run_tool(program, args) {
        Ok(version) => Some(version),
        Err(reason) => {
            env.emit_warning(format!("`{program} {}` failed: {reason}", args.join(" ")));
            None
        }
    }
}
