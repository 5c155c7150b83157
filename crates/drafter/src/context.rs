//! Context section: name, version and interpreter bounds

use crate::env::DraftEnv;
use crate::version::{self, VersionOutcome};
use crate::{patterns, Result};
use autorecipe_events::EventEmitter;
use autorecipe_types::Context;

/// Context plus how its version was obtained
#[derive(Debug, Clone)]
pub(crate) struct ContextOutcome {
    pub context: Context,
    pub version: VersionOutcome,
}

/// Build the context from project metadata and `extra_context`
///
/// # Errors
///
/// Propagates a missing-version error from the version resolver.
pub(crate) fn build(env: &DraftEnv<'_>) -> Result<ContextOutcome> {
    let project = env.project();
    let version = version::resolve(env)?;

    let mut context = Context::new();
    match project.name.as_deref() {
        Some(name) => {
            context.insert_detected("name", normalize_name(name));
        }
        None => env.emit_warning("project.name is not set; the context has no name"),
    }
    context.insert_detected("version", version.as_str());

    let (python_min, python_max) =
        python_bounds(project.requires_python.as_deref().unwrap_or_default())?;
    context.insert_detected("python_min", python_min.unwrap_or_default());
    if let Some(max) = python_max {
        context.insert_detected("python_max", max);
    }

    for (key, value) in &env.overrides.extra_context {
        context.insert_explicit(key.clone(), value.clone());
    }

    tracing::debug!(keys = ?context.keys().collect::<Vec<_>>(), "context built");
    Ok(ContextOutcome { context, version })
}

/// Lowercase with spaces replaced by hyphens
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Lower and upper interpreter bounds from a `requires-python` range
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn python_bounds(requires_python: &str) -> Result<(Option<String>, Option<String>)> {
    let min = patterns::get(&patterns::PYTHON_MIN)?
        .captures(requires_python)
        .map(|caps| caps[1].to_string());
    let max = patterns::get(&patterns::PYTHON_MAX)?
        .captures(requires_python)
        .map(|caps| caps[1].to_string());
    Ok((min, max))
}
