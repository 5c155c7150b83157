//! Build section: script, number, entry points and skip conditions

use crate::env::DraftEnv;
use crate::rules::{first_match, Rule};
use crate::{patterns, Result};
use autorecipe_types::{BuildSection, Script};

const PIP_INSTALL: &str = "$PYTHON -m pip install . -vv --no-build-isolation";

fn script_rules() -> [Rule<str, &'static str>; 2] {
    [Rule::new("poetry", poetry_script), Rule::new("flit", flit_script)]
}

fn poetry_script(backend: &str) -> Option<&'static str> {
    backend
        .contains("poetry")
        .then_some("poetry build && $PYTHON -m pip install dist/*.whl -vv")
}

fn flit_script(backend: &str) -> Option<&'static str> {
    backend.contains("flit").then_some("$PYTHON -m flit install")
}

/// Install script for a build backend, defaulting to a pip install
#[must_use]
pub fn script_for_backend(backend: &str) -> &'static str {
    first_match(&script_rules(), backend).map_or(PIP_INSTALL, |(_, script)| script)
}

/// `py<AB` for a `>=A.B` floor and `py>=CD` for a `<C.D` ceiling
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn skip_conditions(requires_python: &str) -> Result<Vec<String>> {
    let mut skip = Vec::new();
    if let Some(caps) = patterns::get(&patterns::SKIP_MIN)?.captures(requires_python) {
        skip.push(format!("py<{}{}", &caps[1], &caps[2]));
    }
    if let Some(caps) = patterns::get(&patterns::SKIP_MAX)?.captures(requires_python) {
        skip.push(format!("py>={}{}", &caps[1], &caps[2]));
    }
    Ok(skip)
}

/// Assemble the build section; override keys win over detection
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub(crate) fn build(env: &DraftEnv<'_>) -> Result<BuildSection> {
    let project = env.project();
    let overrides = env.overrides.build.clone().unwrap_or_default();

    let script = overrides
        .script
        .unwrap_or_else(|| Script::from(script_for_backend(env.backend())));

    let entry_points = overrides.entry_points.unwrap_or_else(|| {
        project
            .scripts
            .iter()
            .map(|(name, target)| format!("{name} = {target}"))
            .collect()
    });

    let skip = match overrides.skip {
        Some(skip) => skip.into_vec(),
        None => skip_conditions(project.requires_python.as_deref().unwrap_or_default())?,
    };

    tracing::debug!(backend = env.backend(), ?skip, "build section configured");
    Ok(BuildSection {
        script,
        number: overrides.number.unwrap_or(0),
        entry_points,
        skip,
        extra: overrides.extra,
    })
}
