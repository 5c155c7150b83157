//! Recipe assembly
//!
//! Runs the section resolvers in dependency order and collects their output
//! into one document: context, package, source, build, requirements, test,
//! about, extra.

use crate::context::{self, ContextOutcome};
use crate::env::DraftEnv;
use crate::source::{self, SourceInput};
use crate::{about, build, requirements, testing, Result};
use autorecipe_events::{AppEvent, EventEmitter, RecipeEvent};
use autorecipe_types::{PackageSection, RecipeDocument};

const OPERATION: &str = "draft recipe";

/// Assemble the full recipe document
///
/// # Errors
///
/// Returns the first fatal resolver error: a missing version or an override
/// table with unusable values.
pub(crate) fn assemble(env: &DraftEnv<'_>) -> Result<RecipeDocument> {
    env.emit_operation_started(OPERATION);
    let document = sections(env);
    match &document {
        Ok(_) => env.emit_operation_completed(OPERATION),
        Err(e) => env.emit_operation_failed(OPERATION, e.to_string()),
    }
    document
}

fn sections(env: &DraftEnv<'_>) -> Result<RecipeDocument> {
    env.emit(AppEvent::Recipe(RecipeEvent::MetadataLoaded {
        path: env.pyproject.path().to_path_buf(),
        name: env.project().name.clone().unwrap_or_default(),
    }));

    let ContextOutcome {
        mut context,
        version,
    } = context::build(env)?;
    env.emit_section_generated("context");
    env.emit_section_generated("package");

    let source = source::resolve(&SourceInput {
        env,
        context: &context,
        version: &version,
    });
    env.emit_section_generated("source");

    let build = build::build(env)?;
    env.emit_section_generated("build");

    let requirements = requirements::build(env, &mut context)?;
    env.emit_section_generated("requirements");

    let test = testing::build(env, &context)?;
    if test.is_some() {
        env.emit_section_generated("test");
    }

    let about = about::build(env);
    env.emit_section_generated("about");

    let extra = env.overrides.extra.clone().filter(|extra| !extra.is_empty());
    if extra.is_some() {
        env.emit_section_generated("extra");
    }

    Ok(RecipeDocument {
        context,
        package: PackageSection::templated(),
        source,
        build,
        requirements,
        test,
        about,
        extra,
    })
}
