//! Requirement buckets: build, host and run

use crate::env::DraftEnv;
use crate::marker;
use crate::overrides::NAMESPACE;
use crate::Result;
use autorecipe_errors::RecipeError;
use autorecipe_events::EventEmitter;
use autorecipe_types::{dedupe, ConditionalRequirement, Context, Requirement, RequirementsSection};
use indexmap::IndexMap;

const PIXI_BUILD_DEPENDENCIES: &str = "tool.pixi.feature.build.dependencies";
const PIXI_HOST_DEPENDENCIES: &str = "tool.pixi.host-dependencies";

/// Interpreter requirement built from the context bounds
#[must_use]
pub fn python_spec(context: &Context) -> String {
    let min = context.get_text("python_min").unwrap_or_default();
    let max = context.get_text("python_max").unwrap_or_default();
    match (min.is_empty(), max.is_empty()) {
        (false, false) => format!("python >={min},<{max}"),
        (false, true) => format!("python >={min}"),
        _ => "python".to_string(),
    }
}

/// Assemble the three buckets and store optional groups on the context
///
/// # Errors
///
/// Returns `RecipeError::InvalidOverride` when a requirements override is not
/// a list or mapping, or holds entries that are neither strings nor
/// `{if, then}` tables.
pub(crate) fn build(env: &DraftEnv<'_>, context: &mut Context) -> Result<RequirementsSection> {
    let python = python_spec(context);
    let mut section = RequirementsSection::default();

    if env.pyproject.has_table("tool.pixi") {
        section.build = lenient(
            env,
            PIXI_BUILD_DEPENDENCIES,
            env.pyproject.get(PIXI_BUILD_DEPENDENCIES),
        );
        section.host = std::iter::once(Requirement::plain(python.clone()))
            .chain(lenient(
                env,
                PIXI_HOST_DEPENDENCIES,
                env.pyproject.get(PIXI_HOST_DEPENDENCIES),
            ))
            .collect();
    } else {
        env.emit_warning(
            "Pixi configuration not found; `build` and `host` requirement sections must be provided via tool.conda.recipe.requirements",
        );
    }

    let project = env.project();
    section.run = std::iter::once(Ok(Requirement::plain(python)))
        .chain(project.dependencies.iter().map(|dep| marker::translate(dep, env)))
        .collect::<Result<_>>()?;

    let mut groups = IndexMap::new();
    for (group, members) in &project.optional_dependencies {
        let key = format!("project.optional-dependencies.{group}");
        let normalized = lenient(env, &key, Some(members));
        groups.insert(group.clone(), marker::translate_all(normalized, env)?);
    }
    context.set_optional_dependencies(groups);

    let overrides = &env.overrides.requirements;
    section.build = merge(section.build, overrides.build.as_ref(), "build", None)?;
    section.host = merge(section.host, overrides.host.as_ref(), "host", None)?;
    section.run = merge(section.run, overrides.run.as_ref(), "run", Some(env))?;
    section.extra.clone_from(&overrides.extra);

    Ok(section)
}

fn merge(
    detected: Vec<Requirement>,
    extra: Option<&toml::Value>,
    bucket: &str,
    translate_with: Option<&DraftEnv<'_>>,
) -> Result<Vec<Requirement>> {
    let Some(value) = extra else {
        return Ok(dedupe(detected));
    };

    let mut added = normalize(value, &format!("{NAMESPACE}.requirements.{bucket}"))?;
    if let Some(env) = translate_with {
        added = marker::translate_all(added, env)?;
    }
    Ok(dedupe(detected.into_iter().chain(added)))
}

/// Normalise a list or mapping of dependencies
///
/// Mapping entries `{name = spec}` become `name+spec`, with `*` or an empty
/// spec giving the bare name and table specs contributing their `version`.
/// List entries may be strings or `{if, then}` tables.
///
/// # Errors
///
/// Returns `RecipeError::InvalidOverride` naming `key` for any other shape.
pub fn normalize(value: &toml::Value, key: &str) -> Result<Vec<Requirement>> {
    match value {
        toml::Value::Table(table) => Ok(table
            .iter()
            .map(|(name, spec)| Requirement::Plain(flatten_entry(name, spec)))
            .collect()),
        toml::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| list_entry(item, &format!("{key}[{index}]")))
            .collect(),
        other => Err(invalid(
            key,
            format!("expected a list or table, found {}", other.type_str()),
        )
        .into()),
    }
}

/// Like [`normalize`], but a malformed value is reported and skipped
fn lenient(env: &DraftEnv<'_>, key: &str, value: Option<&toml::Value>) -> Vec<Requirement> {
    let Some(value) = value else {
        return Vec::new();
    };
    match normalize(value, key) {
        Ok(requirements) => requirements,
        Err(e) => {
            env.emit_warning(format!("Ignoring {key}: {e}"));
            Vec::new()
        }
    }
}

fn flatten_entry(name: &str, spec: &toml::Value) -> String {
    let spec = match spec {
        toml::Value::String(spec) => spec.trim(),
        toml::Value::Table(table) => table
            .get("version")
            .and_then(toml::Value::as_str)
            .map_or("", str::trim),
        _ => "",
    };
    if spec.is_empty() || spec == "*" {
        name.to_string()
    } else {
        format!("{name}{spec}")
    }
}

fn list_entry(item: &toml::Value, key: &str) -> Result<Requirement> {
    match item {
        toml::Value::String(spec) => Ok(Requirement::plain(spec.clone())),
        toml::Value::Table(table) => {
            let condition = table
                .get("if")
                .and_then(toml::Value::as_str)
                .ok_or_else(|| invalid(key, "conditional entries need a string `if`"))?;
            let then = match table.get("then") {
                Some(toml::Value::String(dep)) => vec![dep.clone()],
                Some(toml::Value::Array(deps)) => deps
                    .iter()
                    .map(|dep| {
                        dep.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid(key, "`then` entries must be strings"))
                    })
                    .collect::<std::result::Result<_, _>>()?,
                _ => return Err(invalid(key, "conditional entries need a `then` list").into()),
            };
            Ok(Requirement::Conditional(ConditionalRequirement {
                condition: condition.to_string(),
                then,
            }))
        }
        other => Err(invalid(key, format!("unsupported entry of type {}", other.type_str())).into()),
    }
}

fn invalid(key: &str, message: impl Into<String>) -> RecipeError {
    RecipeError::InvalidOverride {
        key: key.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use autorecipe_errors::Error;

    fn run_build(fixture: &Fixture) -> Result<(RequirementsSection, Context)> {
        let env = fixture.env();
        let mut context = crate::context::build(&env)?.context;
        let section = build(&env, &mut context)?;
        Ok((section, context))
    }

    #[test]
    fn test_python_spec_variants() {
        let mut ctx = Context::new();
        assert_eq!(python_spec(&ctx), "python");
        ctx.insert_detected("python_min", "");
        assert_eq!(python_spec(&ctx), "python");
        ctx.insert_detected("python_min", "3.9");
        assert_eq!(python_spec(&ctx), "python >=3.9");
        ctx.insert_detected("python_max", "3.13");
        assert_eq!(python_spec(&ctx), "python >=3.9,<3.13");
    }

    #[test]
    fn test_normalize_mapping() {
        let value: toml::Value = toml::from_str::<toml::Table>(
            r#"deps = { numpy = ">=1.0", scipy = "*", pip = "", rich = { version = ">=13" } }"#,
        )
        .unwrap()
        .remove("deps")
        .unwrap();
        let out = normalize(&value, "deps").unwrap();
        assert_eq!(
            out,
            vec![
                Requirement::plain("numpy>=1.0"),
                Requirement::plain("scipy"),
                Requirement::plain("pip"),
                Requirement::plain("rich>=13"),
            ]
        );
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        let err = normalize(&toml::Value::Integer(3), "tool.conda.recipe.requirements.run")
            .unwrap_err();
        assert!(matches!(err, Error::Recipe(RecipeError::InvalidOverride { .. })));

        let list = toml::Value::Array(vec![toml::Value::Boolean(true)]);
        assert!(normalize(&list, "run").is_err());
    }

    #[test]
    fn test_without_pixi() {
        let mut fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
requires-python = ">=3.9,<3.13"
dependencies = ["numpy>=1.20", "tomli; python_version < '3.11'"]
"#,
        );
        let (section, _) = run_build(&fixture).unwrap();
        assert!(section.build.is_empty());
        assert!(section.host.is_empty());
        assert_eq!(
            section.run,
            vec![
                Requirement::plain("python >=3.9,<3.13"),
                Requirement::plain("numpy>=1.20"),
                Requirement::conditional("py<311", "tomli"),
            ]
        );
        assert!(fixture.warnings()[0].starts_with("Pixi configuration not found"));
    }

    #[test]
    fn test_pixi_and_overrides() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
requires-python = ">=3.10"
dependencies = ["numpy"]

[tool.pixi.feature.build.dependencies]
hatchling = "*"

[tool.pixi.host-dependencies]
pip = ">=23"

[tool.conda.recipe.requirements]
host = ["pip>=23", "setuptools"]
run = ["numpy", "exceptiongroup; python_version < '3.11'", { if = "unix", then = ["uvloop"] }]
run_constraints = ["pandas >=2"]
"#,
        );
        let (section, _) = run_build(&fixture).unwrap();
        assert_eq!(section.build, vec![Requirement::plain("hatchling")]);
        assert_eq!(
            section.host,
            vec![
                Requirement::plain("python >=3.10"),
                Requirement::plain("pip>=23"),
                Requirement::plain("setuptools"),
            ]
        );
        assert_eq!(
            section.run,
            vec![
                Requirement::plain("python >=3.10"),
                Requirement::plain("numpy"),
                Requirement::conditional("py<311", "exceptiongroup"),
                Requirement::conditional("unix", "uvloop"),
            ]
        );
        assert!(section.extra.contains_key("run_constraints"));
    }

    #[test]
    fn test_optional_groups_stay_out_of_run() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
dependencies = []

[project.optional-dependencies]
test = ["pytest>=7", "tomli; python_version < '3.11'"]
docs = ["sphinx"]
"#,
        );
        let (section, context) = run_build(&fixture).unwrap();
        assert_eq!(section.run, vec![Requirement::plain("python")]);
        assert_eq!(
            context.optional_group("test").unwrap(),
            &[
                Requirement::plain("pytest>=7"),
                Requirement::conditional("py<311", "tomli"),
            ]
        );
        assert_eq!(context.optional_dependencies().len(), 2);
    }

    #[test]
    fn test_bad_override_is_fatal() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"

[tool.conda.recipe.requirements]
run = [{ then = ["x"] }]
"#,
        );
        let err = run_build(&fixture).unwrap_err();
        assert!(matches!(
            err,
            Error::Recipe(RecipeError::InvalidOverride { ref key, .. })
                if key == "tool.conda.recipe.requirements.run[0]"
        ));
    }
}
