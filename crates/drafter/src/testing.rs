//! Test section synthesis
//!
//! An explicit `[tool.conda.recipe.test]` value is used verbatim. Otherwise
//! imports, commands and test requirements are inferred from the declared
//! test tooling, optional dependency groups and task-runner tables.

use crate::env::DraftEnv;
use crate::{patterns, Result};
use autorecipe_types::{dedupe, Context, Requirement, SynthesizedTests, TestSection};
use indexmap::IndexSet;

const TEST_TOOLS: [&str; 3] = ["pytest", "unittest", "nose"];
const TEST_GROUPS: [&str; 2] = ["test", "testing"];
const REQUIRE_GROUPS: [&str; 3] = ["test", "testing", "dev"];

/// Task-runner tables whose `test*` entries become commands
const TASK_TABLES: [&str; 4] = [
    "tool.pixi.tasks",
    "tool.poe.tasks",
    "tool.pdm.scripts",
    "tool.taskipy.tasks",
];

/// Build the test section, or `None` when nothing could be inferred
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub(crate) fn build(env: &DraftEnv<'_>, context: &Context) -> Result<Option<TestSection>> {
    if let Some(explicit) = &env.overrides.test {
        if is_empty_value(explicit) {
            tracing::debug!("explicit test section is empty; omitting it");
            return Ok(None);
        }
        return Ok(Some(TestSection::Explicit(explicit.clone())));
    }

    let tests = SynthesizedTests {
        imports: imports(env, context)?,
        commands: commands(env, context)?,
        requires: requires(context),
    };
    tracing::debug!(
        imports = tests.imports.len(),
        commands = tests.commands.len(),
        requires = tests.requires.len(),
        "test section synthesized"
    );

    Ok((!tests.is_empty()).then_some(TestSection::Synthesized(tests)))
}

fn is_empty_value(value: &toml::Value) -> bool {
    match value {
        toml::Value::Table(table) => table.is_empty(),
        toml::Value::Array(items) => items.is_empty(),
        toml::Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Importable module name for a distribution name
#[must_use]
pub fn module_name(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}

/// Distribution name at the start of a requirement string
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn requirement_name(spec: &str) -> Result<Option<String>> {
    Ok(patterns::get(&patterns::REQUIREMENT_NAME)?
        .captures(spec)
        .map(|caps| caps[1].to_string()))
}

fn is_tool(name: &str, tool: &str) -> bool {
    name.to_lowercase().starts_with(tool)
}

fn imports(env: &DraftEnv<'_>, context: &Context) -> Result<Vec<String>> {
    let mut imports = IndexSet::new();
    if let Some(name) = env.project().name.as_deref() {
        imports.insert(module_name(name));
    }

    let direct = env.project().dependencies.iter().map(String::as_str);
    let grouped = TEST_GROUPS
        .iter()
        .filter_map(|group| context.optional_group(group))
        .flat_map(specs);
    for spec in direct.chain(grouped) {
        if let Some(name) = requirement_name(spec)? {
            if TEST_TOOLS.iter().any(|tool| is_tool(&name, tool)) {
                imports.insert(module_name(&name));
            }
        }
    }
    Ok(imports.into_iter().collect())
}

fn commands(env: &DraftEnv<'_>, context: &Context) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let direct = env.project().dependencies.iter().map(String::as_str);
    let grouped = context
        .optional_dependencies()
        .values()
        .flat_map(|group| specs(group));
    for spec in direct.chain(grouped) {
        names.extend(requirement_name(spec)?);
    }
    let uses = |tool: &str| names.iter().any(|name| is_tool(name, tool));

    let mut commands = IndexSet::new();
    if uses("pytest") || env.pyproject.has_table("tool.pytest") {
        commands.insert("python -m pytest".to_string());
    } else if uses("unittest") {
        commands.insert("python -m unittest discover".to_string());
    }

    commands.extend(
        env.project()
            .scripts
            .keys()
            .filter(|name| name.contains("test"))
            .cloned(),
    );

    if let Some(toml::Value::Table(envs)) = env.pyproject.get("tool.hatch.envs") {
        for hatch_env in envs.values() {
            if let Some(toml::Value::Table(scripts)) = hatch_env.get("scripts") {
                commands.extend(task_commands(scripts));
            }
        }
    }
    for dotted in TASK_TABLES {
        if let Some(toml::Value::Table(tasks)) = env.pyproject.get(dotted) {
            commands.extend(task_commands(tasks));
        }
    }

    Ok(commands.into_iter().collect())
}

/// Command lines of every `test*` entry in a task table
///
/// Entries may be a string, a list of strings, or a table carrying `cmd`
/// or `shell`.
fn task_commands(tasks: &toml::Table) -> Vec<String> {
    tasks
        .iter()
        .filter(|(name, _)| name.starts_with("test"))
        .flat_map(|(_, task)| match task {
            toml::Value::String(cmd) => vec![cmd.clone()],
            toml::Value::Array(steps) => steps
                .iter()
                .filter_map(toml::Value::as_str)
                .map(str::to_string)
                .collect(),
            toml::Value::Table(table) => ["cmd", "shell"]
                .iter()
                .find_map(|key| table.get(*key))
                .map(|cmd| match cmd {
                    toml::Value::Array(parts) => parts
                        .iter()
                        .filter_map(toml::Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" "),
                    other => other.as_str().unwrap_or_default().to_string(),
                })
                .filter(|cmd| !cmd.is_empty())
                .into_iter()
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}

fn requires(context: &Context) -> Vec<Requirement> {
    dedupe(
        REQUIRE_GROUPS
            .iter()
            .filter_map(|group| context.optional_group(group))
            .flat_map(|group| group.iter().cloned()),
    )
}

/// Every dependency string in a group, including conditional ones
fn specs(group: &[Requirement]) -> impl Iterator<Item = &str> {
    group.iter().flat_map(|requirement| match requirement {
        Requirement::Plain(spec) => std::slice::from_ref(spec).iter(),
        Requirement::Conditional(conditional) => conditional.then.iter(),
    })
    .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    fn synthesize(fixture: &Fixture) -> Option<TestSection> {
        let env = fixture.env();
        let mut context = crate::context::build(&env).unwrap().context;
        crate::requirements::build(&env, &mut context).unwrap();
        build(&env, &context).unwrap()
    }

    fn synthesized(fixture: &Fixture) -> SynthesizedTests {
        match synthesize(fixture) {
            Some(TestSection::Synthesized(tests)) => tests,
            other => panic!("expected synthesized tests, got {other:?}"),
        }
    }

    #[test]
    fn test_requirement_name() {
        assert_eq!(requirement_name("pytest-cov>=4").unwrap().as_deref(), Some("pytest-cov"));
        assert_eq!(requirement_name("  numpy").unwrap().as_deref(), Some("numpy"));
        assert_eq!(requirement_name(">=1").unwrap(), None);
    }

    #[test]
    fn test_empty_explicit_test_section_is_omitted() {
        for table in ["[tool.conda.recipe.test]\n", "[tool.conda.recipe]\ntest = []\n"] {
            let fixture = Fixture::new(&format!(
                "[project]\nname = \"demo\"\nversion = \"1.0\"\ndependencies = [\"pytest\"]\n\n{table}"
            ));
            assert!(synthesize(&fixture).is_none(), "table: {table}");
        }
    }

    #[test]
    fn test_explicit_test_section_is_verbatim() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
dependencies = ["pytest"]

[[tool.conda.recipe.test]]
python = { imports = ["demo"] }
"#,
        );
        let Some(TestSection::Explicit(value)) = synthesize(&fixture) else {
            panic!("expected explicit test section");
        };
        assert!(value.is_array());
    }

    #[test]
    fn test_pytest_from_groups() {
        let fixture = Fixture::new(
            r#"
[project]
name = "My-Pkg"
version = "1.0"
dependencies = ["requests"]

[project.optional-dependencies]
test = ["pytest>=7", "pytest-cov", "hypothesis"]
dev = ["ruff", "pytest>=7"]

[project.scripts]
my-pkg = "my_pkg:main"
my-pkg-selftest = "my_pkg:selftest"
"#,
        );
        let tests = synthesized(&fixture);
        assert_eq!(tests.imports, vec!["my_pkg", "pytest", "pytest_cov"]);
        assert_eq!(tests.commands, vec!["python -m pytest", "my-pkg-selftest"]);
        assert_eq!(
            tests.requires,
            vec![
                Requirement::plain("pytest>=7"),
                Requirement::plain("pytest-cov"),
                Requirement::plain("hypothesis"),
                Requirement::plain("ruff"),
            ]
        );
    }

    #[test]
    fn test_pytest_table_and_task_runners() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"

[tool.pytest.ini_options]
addopts = "-q"

[tool.hatch.envs.default.scripts]
test = "pytest tests"
lint = "ruff check"

[tool.pixi.tasks]
test-fast = { cmd = "pytest -x" }
build = "hatch build"

[tool.poe.tasks]
test = ["pytest", "mypy demo"]

[tool.taskipy.tasks]
test = "pytest tests"
"#,
        );
        let tests = synthesized(&fixture);
        assert_eq!(tests.imports, vec!["demo"]);
        assert_eq!(
            tests.commands,
            vec!["python -m pytest", "pytest tests", "pytest -x", "pytest", "mypy demo"]
        );
        assert!(tests.requires.is_empty());
    }

    #[test]
    fn test_unittest_fallback() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
dependencies = ["unittest-xml-reporting"]
"#,
        );
        let tests = synthesized(&fixture);
        assert_eq!(tests.commands, vec!["python -m unittest discover"]);
        assert_eq!(tests.imports, vec!["demo", "unittest_xml_reporting"]);
    }

    #[test]
    fn test_nameless_project_without_tooling_has_no_section() {
        let fixture = Fixture::new("[project]\nversion = \"1.0\"\n");
        assert!(synthesize(&fixture).is_none());
    }
}
