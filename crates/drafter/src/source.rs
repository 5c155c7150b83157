//! Source location resolution
//!
//! Priority order: explicit override, a repository on a known git host, the
//! PyPI sdist, a downloadable archive, and finally the local checkout.

use crate::env::DraftEnv;
use crate::rules::{first_match, Rule};
use crate::version::VersionOutcome;
use crate::{patterns, Result};
use autorecipe_events::EventEmitter;
use autorecipe_types::{Context, GitReference, SourceSpec};
use std::path::{Component, Path, PathBuf};

const GIT_HOSTS: [&str; 6] = [
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "codeberg.org",
    "git.sr.ht",
    "gitea.com",
];

const ARCHIVE_SUFFIXES: [&str; 5] = [".tar.gz", ".tar.bz2", ".tar.xz", ".zip", ".whl"];

const DEFAULT_BRANCHES: [&str; 3] = ["main", "master", "HEAD"];

/// Inputs for source selection
pub(crate) struct SourceInput<'a, 'e> {
    pub env: &'a DraftEnv<'e>,
    pub context: &'a Context,
    pub version: &'a VersionOutcome,
}

fn rules<'a, 'e>() -> [Rule<SourceInput<'a, 'e>, SourceSpec>; 5] {
    [
        Rule::new("explicit", from_override),
        Rule::new("git", from_git_host),
        Rule::new("pypi", from_pypi),
        Rule::new("archive", from_archive_url),
        Rule::new("path", from_local_path),
    ]
}

/// Pick the recipe source; never fails
pub(crate) fn resolve(input: &SourceInput<'_, '_>) -> SourceSpec {
    first_match(&rules(), input).map_or_else(
        || local_path(input.env),
        |(rule, source)| {
            tracing::debug!(rule, kind = source.kind(), "source selected");
            source
        },
    )
}

fn from_override(input: &SourceInput<'_, '_>) -> Option<SourceSpec> {
    input.env.overrides.source.clone().map(SourceSpec::Explicit)
}

fn from_git_host(input: &SourceInput<'_, '_>) -> Option<SourceSpec> {
    let env = input.env;
    let git = env
        .project()
        .urls
        .values()
        .find_map(|url| canonical_git_url(url).ok().flatten())?;

    let reference = lookup_reference(env);
    Some(SourceSpec::Git { git, reference })
}

/// Nearest tag, else a non-default branch
fn lookup_reference(env: &DraftEnv<'_>) -> Option<GitReference> {
    match env.run_tool("git", &["describe", "--tags", "--abbrev=0"]) {
        Ok(tag) => return Some(GitReference::Tag(tag)),
        Err(reason) => tracing::debug!(%reason, "no reachable tag"),
    }

    match env.run_tool("git", &["rev-parse", "--abbrev-ref", "HEAD"]) {
        Ok(branch) if DEFAULT_BRANCHES.contains(&branch.as_str()) => None,
        Ok(branch) => Some(GitReference::Branch(branch)),
        Err(reason) => {
            env.emit_warning(format!("Could not determine git ref: {reason}"));
            None
        }
    }
}

/// An explicit context version is used literally; a detected dynamic one is
/// left to the recipe's `${{ version }}`
fn from_pypi(input: &SourceInput<'_, '_>) -> Option<SourceSpec> {
    let context = input.context;
    let name = context.get_text("name").filter(|n| !n.is_empty())?;
    let version = if context.is_explicit("version") {
        context.get_text("version").filter(|v| !v.is_empty())?
    } else if !input.version.is_known() {
        return None;
    } else if input.version.is_dynamic() {
        "${{ version }}".to_string()
    } else {
        context.get_text("version")?
    };
    Some(SourceSpec::Url {
        url: pypi_sdist_url(&name, &version)?,
    })
}

fn from_archive_url(input: &SourceInput<'_, '_>) -> Option<SourceSpec> {
    input
        .env
        .project()
        .urls
        .values()
        .find(|url| {
            let lower = url.to_lowercase();
            ARCHIVE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
        })
        .map(|url| SourceSpec::Url { url: url.clone() })
}

fn from_local_path(input: &SourceInput<'_, '_>) -> Option<SourceSpec> {
    Some(local_path(input.env))
}

fn local_path(env: &DraftEnv<'_>) -> SourceSpec {
    SourceSpec::Path {
        path: relative_path(env.recipe_dir, env.project_root),
    }
}

/// `https://pypi.org/packages/source/<n>/<name>/<name_underscored>-<version>.tar.gz`
#[must_use]
pub fn pypi_sdist_url(name: &str, version: &str) -> Option<String> {
    let first = name.chars().next()?;
    Some(format!(
        "https://pypi.org/packages/source/{first}/{name}/{}-{version}.tar.gz",
        name.replace('-', "_")
    ))
}

/// Canonical `https://host/owner/repo` for a URL on a git host
///
/// SSH remotes (`git@host:owner/repo.git`, `ssh://git@host:port/owner/repo`)
/// are accepted for any host; web URLs only for the known hosting services.
/// GitLab paths keep their subgroups.
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn canonical_git_url(url: &str) -> Result<Option<String>> {
    let url = url.trim();

    for pattern in [&patterns::SSH_URL, &patterns::SCP_URL] {
        if let Some(caps) = patterns::get(pattern)?.captures(url) {
            let host = caps[1].to_lowercase();
            return Ok(repo_path(&caps[2], true).map(|path| format!("https://{host}/{path}")));
        }
    }

    let Some((_, rest)) = url.split_once("://") else {
        return Ok(None);
    };
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if !GIT_HOSTS.contains(&host) {
        return Ok(None);
    }

    Ok(repo_path(path, host == "gitlab.com").map(|path| format!("https://{host}/{path}")))
}

/// Repository path with any `.git` suffix removed
///
/// Nested paths run up to GitLab's `/-/` separator; otherwise only
/// `owner/repo` is kept.
fn repo_path(path: &str, nested: bool) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = path.split('/').filter(|s| !s.is_empty());
    let mut kept: Vec<&str> = if nested {
        segments.take_while(|s| *s != "-").collect()
    } else {
        segments.take(2).collect()
    };
    let repo = kept.pop()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if kept.is_empty() || repo.is_empty() {
        return None;
    }
    kept.push(repo);
    Some(kept.join("/"))
}

/// Path of `to` as seen from directory `from`, using `..` where needed
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> String {
    let (Ok(from), Ok(to)) = (std::path::absolute(from), std::path::absolute(to)) else {
        return to.display().to_string();
    };
    let from = lexical(&from);
    let to = lexical(&to);

    let common = from
        .components()
        .zip(to.components())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return to.display().to_string();
    }

    let mut relative = PathBuf::new();
    for _ in from.components().skip(common) {
        relative.push("..");
    }
    for component in to.components().skip(common) {
        relative.push(component);
    }

    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    }
}

/// Resolve `.` and `..` without touching the filesystem
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use autorecipe_platform::ScriptedProcess;

    fn resolve_for(fixture: &Fixture) -> SourceSpec {
        let env = fixture.env();
        let outcome = crate::context::build(&env).unwrap();
        resolve(&SourceInput {
            env: &env,
            context: &outcome.context,
            version: &outcome.version,
        })
    }

    #[test]
    fn test_canonical_git_urls() {
        let cases = [
            ("https://github.com/Acme/widgets", Some("https://github.com/Acme/widgets")),
            ("https://GitHub.com/acme/widgets.git", Some("https://github.com/acme/widgets")),
            ("https://gitlab.com/acme/widgets/-/tree/main", Some("https://gitlab.com/acme/widgets")),
            ("https://www.github.com/acme/widgets/", Some("https://github.com/acme/widgets")),
            ("git@github.com:acme/widgets.git", Some("https://github.com/acme/widgets")),
            ("ssh://git@git.example.org/acme/widgets.git", Some("https://git.example.org/acme/widgets")),
            ("https://git.sr.ht/~acme/widgets", Some("https://git.sr.ht/~acme/widgets")),
            ("ssh://git@git.example.org:2222/acme/widgets.git", Some("https://git.example.org/acme/widgets")),
            ("git@gitlab.com:group/sub/widgets.git", Some("https://gitlab.com/group/sub/widgets")),
            ("https://gitlab.com/group/sub/widgets", Some("https://gitlab.com/group/sub/widgets")),
            ("https://gitlab.com/group/sub/widgets/-/issues", Some("https://gitlab.com/group/sub/widgets")),
            ("https://github.com/acme/widgets/tree/main/docs", Some("https://github.com/acme/widgets")),
            ("https://example.com/acme/widgets", None),
            ("https://github.com/acme", None),
            ("not a url", None),
        ];
        for (input, expected) in cases {
            assert_eq!(
                canonical_git_url(input).unwrap().as_deref(),
                expected,
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_pypi_url() {
        assert_eq!(
            pypi_sdist_url("my-pkg", "1.2.3").as_deref(),
            Some("https://pypi.org/packages/source/m/my-pkg/my_pkg-1.2.3.tar.gz")
        );
        assert!(pypi_sdist_url("", "1.0").is_none());
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(Path::new("/a/b/recipe"), Path::new("/a/b")), "..");
        assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b")), ".");
        assert_eq!(
            relative_path(Path::new("/a/x/y"), Path::new("/a/b")),
            "../../b"
        );
        assert_eq!(
            relative_path(Path::new("/a/b/./recipe/../recipe"), Path::new("/a/b")),
            ".."
        );
    }

    #[test]
    fn test_override_beats_git_url() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
urls = { Repository = "https://github.com/acme/demo" }

[tool.conda.recipe.source]
url = "https://example.com/demo-1.0.tar.gz"
sha256 = "abc"
"#,
        );
        let source = resolve_for(&fixture);
        let SourceSpec::Explicit(table) = source else {
            panic!("expected explicit source, got {source:?}");
        };
        assert_eq!(table.get("sha256").and_then(toml::Value::as_str), Some("abc"));
        assert!(fixture.process.invocations().is_empty());
    }

    #[test]
    fn test_git_source_with_tag() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
urls = { Homepage = "https://demo.dev", Source = "git@github.com:acme/demo.git" }
"#,
        )
        .with_process(ScriptedProcess::new().with_success("git describe --tags --abbrev=0", "v1.0\n"));
        assert_eq!(
            resolve_for(&fixture),
            SourceSpec::Git {
                git: "https://github.com/acme/demo".to_string(),
                reference: Some(GitReference::Tag("v1.0".to_string())),
            }
        );
    }

    #[test]
    fn test_git_branch_rules() {
        let contents = r#"
[project]
name = "demo"
version = "1.0"
urls = { Repository = "https://github.com/acme/demo" }
"#;
        for (branch, expected) in [
            ("main", None),
            ("master", None),
            ("HEAD", None),
            ("feature/x", Some(GitReference::Branch("feature/x".to_string()))),
        ] {
            let fixture = Fixture::new(contents).with_process(
                ScriptedProcess::new()
                    .with_output("git describe --tags --abbrev=0", Some(128), "")
                    .with_success("git rev-parse --abbrev-ref HEAD", branch),
            );
            let SourceSpec::Git { reference, .. } = resolve_for(&fixture) else {
                panic!("expected git source");
            };
            assert_eq!(reference, expected, "branch {branch}");
        }
    }

    #[test]
    fn test_git_lookup_failure_warns() {
        let mut fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"
urls = { Repository = "https://codeberg.org/acme/demo" }
"#,
        );
        let source = resolve_for(&fixture);
        assert!(matches!(source, SourceSpec::Git { reference: None, .. }));
        assert!(fixture
            .warnings()
            .iter()
            .any(|w| w.starts_with("Could not determine git ref")));
    }

    #[test]
    fn test_pypi_source_static_and_dynamic() {
        let fixture = Fixture::new("[project]\nname = \"My-Pkg\"\nversion = \"1.2.3\"\n");
        assert_eq!(
            resolve_for(&fixture),
            SourceSpec::Url {
                url: "https://pypi.org/packages/source/m/my-pkg/my_pkg-1.2.3.tar.gz".to_string()
            }
        );

        let fixture = Fixture::new(
            r#"
[build-system]
build-backend = "hatchling.build"

[project]
name = "my-pkg"
dynamic = ["version"]
"#,
        )
        .with_process(ScriptedProcess::new().with_success("python3 -m hatch version", "0.3.0"));
        assert_eq!(
            resolve_for(&fixture),
            SourceSpec::Url {
                url: "https://pypi.org/packages/source/m/my-pkg/my_pkg-${{ version }}.tar.gz"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_pypi_source_uses_explicit_context_version() {
        let fixture = Fixture::new(
            r#"
[project]
name = "demo"
version = "1.0"

[tool.conda.recipe.extra_context]
version = "2.0"
"#,
        );
        assert_eq!(
            resolve_for(&fixture),
            SourceSpec::Url {
                url: "https://pypi.org/packages/source/d/demo/demo-2.0.tar.gz".to_string()
            }
        );

        let dynamic = Fixture::new(
            r#"
[project]
name = "demo"
dynamic = ["version"]

[tool.conda.recipe.extra_context]
version = "2.1"
"#,
        );
        assert_eq!(
            resolve_for(&dynamic),
            SourceSpec::Url {
                url: "https://pypi.org/packages/source/d/demo/demo-2.1.tar.gz".to_string()
            }
        );
    }

    #[test]
    fn test_placeholder_version_falls_to_archive_then_path() {
        let with_archive = Fixture::new(
            r#"
[project]
name = "demo"
dynamic = ["version"]
urls = { Download = "https://example.com/dl/demo-latest.tar.gz" }
"#,
        );
        assert_eq!(
            resolve_for(&with_archive),
            SourceSpec::Url {
                url: "https://example.com/dl/demo-latest.tar.gz".to_string()
            }
        );

        let bare = Fixture::new("[project]\nname = \"demo\"\ndynamic = [\"version\"]\n");
        assert_eq!(
            resolve_for(&bare),
            SourceSpec::Path {
                path: "..".to_string()
            }
        );
    }
}
