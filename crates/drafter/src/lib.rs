#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Recipe drafter for autorecipe
//!
//! Reads a `pyproject.toml`, applies the `[tool.conda.recipe]` overrides and
//! auto-detection heuristics, and produces a rattler-build `recipe.yaml`.
//! Warnings are reported through the event channel; nothing is printed.

mod about;
mod assemble;
mod build;
mod context;
mod env;
mod marker;
mod metadata;
mod overrides;
mod patterns;
mod requirements;
mod rules;
mod scm;
mod source;
mod testing;
mod version;
mod yaml;

#[cfg(test)]
mod test_support;

pub use about::sniff_license;
pub use build::{script_for_backend, skip_conditions};
pub use context::{normalize_name, python_bounds};
pub use marker::{translate, translate_all};
pub use metadata::{toml_get, License, ProjectMetadata, PyProject};
pub use overrides::{RecipeOverrides, NAMESPACE};
pub use requirements::{normalize, python_spec};
pub use scm::{guess_next_dev, GitScmProbe, ScmProbe};
pub use source::{canonical_git_url, pypi_sdist_url, relative_path};
pub use testing::{module_name, requirement_name};
pub use version::{VersionOutcome, VERSION_PLACEHOLDER};
pub use yaml::{backup_path, render, write};

use autorecipe_errors::Error;
use autorecipe_events::EventSender;
use autorecipe_platform::{PlatformContext, ProcessOperations, SystemProcess};
use autorecipe_types::RecipeDocument;
use env::DraftEnv;
use std::path::{Path, PathBuf};

/// Type alias for results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Recipe location used when nothing else names one, relative to the project
pub const DEFAULT_OUTPUT: &str = "recipe/recipe.yaml";

/// One recipe generation request
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Path to `pyproject.toml`
    pub input: PathBuf,
    /// Output path given on the command line
    pub output: Option<PathBuf>,
    /// Output path from the user configuration
    pub configured_output: Option<PathBuf>,
    /// Replace an existing recipe instead of backing it up
    pub overwrite: bool,
}

/// Outcome of a successful generation
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub backup: Option<PathBuf>,
    pub document: RecipeDocument,
}

/// Main drafter struct
pub struct Drafter {
    python: String,
    process: Box<dyn ProcessOperations>,
    scm: Box<dyn ScmProbe>,
    platform: PlatformContext,
}

impl Default for Drafter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drafter {
    /// Create a drafter that runs real tools and queries git through libgit2
    #[must_use]
    pub fn new() -> Self {
        Self {
            python: autorecipe_types::DEFAULT_PYTHON.to_string(),
            process: Box::new(SystemProcess),
            scm: Box::new(GitScmProbe),
            platform: PlatformContext::default(),
        }
    }

    /// Interpreter for `python -m setuptools_scm` and `python -m hatch`
    #[must_use]
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    #[must_use]
    pub fn with_process(mut self, process: Box<dyn ProcessOperations>) -> Self {
        self.process = process;
        self
    }

    #[must_use]
    pub fn with_scm(mut self, scm: Box<dyn ScmProbe>) -> Self {
        self.scm = scm;
        self
    }

    /// Set event sender for warnings and progress
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.platform = PlatformContext::new(Some(tx));
        self
    }

    /// Assemble the recipe for a loaded project
    ///
    /// `recipe_dir` is the directory the recipe will be written to; a local
    /// path source is expressed relative to it.
    ///
    /// # Errors
    ///
    /// Returns an error if an override table has unusable values or the
    /// version is neither declared nor dynamic.
    pub fn draft(&self, pyproject: &PyProject, recipe_dir: &Path) -> Result<RecipeDocument> {
        let overrides = RecipeOverrides::from_pyproject(pyproject)?;
        let project_root = pyproject.project_root();
        let env = DraftEnv {
            pyproject,
            overrides: &overrides,
            project_root: &project_root,
            recipe_dir,
            python: &self.python,
            process: self.process.as_ref(),
            scm: self.scm.as_ref(),
            platform: &self.platform,
        };
        assemble::assemble(&env)
    }

    /// Load, draft and write a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing or malformed, drafting fails,
    /// or the recipe cannot be written.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateReport> {
        let pyproject = PyProject::load(&request.input)?;
        let overrides = RecipeOverrides::from_pyproject(&pyproject)?;
        let output = output_path(request, &pyproject, &overrides);
        let recipe_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let document = self.draft(&pyproject, &recipe_dir)?;
        let yaml = render(&document)?;
        let backup = write(&yaml, &output, request.overwrite, &self.platform)?;

        Ok(GenerateReport {
            output,
            backup,
            document,
        })
    }
}

/// Pick the output path
///
/// Command line first, then `[tool.conda.recipe.output].path` relative to
/// the project, then the user configuration, then [`DEFAULT_OUTPUT`] inside
/// the project.
fn output_path(request: &GenerateRequest, pyproject: &PyProject, overrides: &RecipeOverrides) -> PathBuf {
    if let Some(path) = &request.output {
        return path.clone();
    }
    if let Some(path) = overrides.output.as_ref().and_then(|o| o.path.as_ref()) {
        return pyproject.project_root().join(path);
    }
    if let Some(path) = &request.configured_output {
        return path.clone();
    }
    pyproject.project_root().join(DEFAULT_OUTPUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyproject(contents: &str) -> PyProject {
        PyProject::parse(contents, Path::new("/work/demo/pyproject.toml")).unwrap()
    }

    #[test]
    fn test_output_precedence() {
        let with_table = pyproject(
            "[project]\nname = \"demo\"\n\n[tool.conda.recipe.output]\npath = \"conda/recipe.yaml\"\n",
        );
        let plain = pyproject("[project]\nname = \"demo\"\n");
        let overrides = |p: &PyProject| RecipeOverrides::from_pyproject(p).unwrap();

        let cli = GenerateRequest {
            output: Some(PathBuf::from("out/r.yaml")),
            configured_output: Some(PathBuf::from("cfg/r.yaml")),
            ..GenerateRequest::default()
        };
        assert_eq!(
            output_path(&cli, &with_table, &overrides(&with_table)),
            PathBuf::from("out/r.yaml")
        );

        let configured = GenerateRequest {
            configured_output: Some(PathBuf::from("cfg/r.yaml")),
            ..GenerateRequest::default()
        };
        assert_eq!(
            output_path(&configured, &with_table, &overrides(&with_table)),
            PathBuf::from("/work/demo/conda/recipe.yaml")
        );
        assert_eq!(
            output_path(&configured, &plain, &overrides(&plain)),
            PathBuf::from("cfg/r.yaml")
        );
        assert_eq!(
            output_path(&GenerateRequest::default(), &plain, &overrides(&plain)),
            PathBuf::from("/work/demo/recipe/recipe.yaml")
        );
    }
}
