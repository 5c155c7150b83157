//! Fixtures for resolver unit tests

use crate::env::DraftEnv;
use crate::metadata::PyProject;
use crate::overrides::RecipeOverrides;
use crate::scm::ScmProbe;
use crate::Result;
use autorecipe_errors::PlatformError;
use autorecipe_events::{channel, AppEvent, EventReceiver, GeneralEvent};
use autorecipe_platform::{PlatformContext, ScriptedProcess};
use std::path::{Path, PathBuf};

/// Scm probe answering with a fixed result
pub struct FixedScm(pub std::result::Result<String, String>);

impl ScmProbe for FixedScm {
    fn describe_version(&self, _root: &Path) -> Result<String> {
        self.0.clone().map_err(|message| {
            PlatformError::RepositoryQueryFailed { message }.into()
        })
    }
}

pub struct Fixture {
    pub pyproject: PyProject,
    pub overrides: RecipeOverrides,
    pub root: PathBuf,
    pub recipe_dir: PathBuf,
    pub process: ScriptedProcess,
    pub scm: FixedScm,
    pub platform: PlatformContext,
    rx: EventReceiver,
}

impl Fixture {
    pub fn new(contents: &str) -> Self {
        let root = PathBuf::from("/work/demo");
        let pyproject = PyProject::parse(contents, &root.join("pyproject.toml")).unwrap();
        let overrides = RecipeOverrides::from_pyproject(&pyproject).unwrap();
        let (tx, rx) = channel();
        Self {
            pyproject,
            overrides,
            recipe_dir: root.join("recipe"),
            root,
            process: ScriptedProcess::new(),
            scm: FixedScm(Err("not a git repository".to_string())),
            platform: PlatformContext::new(Some(tx)),
            rx,
        }
    }

    pub fn with_process(mut self, process: ScriptedProcess) -> Self {
        self.process = process;
        self
    }

    pub fn with_scm(mut self, result: std::result::Result<&str, &str>) -> Self {
        self.scm = FixedScm(result.map(str::to_string).map_err(str::to_string));
        self
    }

    pub fn env(&self) -> DraftEnv<'_> {
        DraftEnv {
            pyproject: &self.pyproject,
            overrides: &self.overrides,
            project_root: &self.root,
            recipe_dir: &self.recipe_dir,
            python: "python3",
            process: &self.process,
            scm: &self.scm,
            platform: &self.platform,
        }
    }

    /// Drain warning messages emitted so far
    pub fn warnings(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let AppEvent::General(GeneralEvent::Warning { message, .. }) = event {
                warnings.push(message);
            }
        }
        warnings
    }
}
