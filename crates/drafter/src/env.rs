//! Shared inputs for one drafting run

use crate::metadata::{ProjectMetadata, PyProject};
use crate::overrides::RecipeOverrides;
use crate::scm::ScmProbe;
use autorecipe_errors::UserFacingError;
use autorecipe_events::{EventEmitter, EventSender};
use autorecipe_platform::{PlatformContext, ProcessOperations};
use std::path::Path;

/// Everything a resolver may read, plus the warning channel
pub(crate) struct DraftEnv<'a> {
    pub pyproject: &'a PyProject,
    pub overrides: &'a RecipeOverrides,
    pub project_root: &'a Path,
    pub recipe_dir: &'a Path,
    pub python: &'a str,
    pub process: &'a dyn ProcessOperations,
    pub scm: &'a dyn ScmProbe,
    pub platform: &'a PlatformContext,
}

impl DraftEnv<'_> {
    pub fn project(&self) -> &ProjectMetadata {
        self.pyproject.project()
    }

    pub fn backend(&self) -> &str {
        self.pyproject.build_backend()
    }

    /// Run a tool in the project root and return its trimmed stdout
    ///
    /// A spawn failure, a non-zero exit, or empty output is reported as an
    /// `Err` carrying a one-line description.
    pub fn run_tool(&self, program: &str, args: &[&str]) -> Result<String, String> {
        let mut cmd = self.process.create_command(program);
        cmd.args(args).current_dir(self.project_root);

        let output = self
            .process
            .execute_command(self.platform, &cmd)
            .map_err(|e| e.user_message().into_owned())?;

        if !output.success() {
            let status = output
                .status
                .map_or_else(|| "signal".to_string(), |code| code.to_string());
            let stderr = output.stderr_trimmed();
            return Err(if stderr.is_empty() {
                format!("exited with status {status}")
            } else {
                format!("exited with status {status}: {stderr}")
            });
        }

        let stdout = output.stdout_trimmed();
        if stdout.is_empty() {
            return Err("printed nothing".to_string());
        }
        Ok(stdout)
    }
}

impl EventEmitter for DraftEnv<'_> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.platform.event_sender()
    }
}
