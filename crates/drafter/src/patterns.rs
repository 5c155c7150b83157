//! Compiled regular expressions shared by the resolvers

use crate::Result;
use autorecipe_errors::Error;
use regex::Regex;
use std::sync::LazyLock;

type Pattern = LazyLock<std::result::Result<Regex, regex::Error>>;

/// First version after `>=`, `>` or `~=`
pub static PYTHON_MIN: Pattern = LazyLock::new(|| Regex::new(r"[>~]=?\s*([0-9]+(?:\.[0-9]+)*)"));

/// First version after `<`
pub static PYTHON_MAX: Pattern = LazyLock::new(|| Regex::new(r"<\s*([0-9]+(?:\.[0-9]+)*)"));

/// Major and minor after `>=`
pub static SKIP_MIN: Pattern = LazyLock::new(|| Regex::new(r">=\s*(\d+)\.(\d+)"));

/// Major and minor after `<`
pub static SKIP_MAX: Pattern = LazyLock::new(|| Regex::new(r"<\s*(\d+)\.(\d+)"));

/// `python_version < "3.11"` / `python_version >= '3.8'`
pub static PYTHON_VERSION_MARKER: Pattern = LazyLock::new(|| {
    Regex::new(r#"^python_version\s*(<|>=)\s*(?:"(\d+)\.(\d+)"|'(\d+)\.(\d+)')$"#)
});

/// `ssh://git@host[:port]/owner/repo`
pub static SSH_URL: Pattern = LazyLock::new(|| {
    Regex::new(r"^ssh://[A-Za-z0-9._-]+@([A-Za-z0-9.-]+)(?::\d+)?/(.+)$")
});

/// `git@host:owner/repo(.git)`
pub static SCP_URL: Pattern =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+@([A-Za-z0-9.-]+):(.+)$"));

/// `git describe --tags --long` output
pub static DESCRIBE: Pattern =
    LazyLock::new(|| Regex::new(r"^(.+)-(\d+)-g([0-9a-f]+)$"));

/// A release version made of dot-separated integers
pub static RELEASE: Pattern = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*$"));

/// Distribution name at the start of a requirement string
pub static REQUIREMENT_NAME: Pattern =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)"));

/// Access a compiled pattern
///
/// # Errors
///
/// Returns an internal error if the pattern failed to compile.
pub fn get(pattern: &'static Pattern) -> Result<&'static Regex> {
    pattern
        .as_ref()
        .map_err(|e| Error::internal(format!("invalid built-in pattern: {e}")))
}
