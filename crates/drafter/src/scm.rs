//! In-process source control version query
//!
//! Mirrors the default `setuptools_scm` scheme: an exact tag is the version,
//! and commits past a tag give the next patch release as a dev build.

use crate::{patterns, Result};
use autorecipe_errors::PlatformError;
use git2::{DescribeFormatOptions, DescribeOptions, Repository};
use std::path::Path;

/// Version lookup from repository metadata
pub trait ScmProbe: Send + Sync {
    /// Derive a version for the checkout containing `root`
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not inside a repository, the repository
    /// has no reachable tag, or the tag is not a release number.
    fn describe_version(&self, root: &Path) -> Result<String>;
}

/// `git describe` through libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct GitScmProbe;

impl ScmProbe for GitScmProbe {
    fn describe_version(&self, root: &Path) -> Result<String> {
        let repo = Repository::discover(root).map_err(query_failed)?;

        let mut options = DescribeOptions::new();
        options.describe_tags();
        let describe = repo.describe(&options).map_err(query_failed)?;

        let mut format = DescribeFormatOptions::new();
        format.always_use_long_format(true).abbreviated_size(7);
        let described = describe.format(Some(&format)).map_err(query_failed)?;

        tracing::debug!(described = %described, "git describe");
        guess_next_dev(&described)
    }
}

fn query_failed(err: git2::Error) -> autorecipe_errors::Error {
    PlatformError::RepositoryQueryFailed {
        message: err.message().to_string(),
    }
    .into()
}

/// Turn long-format describe output (`v1.2.3-4-gabc1234`) into a version
///
/// # Errors
///
/// Returns an error if the output is not in long format or the tag is not a
/// dotted release number.
pub fn guess_next_dev(described: &str) -> Result<String> {
    let caps = patterns::get(&patterns::DESCRIBE)?
        .captures(described.trim())
        .ok_or_else(|| PlatformError::RepositoryQueryFailed {
            message: format!("unexpected describe output: {described}"),
        })?;

    let tag = &caps[1];
    let release = tag.strip_prefix(['v', 'V']).unwrap_or(tag);
    if !patterns::get(&patterns::RELEASE)?.is_match(release) {
        return Err(PlatformError::RepositoryQueryFailed {
            message: format!("tag {tag} is not a release version"),
        }
        .into());
    }

    let distance: u64 = caps[2].parse().map_err(|_| PlatformError::RepositoryQueryFailed {
        message: format!("bad commit distance in {described}"),
    })?;
    if distance == 0 {
        return Ok(release.to_string());
    }

    let mut parts: Vec<u64> = release
        .split('.')
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| PlatformError::RepositoryQueryFailed {
            message: format!("tag {tag} is not a release version"),
        })?;
    if let Some(last) = parts.last_mut() {
        *last += 1;
    }
    let next = parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".");

    Ok(format!("{next}.dev{distance}+g{}", &caps[3]))
}
