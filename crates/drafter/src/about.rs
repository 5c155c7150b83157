//! About section

use crate::env::DraftEnv;
use crate::metadata::License;
use autorecipe_types::{AboutSection, LicenseFile};
use std::path::Path;

/// Identify a license from the text of a license file
#[must_use]
pub fn sniff_license(content: &str) -> Option<&'static str> {
    let content = content.to_lowercase();
    let has = |needle: &str| content.contains(needle);

    if has("mit license") {
        Some("MIT")
    } else if has("apache license") && has("version 2.0") {
        Some("Apache-2.0")
    } else if has("bsd license") {
        Some("BSD-3-Clause")
    } else if has("gnu general public license") && has("version 3") {
        Some("GPL-3.0")
    } else if has("gnu general public license") && has("version 2") {
        Some("GPL-2.0")
    } else {
        None
    }
}

/// Final path component, or the input when it has none
fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

/// Build the about section from project metadata and overrides
pub(crate) fn build(env: &DraftEnv<'_>) -> AboutSection {
    let project = env.project();
    let urls = project.urls_normalized();
    let url = |label: &str| urls.get(label).map(|url| (*url).to_string());

    let (license, mut license_file) = match &project.license {
        Some(License::Expression(expression)) => (Some(expression.clone()), None),
        Some(License::Text { text }) => (Some(text.clone()), None),
        Some(License::File { file }) => {
            let sniffed = std::fs::read_to_string(env.project_root.join(file))
                .ok()
                .and_then(|content| sniff_license(&content))
                .map(str::to_string);
            if sniffed.is_none() {
                tracing::debug!(file = %file, "license type not recognised");
            }
            (sniffed, Some(LicenseFile::Single(file.clone())))
        }
        None => (None, None),
    };

    if let Some(files) = &project.license_files {
        license_file = Some(match files {
            LicenseFile::Single(file) => LicenseFile::Multiple(vec![file.clone()]),
            LicenseFile::Multiple(files) => LicenseFile::Multiple(files.clone()),
        });
    }
    let license_file = license_file.map(|files| match files {
        LicenseFile::Single(file) => LicenseFile::Single(file_name(&file)),
        LicenseFile::Multiple(files) => {
            LicenseFile::Multiple(files.iter().map(|file| file_name(file)).collect())
        }
    });

    let mut about = AboutSection {
        summary: project.description.clone(),
        license,
        license_file,
        homepage: url("homepage").or_else(|| url("repository")),
        documentation: url("documentation"),
        repository: url("repository"),
        extra: indexmap::IndexMap::new(),
    };

    if let Some(overrides) = env.overrides.about.clone() {
        let replace = |slot: &mut Option<String>, value: Option<String>| {
            if value.is_some() {
                *slot = value;
            }
        };
        replace(&mut about.summary, overrides.summary);
        replace(&mut about.license, overrides.license);
        replace(&mut about.homepage, overrides.homepage);
        replace(&mut about.documentation, overrides.documentation);
        replace(&mut about.repository, overrides.repository);
        if overrides.license_file.is_some() {
            about.license_file = overrides.license_file;
        }
        about.extra = overrides.extra;
    }

    about
}
