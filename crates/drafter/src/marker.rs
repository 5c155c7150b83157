//! Environment marker to selector translation

use crate::{patterns, Result};
use autorecipe_events::EventEmitter;
use autorecipe_types::Requirement;

/// Translate one dependency string
///
/// `dep; python_version < "3.11"` becomes `{if: py<311, then: [dep]}` and
/// `>=` becomes `py>=`. Any other marker keeps the dependency unconditional
/// and emits a warning. Strings without `;` pass through unchanged.
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn translate<E: EventEmitter + ?Sized>(dependency: &str, events: &E) -> Result<Requirement> {
    let Some((name, marker)) = dependency.split_once(';') else {
        return Ok(Requirement::plain(dependency));
    };
    let name = name.trim();
    let marker = marker.trim();

    if let Some(selector) = python_version_selector(marker)? {
        return Ok(Requirement::conditional(selector, name));
    }

    events.emit_warning(format!(
        "Unsupported environment marker '{marker}' for dependency '{name}', including unconditionally"
    ));
    Ok(Requirement::plain(name))
}

/// Translate every entry, preserving order
///
/// # Errors
///
/// Returns an internal error only if a built-in pattern fails to compile.
pub fn translate_all<E: EventEmitter + ?Sized>(
    dependencies: impl IntoIterator<Item = Requirement>,
    events: &E,
) -> Result<Vec<Requirement>> {
    dependencies
        .into_iter()
        .map(|requirement| match requirement {
            Requirement::Plain(spec) => translate(&spec, events),
            conditional @ Requirement::Conditional(_) => Ok(conditional),
        })
        .collect()
}

/// `py<XY` / `py>=XY` for a supported `python_version` comparison
fn python_version_selector(marker: &str) -> Result<Option<String>> {
    let Some(caps) = patterns::get(&patterns::PYTHON_VERSION_MARKER)?.captures(marker) else {
        return Ok(None);
    };

    let major = caps.get(2).or_else(|| caps.get(4));
    let minor = caps.get(3).or_else(|| caps.get(5));
    Ok(match (major, minor) {
        (Some(major), Some(minor)) => Some(format!(
            "py{}{}{}",
            &caps[1],
            major.as_str(),
            minor.as_str()
        )),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorecipe_events::{channel, AppEvent, GeneralEvent};

    #[test]
    fn test_less_than_marker() {
        let (tx, _rx) = channel();
        assert_eq!(
            translate("tomli; python_version < '3.11'", &tx).unwrap(),
            Requirement::conditional("py<311", "tomli")
        );
        assert_eq!(
            translate("tomli>=1.1 ;python_version<\"3.11\"", &tx).unwrap(),
            Requirement::conditional("py<311", "tomli>=1.1")
        );
    }

    #[test]
    fn test_greater_equal_marker() {
        let (tx, _rx) = channel();
        assert_eq!(
            translate("typing-extensions; python_version >= \"3.12\"", &tx).unwrap(),
            Requirement::conditional("py>=312", "typing-extensions")
        );
    }

    #[test]
    fn test_no_marker_passes_through() {
        let (tx, mut rx) = channel();
        assert_eq!(
            translate("numpy >=1.20", &tx).unwrap(),
            Requirement::plain("numpy >=1.20")
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unsupported_marker_warns() {
        let (tx, mut rx) = channel();
        let out = translate("pywin32; sys_platform == 'win32'", &tx).unwrap();
        assert_eq!(out, Requirement::plain("pywin32"));

        let Ok(AppEvent::General(GeneralEvent::Warning { message, .. })) = rx.try_recv() else {
            panic!("expected a warning");
        };
        assert_eq!(
            message,
            "Unsupported environment marker 'sys_platform == 'win32'' for dependency 'pywin32', including unconditionally"
        );
    }

    #[test]
    fn test_other_comparisons_are_unsupported() {
        let (tx, mut rx) = channel();
        assert_eq!(
            translate("foo; python_version <= '3.9'", &tx).unwrap(),
            Requirement::plain("foo")
        );
        assert_eq!(
            translate("bar; python_version < '3.11' and os_name == 'nt'", &tx).unwrap(),
            Requirement::plain("bar")
        );
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_mismatched_quotes_are_unsupported() {
        let (tx, _rx) = channel();
        assert_eq!(
            translate("foo; python_version < '3.11\"", &tx).unwrap(),
            Requirement::plain("foo")
        );
    }
}
