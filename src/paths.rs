// Where string tables live on disk:
// `<root>/sources/<project>/Translations.bundle/<locale>.lproj/<file>`.

use crate::config::Locale;
use crate::error::SyncError;
use std::path::{Path, PathBuf};

pub fn bundle_dir(root: &Path, project: &str, locale_dir: &str) -> PathBuf {
    root.join("sources")
        .join(project)
        .join("Translations.bundle")
        .join(format!("{locale_dir}.lproj"))
}

pub fn resource_path(root: &Path, project: &str, locale_dir: &str, file_name: &str) -> PathBuf {
    bundle_dir(root, project, locale_dir).join(file_name)
}

/// Destination for a downloaded translation.
///
/// Uses the full locale directory when it exists, otherwise the
/// language-only one. Nothing beyond those two candidates is searched.
pub fn resolve_destination(
    root: &Path,
    project: &str,
    locale: &Locale,
    file_name: &str,
) -> Result<PathBuf, SyncError> {
    let full = bundle_dir(root, project, locale.as_str());
    if full.is_dir() {
        return Ok(full.join(file_name));
    }

    let mut tried = vec![full];
    if locale.has_region() {
        let language = bundle_dir(root, project, locale.language());
        if language.is_dir() {
            return Ok(language.join(file_name));
        }
        tried.push(language);
    }

    Err(SyncError::MissingLocaleDirectory {
        locale: locale.to_string(),
        tried,
    })
}
