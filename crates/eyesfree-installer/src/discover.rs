//! Package discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{InstallError, InstallResult};

/// Lists the package files directly inside `dir`, in directory-listing order.
///
/// Subdirectories are skipped, not descended into. The listing is not sorted:
/// packages are installed in whatever order the filesystem returns them.
/// Symlinks to files count as files; entries that cannot be inspected, such
/// as dangling symlinks, are skipped so the rest of the batch still runs.
/// When `extension` is given, only files with that extension (compared
/// case-insensitively, without the dot) are returned.
pub fn discover_packages(dir: &Path, extension: Option<&str>) -> InstallResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(InstallError::SourceDirMissing {
            path: dir.to_path_buf(),
        });
    }

    let wanted = extension.map(|e| e.trim_start_matches('.').to_ascii_lowercase());
    let mut packages = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(InstallError::ReadDirFailed {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            Err(_) => continue,
        };

        // Follows symlinks; false when the target is missing.
        if !entry.path().is_file() {
            continue;
        }

        if let Some(ref wanted) = wanted {
            let matches = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
            if !matches {
                continue;
            }
        }

        packages.push(entry.into_path());
    }

    Ok(packages)
}
