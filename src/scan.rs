use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::conflict;
use crate::error::PatchMergeError;

/// A patch file that still contains conflict markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictedPatch {
    pub path: PathBuf,
    pub regions: usize,
}

/// Collect the patch files to work on.
///
/// Files named explicitly are always returned. Directories are walked for
/// files with a configured patch extension that contain conflict markers.
pub fn find_conflicted_patches(
    paths: &[PathBuf],
    config: &Config,
) -> Result<Vec<PathBuf>, PatchMergeError> {
    let mut found = BTreeSet::new();

    for path in paths {
        if path.is_dir() {
            for patch in walk_conflicted(path, config)? {
                found.insert(patch.path);
            }
        } else {
            found.insert(path.clone());
        }
    }

    Ok(found.into_iter().collect())
}

/// Conflicted patch files under `root`, with their number of conflict regions.
pub fn walk_conflicted(root: &Path, config: &Config) -> Result<Vec<ConflictedPatch>, PatchMergeError> {
    let mut out = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(anyhow::Error::from)?;
        if !entry.file_type().is_file() || !config.is_patch_file(entry.path()) {
            continue;
        }

        let content = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let regions = conflict::count_conflict_regions(&content);
        if regions > 0 {
            out.push(ConflictedPatch {
                path: entry.into_path(),
                regions,
            });
        }
    }

    Ok(out)
}
