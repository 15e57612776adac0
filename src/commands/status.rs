use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::config::Config;
use crate::conflict;
use crate::error::PatchMergeError;
use crate::scan::{self, ConflictedPatch};

/// Execute `patchmerge status`: list patch files that still have conflicts.
pub fn run(paths: &[PathBuf]) -> Result<(), PatchMergeError> {
    let config = Config::discover(&std::env::current_dir()?)?;
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };

    let mut found: Vec<ConflictedPatch> = Vec::new();
    for path in &paths {
        if path.is_dir() {
            found.extend(scan::walk_conflicted(path, &config)?);
        } else {
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot read file");
                    eprintln!("Could not read {}: {e}", path.display());
                    continue;
                }
            };
            let regions = conflict::count_conflict_regions(&content);
            if regions > 0 {
                found.push(ConflictedPatch {
                    path: path.clone(),
                    regions,
                });
            }
        }
    }

    if found.is_empty() {
        println!("No conflicted patch files found.");
        return Ok(());
    }

    println!("=== Conflicted patches ===");
    for patch in &found {
        let label = if patch.regions == 1 { "region" } else { "regions" };
        println!("  {} ({} {label})", patch.path.display(), patch.regions);
    }
    println!("\nRun `patchmerge resolve` to merge them.");

    Ok(())
}
