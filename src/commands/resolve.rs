use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{Config, Side};
use crate::error::PatchMergeError;
use crate::merge::{self, ConflictResolver, Resolved};
use crate::resolver;
use crate::scan;
use crate::stage;

/// Flags given on the command line; unset ones fall back to the config.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub paths: Vec<PathBuf>,
    pub prefer: Option<Side>,
    pub no_stage: bool,
    pub dry_run: bool,
}

/// Execute `patchmerge resolve`.
pub fn run(opts: ResolveOptions) -> Result<(), PatchMergeError> {
    let config = Config::discover(&std::env::current_dir()?)?;
    let paths = if opts.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        opts.paths.clone()
    };

    let files = scan::find_conflicted_patches(&paths, &config)?;
    if files.is_empty() {
        println!("No conflicted patch files found.");
        return Ok(());
    }

    let strategy = opts.prefer.map_or(config.strategy, Into::into);
    let stage_files = config.stage && !opts.no_stage && !opts.dry_run;
    let mut resolver = resolver::for_strategy(strategy);
    info!(%strategy, stage = stage_files, files = files.len(), "resolving patch files");

    // Keep stdout clean for the merged text in dry-run mode.
    let say = |msg: String| {
        if opts.dry_run {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    };

    let mut failed = 0;
    for file in &files {
        say(format!("Resolving conflicts in file {}", file.display()));

        let resolved = match resolve_file(file, resolver.as_mut(), opts.dry_run) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Could not resolve conflicts in file {}: {e}", file.display());
                failed += 1;
                continue;
            }
        };

        if opts.dry_run {
            // Same separator as head(1) so several merged patches stay apart.
            if files.len() > 1 {
                println!("==> {} <==", file.display());
            }
            print!("{}", resolved.text);
        }

        if stage_files {
            if let Err(e) = stage::stage_file(&config.git, file) {
                warn!(error = %e, "staging failed");
                eprintln!("warning: {e}");
            }
        }

        say(format!(
            "Resolved conflicts in file {} ({} conflict(s), {} duplicate(s))",
            file.display(),
            resolved.conflicts,
            resolved.duplicates,
        ));
    }

    if failed > 0 {
        return Err(PatchMergeError::Unresolved {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// Resolve one file and write the result back unless `dry_run` is set.
///
/// The file is only written after the whole merge succeeded.
pub fn resolve_file(
    path: &Path,
    resolver: &mut dyn ConflictResolver,
    dry_run: bool,
) -> Result<Resolved, PatchMergeError> {
    let content = fs::read_to_string(path)?;
    let resolved = merge::resolve_patch_text(&content, resolver)?;

    info!(
        path = %path.display(),
        hunks = resolved.hunks,
        conflicts = resolved.conflicts,
        duplicates = resolved.duplicates,
        "merged patch"
    );

    if !dry_run {
        fs::write(path, &resolved.text)?;
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::Choice;
    use crate::resolver::FixedResolver;

    const CONFLICTED: &str = "\
--- a/f
+++ b/f
<<<<<<< ours
@@ -3,1 +3,1 @@
-x
+ours
=======
@@ -3,1 +3,1 @@
-x
+theirs
>>>>>>> theirs
";

    #[test]
    fn test_resolve_file_writes_result() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("0001.patch");
        fs::write(&path, CONFLICTED).unwrap();

        let resolved =
            resolve_file(&path, &mut FixedResolver(Choice::PreferSecond), false).unwrap();
        assert_eq!(resolved.conflicts, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "--- a/f\n+++ b/f\n@@ -3,1 +3,1 @@\n-x\n+theirs\n"
        );
    }

    #[test]
    fn test_abort_leaves_file_untouched() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("0001.patch");
        fs::write(&path, CONFLICTED).unwrap();

        let err = resolve_file(&path, &mut FixedResolver(Choice::Abort), false).unwrap_err();
        assert!(matches!(err, PatchMergeError::ResolutionAborted(1)));
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFLICTED);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("0001.patch");
        fs::write(&path, CONFLICTED).unwrap();

        let resolved =
            resolve_file(&path, &mut FixedResolver(Choice::PreferFirst), true).unwrap();
        assert!(resolved.text.contains("+ours\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFLICTED);
    }
}
