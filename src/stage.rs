use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::PatchMergeError;

/// Mark a resolved file as merged with `git add`.
///
/// Runs in the file's own directory so the file is found in whichever
/// repository contains it.
pub fn stage_file(git: &str, path: &Path) -> Result<(), PatchMergeError> {
    let stage_err = |reason: String| PatchMergeError::Stage {
        path: path.to_path_buf(),
        reason,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| stage_err("not a file path".into()))?;

    let mut cmd = Command::new(git);
    cmd.args(["add", "--"]).arg(file_name).stdout(Stdio::null());
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .map_err(|e| stage_err(format!("failed to run {git}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(stage_err(stderr.trim().to_string()));
    }

    Ok(())
}
