use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchMergeError {
    #[error("patch headers differ between the two sides")]
    HeaderMismatch,

    #[error("merge aborted at conflict #{0}")]
    ResolutionAborted(usize),

    #[error("side {side} contains no hunk headers")]
    NotAPatch { side: char },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("failed to stage {path}: {reason}")]
    Stage { path: PathBuf, reason: String },

    #[error("{failed} of {total} file(s) could not be resolved")]
    Unresolved { failed: usize, total: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
