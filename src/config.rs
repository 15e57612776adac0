use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PatchMergeError;

/// Name of the per-project config file, searched for from the current
/// directory upwards.
pub const CONFIG_FILE: &str = ".patchmerge.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_stage")]
    pub stage: bool,
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// How conflicting hunks are decided.
///
/// "A" and "B" follow the prompt's labels: hunk A is the one with the smaller
/// source start (side A's on a tie), not necessarily the edit from the
/// `<<<<<<<` branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Ask on the terminal for every conflict.
    #[default]
    Prompt,
    /// Always keep hunk A, the one that sorts first by source line.
    A,
    /// Always keep hunk B, the one that sorts second by source line.
    B,
}

/// Hunk picked by `--prefer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Side {
    /// Keep the hunk that sorts first by source line
    A,
    /// Keep the hunk that sorts second by source line
    B,
}

impl From<Side> for Strategy {
    fn from(side: Side) -> Self {
        match side {
            Side::A => Strategy::A,
            Side::B => Strategy::B,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Prompt => write!(f, "prompt"),
            Strategy::A => write!(f, "a"),
            Strategy::B => write!(f, "b"),
        }
    }
}

fn default_stage() -> bool {
    true
}
fn default_git() -> String {
    "git".into()
}
fn default_extensions() -> Vec<String> {
    vec!["patch".into(), "diff".into()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            stage: default_stage(),
            git: default_git(),
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, PatchMergeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PatchMergeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Write config to a YAML file.
    pub fn save(&self, path: &Path) -> Result<(), PatchMergeError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find and load the config that applies to `start`.
    ///
    /// Looks for `.patchmerge.yml` in `start` and its ancestors, then for
    /// `patchmerge/config.yml` in the user config directory. Falls back to
    /// defaults when neither exists.
    pub fn discover(start: &Path) -> Result<Self, PatchMergeError> {
        match find_config_file(start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Whether `path` has one of the configured patch extensions.
    pub fn is_patch_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|d| d.join("patchmerge").join("config.yml"))
        .filter(|p| p.is_file())
}
