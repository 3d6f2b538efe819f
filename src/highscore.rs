use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// One integer in one text file. No schema, no versioning.
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreStore { path: path.into() }
    }

    /// A missing, empty or unparsable file means no prior high score.
    /// This is never reported as an error.
    pub fn load(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| contents.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn save(&self, score: u32) -> Result<()> {
        fs::write(&self.path, format!("{}\n", score))
            .with_context(|| format!("writing high score to {}", self.path.display()))
    }
}
