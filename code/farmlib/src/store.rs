use crate::types::SavedInsight;
use std::fs;
use std::path::PathBuf;

// Persists the saved advisory snapshots as one json blob, the only state
// that survives a restart. Reads fail open: missing or malformed data is an
// empty list plus a log diagnostic, never an error shown to the user.
pub struct InsightStore {
    path: PathBuf,
}

impl InsightStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Vec<SavedInsight> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return vec![],
            Err(err) => {
                log::error!("Failed to read insights from {}: {err}", self.path.display());
                return vec![];
            }
        };
        match serde_json::from_str(&text) {
            Ok(insights) => insights,
            Err(err) => {
                log::error!(
                    "Failed to parse insights from {}: {err}",
                    self.path.display()
                );
                vec![]
            }
        }
    }

    pub fn save(&self, insights: &[SavedInsight]) -> anyhow::Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(insights)?)?;
        Ok(())
    }
}
