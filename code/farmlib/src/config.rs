use serde;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Model identifier used when the config doesn't name one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

// Default location of the persisted advisory snapshots.
pub const DEFAULT_INSIGHTS_PATH: &str = "smartfarm_insights.json";

// Optional toml-file configuration for the dashboard. Everything has a
// reasonable default so a missing file is fine.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, Default)]
pub struct FarmConfig {
    pub name: Option<String>,
    // Text-generation model identifier passed to the advisory service.
    pub model: Option<String>,
    // Where saved advisory snapshots are written.
    pub insights_path: Option<String>,
    // Overrides the built-in prompt template.
    pub prompt_template: Option<String>,
}

impl FarmConfig {
    pub fn new_with_reasonable_defaults() -> Self {
        Self {
            name: Some("smartfarm".into()),
            model: Some(DEFAULT_MODEL.into()),
            insights_path: Some(DEFAULT_INSIGHTS_PATH.into()),
            prompt_template: None,
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    // Missing or unreadable config falls back to defaults with a diagnostic;
    // a config file that exists but doesn't parse is a hard error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::new_with_reasonable_defaults());
        }
        Self::from_file(path)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("smartfarm")
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn insights_path(&self) -> &str {
        self.insights_path.as_deref().unwrap_or(DEFAULT_INSIGHTS_PATH)
    }
}

// Three-state update value used when editing configuration over the wire.
// The problem being solved: a change request must be able to set a field,
// clear it, or leave it alone, and Option can only express two of those.
//
// serde is configured such that json is deserialized with these rules:
// - json field has a value -> Update::Set
// - json field is null -> Update::Clear
// - json field is not present -> Update::NoChange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Update<T> {
    #[serde(rename = "value")]
    Set(T),
    #[serde(rename = "null")]
    Clear,
    #[serde(skip)]
    #[default]
    NoChange,
}

impl<T> Update<T> {
    pub fn is_no_change(&self) -> bool {
        matches!(self, Update::NoChange)
    }
}
