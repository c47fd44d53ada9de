//! Update policy and run configuration.
//!
//! All knobs the engine consults are carried explicitly by [`UpdateOptions`]
//! and handed to the reconciler at construction; there is no ambient
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Secondary variant axis distinguishing the two namespace-mapping
/// conventions for the same underlying catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    Classic,
    Unified,
}

impl ApiStyle {
    pub fn as_str(&self) -> &str {
        match self {
            ApiStyle::Classic => "classic",
            ApiStyle::Unified => "unified",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "classic" => Some(ApiStyle::Classic),
            "unified" => Some(ApiStyle::Unified),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            ApiStyle::Classic => ApiStyle::Unified,
            ApiStyle::Unified => ApiStyle::Classic,
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of run this is: a plain single-style run, or one half of a
/// classic/unified pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    #[default]
    Single,
    Classic,
    Unified,
}

impl RunKind {
    /// The API style this run updates, if it is style-scoped.
    pub fn style(&self) -> Option<ApiStyle> {
        match self {
            RunKind::Single => None,
            RunKind::Classic => Some(ApiStyle::Classic),
            RunKind::Unified => Some(ApiStyle::Unified),
        }
    }
}

/// Policy flags for one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Delete members absent from every framework of the run.
    #[serde(default)]
    pub delete_stale: bool,
    /// Never remove or demote anything, regardless of other flags.
    #[serde(default)]
    pub preserve: bool,
    /// Single-style run, or the classic/unified half of a cross-style pair.
    #[serde(default)]
    pub run_kind: RunKind,
    /// This run is the second half of a classic/unified pair; members it
    /// creates are tagged with its style, since the other style's run has
    /// already declined to create them.
    #[serde(default)]
    pub final_style_run: bool,
    /// Text planted in freshly created documentation slots.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            delete_stale: false,
            preserve: false,
            run_kind: RunKind::Single,
            final_style_run: false,
            placeholder: default_placeholder(),
        }
    }
}

fn default_placeholder() -> String {
    "To be added.".into()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed options file: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpdateOptions {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options: UpdateOptions = serde_json::from_str(&content)?;
        Ok(options)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
