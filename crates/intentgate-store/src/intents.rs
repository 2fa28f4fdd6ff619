//! Intent registry — the YAML file humans edit and the kernel advances
//!
//! The registry at `.orchestration/active_intents.yaml` is the source of
//! truth for declared intents. Humans create and reorder entries; the
//! kernel only ever flips `status`. Round-trips preserve structural keys
//! (including ones this crate does not know about) but not whitespace or
//! comments.

use crate::ORCHESTRATION_DIR;
use intentgate_core::{Error, Intent, IntentStatus, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const REGISTRY_FILE: &str = "active_intents.yaml";

/// Top-level shape of the registry file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IntentRegistry {
    #[serde(default)]
    pub active_intents: Vec<Intent>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl IntentRegistry {
    pub fn find(&self, intent_id: &str) -> Option<&Intent> {
        self.active_intents.iter().find(|i| i.id == intent_id)
    }
}

/// Exclusive owner of the registry file. Other components read intents
/// through this store and never touch the file directly.
pub struct IntentStore {
    workspace: PathBuf,
}

impl IntentStore {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.workspace.join(ORCHESTRATION_DIR).join(REGISTRY_FILE)
    }

    /// Load the registry. A missing file is an empty registry, not an
    /// error: a workspace without governance state has no intents yet.
    pub async fn load(&self) -> Result<IntentRegistry> {
        let path = self.registry_path();
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(IntentRegistry::default())
            }
            Err(e) => return Err(e.into()),
        };
        serde_yaml::from_str(&text).map_err(|e| Error::registry_parse(e.to_string()))
    }

    pub async fn find(&self, intent_id: &str) -> Result<Option<Intent>> {
        Ok(self.load().await?.find(intent_id).cloned())
    }

    /// Set an intent's status. Returns whether the file was rewritten:
    /// a matching status or an unknown intent id is a no-op, so repeated
    /// transitions do not churn the file.
    pub async fn set_status(&self, intent_id: &str, status: IntentStatus) -> Result<bool> {
        let mut registry = self.load().await?;
        let Some(intent) = registry
            .active_intents
            .iter_mut()
            .find(|i| i.id == intent_id)
        else {
            debug!("set_status: intent {} not in registry, skipping", intent_id);
            return Ok(false);
        };
        if intent.status == status {
            return Ok(false);
        }
        intent.status = status;
        self.save(&registry).await?;
        debug!("intent {} -> {}", intent_id, status);
        Ok(true)
    }

    async fn save(&self, registry: &IntentRegistry) -> Result<()> {
        let path = self.registry_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let text =
            serde_yaml::to_string(registry).map_err(|e| Error::registry_parse(e.to_string()))?;
        fs::write(&path, text).await?;
        Ok(())
    }
}
