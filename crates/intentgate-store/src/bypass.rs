//! Approval bypass list — `.orchestration/.intentignore`
//!
//! One intent id per line; blank lines and `#` comments are ignored.
//! Intents on the list skip the human approval modal entirely. The parsed
//! set is memoized in a single slot with explicit invalidation; a new
//! workspace means a new [`BypassList`], so the cache never goes stale
//! across workspaces.

use crate::ORCHESTRATION_DIR;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

pub const BYPASS_FILE: &str = ".intentignore";

pub struct BypassList {
    workspace: PathBuf,
    cache: Mutex<Option<HashSet<String>>>,
}

impl BypassList {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            cache: Mutex::new(None),
        }
    }

    pub fn bypass_path(&self) -> PathBuf {
        self.workspace.join(ORCHESTRATION_DIR).join(BYPASS_FILE)
    }

    /// Whether the intent is on the bypass list. Loads and caches the file
    /// on first use; any read failure degrades to "no bypass".
    pub async fn contains(&self, intent_id: &str) -> bool {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await);
        }
        cache
            .as_ref()
            .map(|ids| ids.contains(intent_id))
            .unwrap_or(false)
    }

    /// Drop the memoized set so the next query re-reads the file.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    async fn load(&self) -> HashSet<String> {
        match tokio::fs::read_to_string(self.bypass_path()).await {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                debug!("no bypass list loaded: {}", e);
                HashSet::new()
            }
        }
    }
}
