//! Intent update — status transitions on selection and completion
//!
//! Selection moves an intent to IN_PROGRESS, completion to COMPLETED.
//! There is no automatic regression; a completed intent stays completed
//! until a human edits the registry. Re-issuing a transition is a no-op
//! at the store layer, so the registry file is rewritten at most once per
//! actual change.

use crate::engine::{Hook, HookContext, ToolResult};
use intentgate_core::{IntentStatus, Result};
use intentgate_store::IntentStore;
use std::path::Path;

pub struct IntentUpdateHook {
    store: IntentStore,
}

impl IntentUpdateHook {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            store: IntentStore::new(workspace),
        }
    }
}

#[async_trait::async_trait]
impl Hook for IntentUpdateHook {
    fn id(&self) -> &str {
        "intent-update"
    }

    async fn post_execute(&self, ctx: &HookContext<'_>, _result: &ToolResult) -> Result<()> {
        let invocation = ctx.invocation;
        match invocation.name.as_str() {
            "select_active_intent" => {
                let target = invocation
                    .explicit_intent_id()
                    .or(ctx.task.active_intent_id.as_deref());
                if let Some(intent_id) = target {
                    self.store
                        .set_status(intent_id, IntentStatus::InProgress)
                        .await?;
                }
            }
            "attempt_completion" => {
                if let Some(intent_id) = ctx.task.active_intent_id.as_deref() {
                    self.store
                        .set_status(intent_id, IntentStatus::Completed)
                        .await?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
