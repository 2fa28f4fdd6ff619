//! Authorization — human approval for destructive tools
//!
//! Runs last in the pre phase: by the time the modal appears, every cheap
//! check has already passed, so the human is never asked to approve a call
//! the kernel would reject anyway. Intents on the bypass list skip the
//! modal entirely.

use crate::engine::{Hook, HookContext, HookDecision};
use crate::host::{ApprovalHandler, ApprovalResponse};
use intentgate_core::command::{codes, RejectionError};
use intentgate_core::{classify, ToolClass};
use intentgate_store::BypassList;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct AuthorizationHook {
    bypass: Arc<BypassList>,
    approval: Arc<dyn ApprovalHandler>,
}

impl AuthorizationHook {
    pub fn new(workspace: impl AsRef<Path>, approval: Arc<dyn ApprovalHandler>) -> Self {
        Self {
            bypass: Arc::new(BypassList::new(workspace)),
            approval,
        }
    }

    /// Handle to the bypass cache, for hosts that want to invalidate it
    /// when `.intentignore` changes on disk.
    pub fn bypass_handle(&self) -> Arc<BypassList> {
        Arc::clone(&self.bypass)
    }
}

#[async_trait::async_trait]
impl Hook for AuthorizationHook {
    fn id(&self) -> &str {
        "authorization"
    }

    async fn pre_execute(&self, ctx: &HookContext<'_>) -> HookDecision {
        let invocation = ctx.invocation;
        if classify(&invocation.name) != ToolClass::Destructive {
            return HookDecision::Pass;
        }

        if let Some(intent_id) = ctx.task.active_intent_id.as_deref() {
            if self.bypass.contains(intent_id).await {
                debug!("{} bypasses approval for {}", intent_id, invocation.name);
                return HookDecision::Pass;
            }
        }

        let action = invocation.name.replace('_', " ");
        let target = invocation
            .path()
            .map(|p| format!(" on {}", p))
            .unwrap_or_default();
        let message = format!("The agent requests approval to {}{}.", action, target);

        match self.approval.request_approval(&message).await {
            ApprovalResponse::Approved => HookDecision::Pass,
            // Rejection and dismissal deny alike: silence is not consent.
            _ => HookDecision::Block {
                message: RejectionError::new(
                    codes::USER_REJECTED_INTENT_EVOLUTION,
                    invocation.name.as_str(),
                    ctx.task.active_intent_id.clone(),
                    "The operator declined this action.",
                )
                .with_recovery_hint(
                    "Do not retry the same call. Explain what you intended and ask the \
                     operator how to proceed, or continue with read-only work.",
                )
                .to_json(),
            },
        }
    }
}
