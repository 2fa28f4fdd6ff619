//! Scope enforcement — writes stay inside the active intent's owned scope

use crate::engine::{Hook, HookContext, HookDecision};
use intentgate_core::command::{codes, RejectionError};
use intentgate_core::{is_write_tool, matches_scope, to_workspace_relative};
use intentgate_store::IntentStore;
use std::path::Path;
use tracing::warn;

pub struct ScopeEnforcementHook {
    store: IntentStore,
}

impl ScopeEnforcementHook {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            store: IntentStore::new(workspace),
        }
    }
}

#[async_trait::async_trait]
impl Hook for ScopeEnforcementHook {
    fn id(&self) -> &str {
        "scope-enforcement"
    }

    async fn pre_execute(&self, ctx: &HookContext<'_>) -> HookDecision {
        let invocation = ctx.invocation;
        if !is_write_tool(&invocation.name) {
            return HookDecision::Pass;
        }
        let Some(intent_id) = ctx.task.active_intent_id.as_deref() else {
            return HookDecision::Pass;
        };
        // No path means nothing to confine; other hooks decide the call.
        let Some(raw_path) = invocation.path() else {
            return HookDecision::Pass;
        };
        let relative = to_workspace_relative(ctx.workspace, raw_path);

        let intent = match self.store.find(intent_id).await {
            Ok(Some(intent)) => intent,
            // An unknown intent cannot be enforced; selection validity is
            // the driver's contract, not this hook's.
            Ok(None) => return HookDecision::Pass,
            Err(e) => {
                warn!("scope enforcement skipped, registry unreadable: {}", e);
                return HookDecision::Pass;
            }
        };
        if intent.owned_scope.is_empty() {
            return HookDecision::Pass;
        }
        if intent
            .owned_scope
            .iter()
            .any(|pattern| matches_scope(&relative, pattern))
        {
            return HookDecision::Pass;
        }

        let allowed = intent.owned_scope.join(", ");
        HookDecision::Block {
            message: RejectionError::new(
                codes::SCOPE_VIOLATION,
                invocation.name.as_str(),
                Some(intent_id.to_string()),
                format!("{} is outside the scope owned by {}.", relative, intent_id),
            )
            .with_recovery_hint(format!(
                "{} may only modify: {}. Work within these patterns, or select an intent \
                 that owns the target.",
                intent_id, allowed
            ))
            .to_json(),
        }
    }
}
