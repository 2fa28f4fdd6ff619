//! Gatekeeper — no side effects without a declared intent
//!
//! Checks only that the task has an active intent id. It never reads the
//! registry, so it cannot fail on I/O and costs nothing on the hot path;
//! whether the id is valid is the scope hook's problem.

use crate::engine::{Hook, HookContext, HookDecision};
use intentgate_core::is_side_effecting;

pub const GOVERNANCE_MESSAGE: &str = "\
No active intent is selected. Side-effecting tools are disabled until the work is \
attributed to a declared intent: call select_active_intent with the id of one of the \
registered intents, then retry this tool.";

pub struct GatekeeperHook;

impl GatekeeperHook {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GatekeeperHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Hook for GatekeeperHook {
    fn id(&self) -> &str {
        "gatekeeper"
    }

    async fn pre_execute(&self, ctx: &HookContext<'_>) -> HookDecision {
        if is_side_effecting(&ctx.invocation.name) && ctx.task.active_intent_id.is_none() {
            return HookDecision::Block {
                message: GOVERNANCE_MESSAGE.to_string(),
            };
        }
        HookDecision::Pass
    }
}
