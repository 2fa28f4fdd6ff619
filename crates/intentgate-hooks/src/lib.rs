//! Intentgate hooks — the policy pipeline around agent tool calls
//!
//! The engine interposes between the driver and its tools: pre-hooks can
//! veto or rewrite a call before it runs, post-hooks record its
//! consequences afterwards. Hooks compose in a fixed order chosen so the
//! cheap in-memory checks fail fast, filesystem checks run next, and the
//! blocking approval modal comes last; provenance is written only after
//! intent state has settled.
//!
//! To add a hook: create a file in src/hooks/, implement [`Hook`],
//! register it in [`default_engine`] (or build a custom engine).

pub mod engine;
pub mod hooks;
pub mod host;

pub use engine::{
    Hook, HookContext, HookDecision, HookEngine, PreflightOutcome, ToolResult, WriteSnapshot,
};
pub use hooks::{
    AuthorizationHook, GatekeeperHook, IntentUpdateHook, OptimisticLockHook, ScopeEnforcementHook,
    TraceWriterHook,
};
pub use host::{ApprovalHandler, ApprovalResponse, AutoApprove};

use std::path::Path;
use std::sync::Arc;

/// Build the canonical pipeline.
///
/// Pre phase: gatekeeper, optimistic lock, scope enforcement,
/// authorization. Post phase: intent update, trace writer.
pub fn default_engine(
    workspace: impl AsRef<Path>,
    approval: Arc<dyn ApprovalHandler>,
) -> HookEngine {
    let root = workspace.as_ref();
    let mut engine = HookEngine::new(root);

    // --- pre-phase policy, cheapest first ---
    engine.register(GatekeeperHook::new());
    engine.register(OptimisticLockHook::new());
    engine.register(ScopeEnforcementHook::new(root));
    engine.register(AuthorizationHook::new(root, approval));

    // --- post-phase bookkeeping ---
    engine.register(IntentUpdateHook::new(root));
    engine.register(TraceWriterHook::new(root));

    engine
}
