//! Optimistic lock — compare-and-set on content hashes
//!
//! The kernel takes no file locks; concurrent agents are serialized by
//! this hook instead. A caller that read a file supplies the hash it saw
//! as `expected_hash`; if another writer landed in between, the hashes
//! differ and the stale caller is told to re-read. Supplying no hash opts
//! out and downgrades that write to last-write-wins, the documented
//! behavior for first writes and deliberate resets.

use crate::engine::{resolve_target, Hook, HookContext, HookDecision};
use intentgate_core::command::{codes, RejectionError};
use intentgate_core::{hash, is_write_tool, to_workspace_relative};
use tracing::debug;

pub struct OptimisticLockHook;

impl OptimisticLockHook {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OptimisticLockHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Hook for OptimisticLockHook {
    fn id(&self) -> &str {
        "optimistic-lock"
    }

    async fn pre_execute(&self, ctx: &HookContext<'_>) -> HookDecision {
        let invocation = ctx.invocation;
        if !is_write_tool(&invocation.name) {
            return HookDecision::Pass;
        }
        let Some(expected) = invocation.expected_hash() else {
            return HookDecision::Pass;
        };
        // Empty string is the same opt-out as omitting the hash.
        if expected.is_empty() {
            return HookDecision::Pass;
        }
        let Some(raw_path) = invocation.path() else {
            return HookDecision::Pass;
        };

        let target = resolve_target(ctx.workspace, raw_path);
        let relative = to_workspace_relative(ctx.workspace, raw_path);
        let text = match tokio::fs::read_to_string(&target).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The caller expected an existing file; it is gone.
                return HookDecision::Block {
                    message: RejectionError::new(
                        codes::STALE_FILE,
                        invocation.name.as_str(),
                        ctx.task.active_intent_id.clone(),
                        format!("{} no longer exists, but expected_hash says it should.", relative),
                    )
                    .with_recovery_hint(
                        "The file was deleted since it was read. Re-list the directory and \
                         re-plan; omit expected_hash if the intent is to create it fresh.",
                    )
                    .to_json(),
                };
            }
            Err(e) => {
                // An unreadable file is a filesystem problem, not staleness.
                // The lock guards content, it must not become an
                // availability hazard.
                debug!("optimistic lock skipped, {} unreadable: {}", relative, e);
                return HookDecision::Pass;
            }
        };

        let current = hash(&text);
        if current == expected {
            return HookDecision::Pass;
        }
        HookDecision::Block {
            message: RejectionError::new(
                codes::STALE_FILE,
                invocation.name.as_str(),
                ctx.task.active_intent_id.clone(),
                format!("{} changed since it was read; expected_hash is stale.", relative),
            )
            .with_recovery_hint(format!(
                "Another writer modified {}; its current content hash is {}. Re-read the \
                 file, rebase the edit, and retry with the fresh hash.",
                relative, current
            ))
            .to_json(),
        }
    }
}
