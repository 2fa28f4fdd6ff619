//! Hook engine — ordered pre/post interception around tool execution
//!
//! Pre-hooks run in registration order and may block (short-circuiting the
//! pipeline and the tool) or substitute a transformed invocation for
//! everything downstream. Post-hooks run after the tool, each isolated:
//! one failing never silences the others. The engine is a plain value;
//! construct one per task and drop it with the conversation.

use intentgate_core::command::{codes, RejectionError};
use intentgate_core::{is_write_tool, TaskSession, ToolInvocation};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Everything a hook may inspect about the call in flight.
pub struct HookContext<'a> {
    pub workspace: &'a Path,
    pub task: &'a TaskSession,
    pub invocation: &'a ToolInvocation,
    /// For write tools in the post phase: whether the target file existed
    /// before the tool ran. `None` in the pre phase or when unknown.
    pub file_preexisted: Option<bool>,
}

/// What a pre-hook decided about the call.
#[derive(Clone, Debug)]
pub enum HookDecision {
    /// Let the call continue to the next hook.
    Pass,
    /// Stop the pipeline; the tool does not run. The message flows back to
    /// the LLM verbatim (plain text or a serialized rejection payload).
    Block { message: String },
    /// Substitute a replacement invocation for subsequent hooks and the
    /// tool itself.
    Transform { invocation: ToolInvocation },
}

/// Result of a tool execution, handed to the post phase by the driver.
#[derive(Clone, Debug)]
pub enum ToolResult {
    Text(String),
    Json(Value),
    Error(String),
}

impl ToolResult {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A policy hook. Implementations are registered with the engine in
/// pipeline order; both phases default to doing nothing.
#[async_trait::async_trait]
pub trait Hook: Send + Sync {
    /// Unique hook id. Registering a second hook with the same id
    /// replaces the first in place.
    fn id(&self) -> &str;

    async fn pre_execute(&self, _ctx: &HookContext<'_>) -> HookDecision {
        HookDecision::Pass
    }

    async fn post_execute(
        &self,
        _ctx: &HookContext<'_>,
        _result: &ToolResult,
    ) -> intentgate_core::Result<()> {
        Ok(())
    }
}

/// Pre-tool filesystem facts the post phase cannot observe on its own.
/// Captured after the pre-hooks pass, before the tool runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WriteSnapshot {
    pub file_preexisted: Option<bool>,
}

impl WriteSnapshot {
    pub async fn capture(workspace: &Path, invocation: &ToolInvocation) -> Self {
        if !is_write_tool(&invocation.name) {
            return Self::default();
        }
        let Some(path) = invocation.path() else {
            return Self::default();
        };
        let target = resolve_target(workspace, path);
        let file_preexisted = tokio::fs::try_exists(&target).await.ok();
        Self { file_preexisted }
    }
}

/// Outcome of the pre phase.
#[derive(Debug)]
pub enum PreflightOutcome {
    /// All hooks passed; run the tool with this (possibly transformed)
    /// invocation, then hand `snapshot` back to `run_post`.
    Proceed {
        invocation: ToolInvocation,
        snapshot: WriteSnapshot,
    },
    Blocked {
        hook_id: String,
        message: String,
    },
}

impl PreflightOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Ordered composition of hooks around one task's tool calls.
pub struct HookEngine {
    workspace: PathBuf,
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookEngine {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            hooks: Vec::new(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Register a hook. A hook sharing an existing id replaces it in
    /// place, keeping its pipeline position, so re-initialization is
    /// idempotent.
    pub fn register(&mut self, hook: impl Hook + 'static) {
        let hook: Arc<dyn Hook> = Arc::new(hook);
        if let Some(slot) = self.hooks.iter_mut().find(|h| h.id() == hook.id()) {
            *slot = hook;
        } else {
            self.hooks.push(hook);
        }
    }

    pub fn hook_ids(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.id()).collect()
    }

    /// Run the pre phase. Stops at the first blocking hook; transforms
    /// replace the invocation seen by everything downstream.
    pub async fn run_pre(
        &self,
        task: &TaskSession,
        invocation: ToolInvocation,
    ) -> PreflightOutcome {
        self.run_pre_inner(task, invocation, None).await
    }

    /// Like [`run_pre`](Self::run_pre), but each hook races the
    /// cancellation token. A cancelled pre phase reports a deterministic
    /// blocked outcome so the agent never observes a half-run pipeline.
    pub async fn run_pre_cancellable(
        &self,
        task: &TaskSession,
        invocation: ToolInvocation,
        cancel: CancellationToken,
    ) -> PreflightOutcome {
        self.run_pre_inner(task, invocation, Some(cancel)).await
    }

    async fn run_pre_inner(
        &self,
        task: &TaskSession,
        invocation: ToolInvocation,
        cancel: Option<CancellationToken>,
    ) -> PreflightOutcome {
        let mut current = invocation;
        for hook in &self.hooks {
            let decision = {
                let ctx = HookContext {
                    workspace: &self.workspace,
                    task,
                    invocation: &current,
                    file_preexisted: None,
                };
                match &cancel {
                    Some(token) => tokio::select! {
                        decision = hook.pre_execute(&ctx) => decision,
                        () = token.cancelled() => {
                            debug!("pre phase cancelled at hook {}", hook.id());
                            return PreflightOutcome::Blocked {
                                hook_id: hook.id().to_string(),
                                message: cancellation_rejection(&current, task),
                            };
                        }
                    },
                    None => hook.pre_execute(&ctx).await,
                }
            };
            match decision {
                HookDecision::Pass => {}
                HookDecision::Block { message } => {
                    debug!("hook {} blocked {}", hook.id(), current.name);
                    return PreflightOutcome::Blocked {
                        hook_id: hook.id().to_string(),
                        message,
                    };
                }
                HookDecision::Transform { invocation } => {
                    debug!("hook {} transformed {}", hook.id(), current.name);
                    current = invocation;
                }
            }
        }
        let snapshot = WriteSnapshot::capture(&self.workspace, &current).await;
        PreflightOutcome::Proceed {
            invocation: current,
            snapshot,
        }
    }

    /// Run the post phase. Every hook gets a chance; failures are logged
    /// and never abort the remaining hooks or change the tool's outcome.
    pub async fn run_post(
        &self,
        task: &TaskSession,
        invocation: &ToolInvocation,
        snapshot: WriteSnapshot,
        result: &ToolResult,
    ) {
        for hook in &self.hooks {
            let ctx = HookContext {
                workspace: &self.workspace,
                task,
                invocation,
                file_preexisted: snapshot.file_preexisted,
            };
            if let Err(e) = hook.post_execute(&ctx, result).await {
                warn!("post hook {} failed: {}", hook.id(), e);
            }
        }
    }
}

fn cancellation_rejection(invocation: &ToolInvocation, task: &TaskSession) -> String {
    RejectionError::new(
        codes::CANCELLED,
        invocation.name.as_str(),
        task.active_intent_id.clone(),
        "The tool call was cancelled before execution.",
    )
    .with_recovery_hint("The host cancelled this operation. Wait for new instructions before retrying.")
    .to_json()
}

/// Resolve a tool-supplied path against the workspace root.
pub fn resolve_target(workspace: &Path, raw: &str) -> PathBuf {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        workspace.join(candidate)
    }
}
