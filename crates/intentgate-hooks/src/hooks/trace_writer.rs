//! Trace writer — one provenance entry per successful mutation
//!
//! Builds the ledger entry linking the written region (path + content
//! hash) to the active intent. Ranges are coarse on purpose: the hashed
//! payload's newline count anchors the entry without re-parsing the
//! target, and later lookups key on the content hash, not the line
//! numbers.

use crate::engine::{resolve_target, Hook, HookContext, ToolResult};
use intentgate_core::{classify_mutation, hash, is_write_tool, to_workspace_relative, Result};
use intentgate_store::{
    Contributor, ConversationTrace, EntityType, FileTrace, LineRange, Related, TraceEntry,
    TraceLedger,
};
use std::path::Path;
use tracing::debug;

pub struct TraceWriterHook {
    ledger: TraceLedger,
}

impl TraceWriterHook {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            ledger: TraceLedger::new(workspace),
        }
    }
}

#[async_trait::async_trait]
impl Hook for TraceWriterHook {
    fn id(&self) -> &str {
        "trace-writer"
    }

    async fn post_execute(&self, ctx: &HookContext<'_>, result: &ToolResult) -> Result<()> {
        let invocation = ctx.invocation;
        if !is_write_tool(&invocation.name) || result.is_error() {
            return Ok(());
        }
        let Some(intent_id) = ctx.task.active_intent_id.as_deref() else {
            return Ok(());
        };
        let Some(raw_path) = invocation.path() else {
            return Ok(());
        };
        let relative = to_workspace_relative(ctx.workspace, raw_path);
        let target = resolve_target(ctx.workspace, raw_path);

        // The hashed text: the call's own payload when it carries one,
        // the file on disk otherwise. Nothing obtainable means nothing
        // to record.
        let content = match invocation.content_payload() {
            Some(payload) => payload.to_string(),
            None => match tokio::fs::read_to_string(&target).await {
                Ok(text) => text,
                Err(e) => {
                    debug!("trace skipped, no content for {}: {}", relative, e);
                    return Ok(());
                }
            },
        };

        let is_new_file = match ctx.file_preexisted {
            Some(preexisted) => !preexisted,
            // Snapshot missing: probe now. The write already landed, so
            // this under-reports new files; the snapshot is the accurate
            // path.
            None => !tokio::fs::try_exists(&target).await.unwrap_or(true),
        };

        let mutation_class =
            classify_mutation(invocation.mutation_class_hint(), &content, is_new_file);
        let content_hash = hash(&content);
        let end_line = content.matches('\n').count() as u32 + 1;

        let mut related = vec![Related::specification(intent_id)];
        if let Some(explicit) = invocation.explicit_intent_id() {
            if explicit != intent_id {
                related.push(Related::requirement(explicit));
            }
        }

        let entry = TraceEntry::new(vec![FileTrace {
            relative_path: relative,
            conversations: vec![ConversationTrace {
                url: Some(ctx.task.task_id.clone()),
                contributor: Contributor {
                    entity_type: EntityType::Ai,
                    model_identifier: ctx.task.model.identifier.clone(),
                },
                ranges: vec![LineRange {
                    start_line: 1,
                    end_line,
                    content_hash,
                    mutation_class,
                }],
                related,
            }],
        }]);
        self.ledger.append(&entry).await;
        Ok(())
    }
}
