//! Provenance ledger — append-only JSONL linking code regions to intents
//!
//! One entry per successful mutation, one JSON object per line, lines
//! never rewritten. Regions are addressed by content hash rather than
//! line coordinates, so unrelated edits elsewhere in a file do not
//! invalidate earlier entries. Writes are best-effort: a ledger failure
//! is logged and swallowed, because the correctness of an edit must never
//! depend on observability.

use crate::ORCHESTRATION_DIR;
use chrono::{DateTime, Utc};
use intentgate_core::MutationClass;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub const TRACE_FILE: &str = "agent_trace.jsonl";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<VcsInfo>,
    pub files: Vec<FileTrace>,
}

impl TraceEntry {
    pub fn new(files: Vec<FileTrace>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            vcs: None,
            files,
        }
    }

    /// Whether any conversation in this entry references the intent.
    pub fn references_intent(&self, intent_id: &str) -> bool {
        self.files.iter().any(|f| {
            f.conversations
                .iter()
                .any(|c| c.related.iter().any(|r| r.value == intent_id))
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VcsInfo {
    pub revision_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileTrace {
    /// POSIX separators, workspace-relative.
    pub relative_path: String,
    pub conversations: Vec<ConversationTrace>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationTrace {
    /// Task-id proxy; a real conversation URL when the host has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub contributor: Contributor,
    pub ranges: Vec<LineRange>,
    pub related: Vec<Related>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contributor {
    pub entity_type: EntityType,
    pub model_identifier: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Ai,
    Human,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
    pub content_hash: String,
    pub mutation_class: MutationClass,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Related {
    #[serde(rename = "type")]
    pub kind: RelatedKind,
    pub value: String,
}

impl Related {
    pub fn specification(value: impl Into<String>) -> Self {
        Self {
            kind: RelatedKind::Specification,
            value: value.into(),
        }
    }

    pub fn requirement(value: impl Into<String>) -> Self {
        Self {
            kind: RelatedKind::Requirement,
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedKind {
    Specification,
    Requirement,
    Intent,
}

/// Exclusive owner of the trace file.
pub struct TraceLedger {
    workspace: PathBuf,
}

impl TraceLedger {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
        }
    }

    pub fn trace_path(&self) -> PathBuf {
        self.workspace.join(ORCHESTRATION_DIR).join(TRACE_FILE)
    }

    /// Append one entry as a single JSONL line. Best-effort: failures are
    /// logged on the diagnostic channel and never surfaced to the caller.
    pub async fn append(&self, entry: &TraceEntry) {
        if let Err(e) = self.try_append(entry).await {
            warn!("trace ledger append failed: {}", e);
        }
    }

    async fn try_append(&self, entry: &TraceEntry) -> std::io::Result<()> {
        let path = self.trace_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        debug!("trace: {} file(s) recorded", entry.files.len());
        Ok(())
    }

    /// The most recent entries referencing an intent, oldest first.
    /// Malformed lines are skipped with a warning; they may come from
    /// external writers and must not poison read-back.
    pub async fn entries_for_intent(&self, intent_id: &str, limit: usize) -> Vec<TraceEntry> {
        let text = match tokio::fs::read_to_string(self.trace_path()).await {
            Ok(text) => text,
            Err(_) => return Vec::new(),
        };
        let mut entries: Vec<TraceEntry> = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TraceEntry>(line) {
                Ok(entry) => {
                    if entry.references_intent(intent_id) {
                        entries.push(entry);
                    }
                }
                Err(e) => warn!("skipping malformed trace line: {}", e),
            }
        }
        if entries.len() > limit {
            entries.drain(..entries.len() - limit);
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry_for(intent_id: &str, path: &str) -> TraceEntry {
        TraceEntry::new(vec![FileTrace {
            relative_path: path.to_string(),
            conversations: vec![ConversationTrace {
                url: Some("task-1".into()),
                contributor: Contributor {
                    entity_type: EntityType::Ai,
                    model_identifier: "claude-sonnet-4".into(),
                },
                ranges: vec![LineRange {
                    start_line: 1,
                    end_line: 3,
                    content_hash: intentgate_core::hash("abc"),
                    mutation_class: MutationClass::IntentEvolution,
                }],
                related: vec![Related::specification(intent_id)],
            }],
        }])
    }

    #[tokio::test]
    async fn append_creates_directory_and_one_line() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        ledger.append(&entry_for("INT-001", "src/a.rs")).await;

        let text = tokio::fs::read_to_string(ledger.trace_path()).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: TraceEntry = serde_json::from_str(lines[0]).unwrap();
        assert!(parsed.references_intent("INT-001"));
    }

    #[tokio::test]
    async fn appends_accumulate() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        ledger.append(&entry_for("INT-001", "src/a.rs")).await;
        ledger.append(&entry_for("INT-002", "src/b.rs")).await;

        let text = tokio::fs::read_to_string(ledger.trace_path()).await.unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[tokio::test]
    async fn read_back_filters_by_intent() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        ledger.append(&entry_for("INT-001", "src/a.rs")).await;
        ledger.append(&entry_for("INT-002", "src/b.rs")).await;
        ledger.append(&entry_for("INT-001", "src/c.rs")).await;

        let entries = ledger.entries_for_intent("INT-001", 10).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].files[0].relative_path, "src/a.rs");
        assert_eq!(entries[1].files[0].relative_path, "src/c.rs");
    }

    #[tokio::test]
    async fn read_back_honors_limit_keeping_latest() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        for i in 0..5 {
            ledger
                .append(&entry_for("INT-001", &format!("src/f{}.rs", i)))
                .await;
        }
        let entries = ledger.entries_for_intent("INT-001", 2).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].files[0].relative_path, "src/f4.rs");
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        ledger.append(&entry_for("INT-001", "src/a.rs")).await;
        let mut file = OpenOptions::new()
            .append(true)
            .open(ledger.trace_path())
            .await
            .unwrap();
        file.write_all(b"{not json}\n").await.unwrap();
        ledger.append(&entry_for("INT-001", "src/b.rs")).await;

        let entries = ledger.entries_for_intent("INT-001", 10).await;
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn missing_ledger_reads_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = TraceLedger::new(dir.path());
        assert!(ledger.entries_for_intent("INT-001", 10).await.is_empty());
    }

    #[test]
    fn related_type_field_is_renamed() {
        let related = Related::specification("INT-001");
        let json = serde_json::to_value(&related).unwrap();
        assert_eq!(json["type"], "specification");
        assert_eq!(json["value"], "INT-001");
    }

    #[test]
    fn timestamp_is_iso8601() {
        let entry = entry_for("INT-001", "src/a.rs");
        let json = serde_json::to_value(&entry).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'), "{ts}");
    }
}
