//! Domain types shared across the kernel

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared business objective, the unit of authorization. Created by
/// humans in the registry file; the kernel only ever advances its status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub name: String,
    pub status: IntentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned_scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance_criteria: Vec<String>,
    /// Registry keys this kernel does not interpret. Preserved on
    /// read-modify-write so external tooling can annotate intents.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentStatus {
    Todo,
    InProgress,
    Completed,
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentStatus::Todo => f.write_str("TODO"),
            IntentStatus::InProgress => f.write_str("IN_PROGRESS"),
            IntentStatus::Completed => f.write_str("COMPLETED"),
        }
    }
}

/// Metadata about the model driving the conversation. Recorded in trace
/// entries, never consulted for policy.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub identifier: String,
}

impl ModelDescriptor {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Per-conversation state carried through every hook call. Owned by the
/// driver; hooks only read it.
#[derive(Clone, Debug)]
pub struct TaskSession {
    pub task_id: String,
    pub active_intent_id: Option<String>,
    pub model: ModelDescriptor,
    /// Counters maintained by the hosting driver across the conversation.
    pub mutation_count: u64,
    pub refactor_count: u64,
}

impl TaskSession {
    pub fn new(task_id: impl Into<String>, model: ModelDescriptor) -> Self {
        Self {
            task_id: task_id.into(),
            active_intent_id: None,
            model,
            mutation_count: 0,
            refactor_count: 0,
        }
    }

    /// Explicit re-selection is the only way the active intent changes.
    pub fn select_intent(&mut self, intent_id: impl Into<String>) {
        self.active_intent_id = Some(intent_id.into());
    }
}

/// Typed view of a tool call's arguments, preferred over the raw parameter
/// map when the driver parsed native arguments.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeArgs {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub diff: Option<String>,
    #[serde(default)]
    pub new_string: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub expected_hash: Option<String>,
    #[serde(default)]
    pub mutation_class: Option<String>,
    #[serde(default)]
    pub intent_id: Option<String>,
}

/// A tool call as handed to the hook engine. Immutable once constructed;
/// a hook that needs to change it returns a transformed replacement.
#[derive(Clone, Debug)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub params: serde_json::Value,
    pub native_args: Option<NativeArgs>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            params,
            native_args: None,
        }
    }

    pub fn with_native_args(mut self, args: NativeArgs) -> Self {
        self.native_args = Some(args);
        self
    }

    fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    /// Target path of the call: `path` or `file_path`, native view first.
    pub fn path(&self) -> Option<&str> {
        self.native_args
            .as_ref()
            .and_then(|n| n.path.as_deref())
            .or_else(|| self.param_str("path"))
            .or_else(|| self.param_str("file_path"))
    }

    pub fn expected_hash(&self) -> Option<&str> {
        self.native_args
            .as_ref()
            .and_then(|n| n.expected_hash.as_deref())
            .or_else(|| self.param_str("expected_hash"))
    }

    /// The text this call is landing on disk: full content for a write,
    /// the diff / replacement / patch payload otherwise.
    pub fn content_payload(&self) -> Option<&str> {
        if let Some(native) = &self.native_args {
            if let Some(text) = native
                .content
                .as_deref()
                .or(native.diff.as_deref())
                .or(native.new_string.as_deref())
                .or(native.patch.as_deref())
            {
                return Some(text);
            }
        }
        self.param_str("content")
            .or_else(|| self.param_str("diff"))
            .or_else(|| self.param_str("new_string"))
            .or_else(|| self.param_str("patch"))
    }

    pub fn mutation_class_hint(&self) -> Option<&str> {
        self.native_args
            .as_ref()
            .and_then(|n| n.mutation_class.as_deref())
            .or_else(|| self.param_str("mutation_class"))
    }

    /// An intent id carried on the call itself, distinct from the task's
    /// active intent.
    pub fn explicit_intent_id(&self) -> Option<&str> {
        self.native_args
            .as_ref()
            .and_then(|n| n.intent_id.as_deref())
            .or_else(|| self.param_str("intent_id"))
    }
}
