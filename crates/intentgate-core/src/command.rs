//! Tool classification and structured rejection payloads
//!
//! Tool names are tagged SAFE, DESTRUCTIVE, or UNKNOWN from two static,
//! disjoint sets. When a hook blocks a call, the rejection flows back to
//! the LLM as pretty-printed JSON so the model can parse the machine code
//! and the recovery hint without any out-of-band protocol.

use serde::{Deserialize, Serialize};

/// Read/list/search tools and session-control tools. No side effects.
pub const SAFE_TOOLS: &[&str] = &[
    "read_file",
    "list_files",
    "search_files",
    "codebase_search",
    "ask_followup_question",
    "attempt_completion",
    "read_command_output",
    "select_active_intent",
    "update_todo_list",
];

/// Tools that write, execute, or otherwise escape the agent session.
pub const DESTRUCTIVE_TOOLS: &[&str] = &[
    "write_to_file",
    "apply_diff",
    "edit",
    "search_and_replace",
    "search_replace",
    "edit_file",
    "apply_patch",
    "execute_command",
    "use_mcp_tool",
    "access_mcp_resource",
    "switch_mode",
    "new_task",
    "generate_image",
    "run_slash_command",
    "skill",
];

/// File-mutating tools, gated by the optimistic lock, scope enforcement
/// and trace writer hooks.
pub const WRITE_TOOLS: &[&str] = &[
    "write_to_file",
    "apply_diff",
    "edit",
    "search_and_replace",
    "search_replace",
    "edit_file",
    "apply_patch",
    "insert_content",
];

/// Tools the gatekeeper refuses to run without a selected intent.
pub const SIDE_EFFECTING_TOOLS: &[&str] = &[
    "write_to_file",
    "apply_diff",
    "execute_command",
    "insert_content",
    "search_and_replace",
    "browser_action",
    "use_mcp_tool",
    "switch_mode",
    "new_task",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolClass {
    Safe,
    Destructive,
    Unknown,
}

impl std::fmt::Display for ToolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolClass::Safe => f.write_str("SAFE"),
            ToolClass::Destructive => f.write_str("DESTRUCTIVE"),
            ToolClass::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Classify a tool name. Total: anything outside both sets is UNKNOWN.
pub fn classify(tool: &str) -> ToolClass {
    if SAFE_TOOLS.contains(&tool) {
        ToolClass::Safe
    } else if DESTRUCTIVE_TOOLS.contains(&tool) {
        ToolClass::Destructive
    } else {
        ToolClass::Unknown
    }
}

pub fn is_write_tool(tool: &str) -> bool {
    WRITE_TOOLS.contains(&tool)
}

pub fn is_side_effecting(tool: &str) -> bool {
    SIDE_EFFECTING_TOOLS.contains(&tool)
}

/// Machine codes carried by rejection payloads. The set is open: future
/// hooks may introduce codes without touching this module.
pub mod codes {
    pub const USER_REJECTED_INTENT_EVOLUTION: &str = "USER_REJECTED_INTENT_EVOLUTION";
    pub const SCOPE_VIOLATION: &str = "SCOPE_VIOLATION";
    pub const STALE_FILE: &str = "STALE_FILE";
    pub const CANCELLED: &str = "CANCELLED";
}

const DEFAULT_RECOVERY_HINT: &str =
    "Re-read the relevant files, adjust your plan to comply with the active intent, and retry.";

/// The structured rejection returned to the LLM when a pre-hook blocks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RejectionError {
    pub error: String,
    pub code: String,
    pub tool: String,
    pub intent_id: Option<String>,
    pub message: String,
    pub recovery_hint: String,
}

impl RejectionError {
    pub fn new(
        code: impl Into<String>,
        tool: impl Into<String>,
        intent_id: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: "TOOL_REJECTED".to_string(),
            code: code.into(),
            tool: tool.into(),
            intent_id,
            message: message.into(),
            recovery_hint: DEFAULT_RECOVERY_HINT.to_string(),
        }
    }

    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = hint.into();
        self
    }

    /// Serialize as indented JSON. Indentation matters: the payload is read
    /// by the model, and a self-describing block survives prompt truncation
    /// better than a single long line.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!("{{\"error\":\"TOOL_REJECTED\",\"code\":\"{}\"}}", self.code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_classify() {
        for tool in SAFE_TOOLS {
            assert_eq!(classify(tool), ToolClass::Safe, "{tool}");
        }
        for tool in DESTRUCTIVE_TOOLS {
            assert_eq!(classify(tool), ToolClass::Destructive, "{tool}");
        }
    }

    #[test]
    fn unknown_tools_classify_unknown() {
        assert_eq!(classify("frobnicate"), ToolClass::Unknown);
        assert_eq!(classify(""), ToolClass::Unknown);
        assert_eq!(classify("READ_FILE"), ToolClass::Unknown);
    }

    #[test]
    fn safe_and_destructive_are_disjoint() {
        for tool in SAFE_TOOLS {
            assert!(!DESTRUCTIVE_TOOLS.contains(tool), "{tool} in both sets");
        }
    }

    #[test]
    fn rejection_serializes_all_fields() {
        let r = RejectionError::new(
            codes::SCOPE_VIOLATION,
            "write_to_file",
            Some("INT-001".into()),
            "write outside owned scope",
        );
        let json = r.to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["error"], "TOOL_REJECTED");
        assert_eq!(parsed["code"], "SCOPE_VIOLATION");
        assert_eq!(parsed["tool"], "write_to_file");
        assert_eq!(parsed["intent_id"], "INT-001");
        assert!(parsed["message"].is_string());
        assert!(parsed["recovery_hint"].is_string());
    }

    #[test]
    fn rejection_null_intent_id() {
        let r = RejectionError::new(codes::STALE_FILE, "apply_diff", None, "stale");
        let parsed: serde_json::Value = serde_json::from_str(&r.to_json()).unwrap();
        assert!(parsed["intent_id"].is_null());
    }

    #[test]
    fn rejection_custom_hint_preserved() {
        let r = RejectionError::new(codes::STALE_FILE, "edit", None, "stale")
            .with_recovery_hint("current hash is sha256:abc");
        let parsed: serde_json::Value = serde_json::from_str(&r.to_json()).unwrap();
        assert_eq!(parsed["recovery_hint"], "current hash is sha256:abc");
    }

    #[test]
    fn rejection_json_is_indented() {
        let r = RejectionError::new(codes::STALE_FILE, "edit", None, "stale");
        assert!(r.to_json().contains("\n  \"code\""));
    }
}
