//! Intent-selection context and the governance constitution
//!
//! `select_active_intent` answers the agent with an XML block describing
//! the chosen intent plus its recent provenance, so the model starts work
//! with the constraints and prior edits in context. The constitution is
//! the policy text the prompt composer injects before the first turn; the
//! composer itself lives in the host, this module only supplies the text.

use crate::trace::TraceLedger;
use intentgate_core::Intent;
use std::fmt::Write as _;
use std::path::Path;

/// Policy preamble injected into the system prompt before the first turn.
/// `{INTENTS}` is replaced by [`compose_constitution`].
pub const GOVERNANCE_CONSTITUTION: &str = "\
GOVERNANCE: every side-effecting tool call must be attributable to a declared intent.
Until you call select_active_intent, the only tool available to you is select_active_intent.
Writes outside the selected intent's owned scope are rejected. When you modify a file you
have previously read, pass expected_hash so concurrent edits are detected instead of lost.

Available intents:
{INTENTS}";

/// Render the constitution with the currently registered intents.
pub fn compose_constitution(intents: &[Intent]) -> String {
    let listing = if intents.is_empty() {
        "(none registered; ask the operator to declare one)".to_string()
    } else {
        intents
            .iter()
            .map(|i| format!("- {}: {} ({})", i.id, i.name, i.status))
            .collect::<Vec<_>>()
            .join("\n")
    };
    GOVERNANCE_CONSTITUTION.replace("{INTENTS}", &listing)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build the XML context block returned by `select_active_intent`,
/// including up to `max_trace` prior ledger entries for the intent.
pub async fn selection_context(
    workspace: &Path,
    intent: &Intent,
    max_trace: usize,
) -> String {
    let mut xml = String::new();
    let _ = writeln!(
        xml,
        "<active_intent id=\"{}\" status=\"{}\">",
        xml_escape(&intent.id),
        intent.status
    );
    let _ = writeln!(xml, "  <name>{}</name>", xml_escape(&intent.name));

    if !intent.constraints.is_empty() {
        let _ = writeln!(xml, "  <constraints>");
        for constraint in &intent.constraints {
            let _ = writeln!(xml, "    <constraint>{}</constraint>", xml_escape(constraint));
        }
        let _ = writeln!(xml, "  </constraints>");
    }

    if !intent.owned_scope.is_empty() {
        let _ = writeln!(xml, "  <owned_scope>");
        for pattern in &intent.owned_scope {
            let _ = writeln!(xml, "    <pattern>{}</pattern>", xml_escape(pattern));
        }
        let _ = writeln!(xml, "  </owned_scope>");
    }

    if !intent.acceptance_criteria.is_empty() {
        let _ = writeln!(xml, "  <acceptance_criteria>");
        for criterion in &intent.acceptance_criteria {
            let _ = writeln!(xml, "    <criterion>{}</criterion>", xml_escape(criterion));
        }
        let _ = writeln!(xml, "  </acceptance_criteria>");
    }

    let ledger = TraceLedger::new(workspace);
    let entries = ledger.entries_for_intent(&intent.id, max_trace).await;
    if !entries.is_empty() {
        let _ = writeln!(xml, "  <recent_trace>");
        for entry in &entries {
            for file in &entry.files {
                for conversation in &file.conversations {
                    for range in &conversation.ranges {
                        let _ = writeln!(
                            xml,
                            "    <entry file=\"{}\" lines=\"{}-{}\" hash=\"{}\" class=\"{}\"/>",
                            xml_escape(&file.relative_path),
                            range.start_line,
                            range.end_line,
                            xml_escape(&range.content_hash),
                            range.mutation_class
                        );
                    }
                }
            }
        }
        let _ = writeln!(xml, "  </recent_trace>");
    }

    xml.push_str("</active_intent>");
    xml
}
