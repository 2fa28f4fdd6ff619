//! Intentgate store — filesystem-backed governance state
//!
//! Three files under `<workspace>/.orchestration/` hold everything the
//! kernel persists: the intent registry (`active_intents.yaml`, owned by
//! [`IntentStore`]), the provenance ledger (`agent_trace.jsonl`, owned by
//! [`TraceLedger`], append-only), and the approval bypass list
//! (`.intentignore`, read through [`BypassList`]).
//!
//! There is no cross-process locking here. Consistency across concurrent
//! agents comes from the optimistic content-hash CAS enforced by the hook
//! pipeline, not from the store.

pub mod bypass;
pub mod context;
pub mod intents;
pub mod trace;

pub use bypass::BypassList;
pub use context::{compose_constitution, selection_context, GOVERNANCE_CONSTITUTION};
pub use intents::{IntentRegistry, IntentStore};
pub use trace::{
    Contributor, ConversationTrace, EntityType, FileTrace, LineRange, Related, RelatedKind,
    TraceEntry, TraceLedger, VcsInfo,
};

/// Directory under the workspace root that holds all governance state.
pub const ORCHESTRATION_DIR: &str = ".orchestration";
