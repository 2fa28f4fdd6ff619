//! The six policy hooks, one per file, in pipeline order.

pub mod authorize;
pub mod gatekeeper;
pub mod intent_update;
pub mod lock;
pub mod scope;
pub mod trace_writer;

pub use authorize::AuthorizationHook;
pub use gatekeeper::GatekeeperHook;
pub use intent_update::IntentUpdateHook;
pub use lock::OptimisticLockHook;
pub use scope::ScopeEnforcementHook;
pub use trace_writer::TraceWriterHook;
