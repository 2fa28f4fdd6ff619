//! Intentgate core — pure governance primitives
//!
//! Everything in this crate is I/O-free: content hashing, tool and mutation
//! classification, scope matching, and the domain types shared by the store
//! and hook crates.

pub mod command;
pub mod error;
pub mod hash;
pub mod mutation;
pub mod scope;
pub mod types;

pub use command::{classify, is_side_effecting, is_write_tool, RejectionError, ToolClass};
pub use error::{Error, Result};
pub use hash::{hash, hash_lines, verify};
pub use mutation::{classify_mutation, MutationClass};
pub use scope::{matches_scope, to_workspace_relative};
pub use types::{Intent, IntentStatus, ModelDescriptor, NativeArgs, TaskSession, ToolInvocation};
