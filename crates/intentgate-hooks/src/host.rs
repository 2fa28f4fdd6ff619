//! Host integration — capabilities the editor host supplies
//!
//! The kernel never renders UI. When the authorization hook needs a human
//! decision it calls through this trait; the host owns the modal, its
//! timeout, and whatever "dismiss" means in its surface.

/// How the human answered the approval modal. Anything other than an
/// explicit approval (including dismissing the dialog) denies the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalResponse {
    Approved,
    Rejected,
    Dismissed,
}

#[async_trait::async_trait]
pub trait ApprovalHandler: Send + Sync {
    /// Present `message` to the human and await their verdict.
    async fn request_approval(&self, message: &str) -> ApprovalResponse;
}

/// Approves everything. For headless runs and tests; pair it with a
/// populated bypass list in anything resembling production.
pub struct AutoApprove;

#[async_trait::async_trait]
impl ApprovalHandler for AutoApprove {
    async fn request_approval(&self, _message: &str) -> ApprovalResponse {
        ApprovalResponse::Approved
    }
}
