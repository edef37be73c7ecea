use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Cancellation scope for one mount of a screen.
///
/// Every request issued on behalf of the screen runs under a child token of
/// the session, so tearing the session down abandons all of them at once,
/// while a single request can still be abandoned on its own (for example
/// when the filter changes).
#[derive(Debug, Clone)]
pub struct SyncSession {
    id: Uuid,
    token: CancellationToken,
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        }
    }

    /// A session nested in `parent`: cancelled when the parent is.
    pub fn child_of(parent: &SyncSession) -> Self {
        Self {
            id: parent.id,
            token: parent.token.child_token(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Token for a single request within this session.
    pub fn request_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!(session = %self.id, "Cancelling sync session");
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}
