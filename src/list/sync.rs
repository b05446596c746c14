use tokio::task::AbortHandle;

/// Where an entity's status stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Synced,
    OptimisticPending,
    RollingBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    UserAction,
    RemoteAck,
    RemoteReject,
    Restored,
}

impl SyncState {
    /// `None` means the event is not accepted in this state.
    pub fn on(self, event: SyncEvent) -> Option<SyncState> {
        use SyncEvent::*;
        use SyncState::*;

        match (self, event) {
            (Synced, UserAction) => Some(OptimisticPending),
            (OptimisticPending, RemoteAck) => Some(Synced),
            (OptimisticPending, RemoteReject) => Some(RollingBack),
            (RollingBack, Restored) => Some(Synced),
            _ => None,
        }
    }
}

/// Outstanding optimistic change on one entity.
#[derive(Debug)]
pub(crate) struct PendingMutation<S> {
    pub token: u64,
    pub previous: S,
    pub requested: S,
    pub task: AbortHandle,
}
