use std::{
    collections::HashMap,
    panic::AssertUnwindSafe,
    sync::Arc,
};

use futures::FutureExt;
use tokio::{
    runtime::Handle,
    sync::mpsc,
};

use super::{
    sync::{
        PendingMutation,
        SyncEvent,
        SyncState,
    },
    view::{
        derive_view,
        ViewQuery,
    },
    CollectionApi,
};
use crate::{
    core::{
        ApiError,
        Entity,
        EntityId,
        ListError,
    },
    notices::NoticeBoard,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ListError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub id: EntityId,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettlementOutcome<S> {
    Confirmed { status: S },
    RolledBack { restored: S, error: ListError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<S> {
    pub id: EntityId,
    pub token: u64,
    pub outcome: SettlementOutcome<S>,
}

struct MutationResult<E> {
    id: EntityId,
    token: u64,
    outcome: Result<Option<E>, ApiError>,
}

/// Owns one page's collection and applies status changes optimistically.
///
/// Remote status updates run on `runtime`; their results are applied when
/// the owner calls [`ListController::poll_results`] or
/// [`ListController::settle`]. At most one mutation per entity is in flight.
pub struct ListController<E: Entity, A: CollectionApi<E>> {
    api: Arc<A>,
    runtime: Handle,
    items: Vec<E>,
    load_state: LoadState,
    pending: HashMap<EntityId, PendingMutation<E::Status>>,
    next_token: u64,
    notices: NoticeBoard,
    sender: mpsc::UnboundedSender<MutationResult<E>>,
    receiver: mpsc::UnboundedReceiver<MutationResult<E>>,
}

impl<E: Entity, A: CollectionApi<E>> ListController<E, A> {
    pub fn new(api: Arc<A>, runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            api,
            runtime,
            items: Vec::new(),
            load_state: LoadState::Idle,
            pending: HashMap::new(),
            next_token: 1,
            notices: NoticeBoard::new(),
            sender,
            receiver,
        }
    }

    pub fn resource_name(&self) -> &str {
        self.api.resource_name()
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn sync_state(&self, id: &EntityId) -> SyncState {
        if self.pending.contains_key(id) {
            SyncState::OptimisticPending
        } else {
            SyncState::Synced
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn view(&self, query: &ViewQuery<E>) -> Vec<&E> {
        derive_view(&self.items, query)
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn label_of(&self, index: Option<usize>, id: &EntityId) -> String {
        match index {
            Some(index) => self.items[index].label().to_string(),
            None => id.to_string(),
        }
    }

    /// Replaces the collection with the server's. Outstanding mutations are
    /// settled first. On failure the previous collection is kept.
    pub async fn load_all(&mut self) -> Result<&[E], ListError> {
        self.settle().await;
        self.load_state = LoadState::Loading;

        match self.api.fetch_all().await {
            Ok(items) => {
                tracing::info!(
                    resource = self.api.resource_name(),
                    count = items.len(),
                    "collection loaded"
                );
                self.items = items;
                self.load_state = LoadState::Ready;
                Ok(&self.items)
            }
            Err(source) => {
                let resource = self.api.resource_name().to_string();
                if !source.is_auth() {
                    self.notices.error(format!("Could not load {}: {}", resource, source));
                }

                let error = ListError::Fetch { resource, source };
                tracing::warn!(%error, "collection load failed");
                self.load_state = LoadState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Applies `status` locally right away and sends it to the server.
    pub fn set_status(
        &mut self,
        id: &EntityId,
        status: E::Status,
    ) -> Result<MutationTicket, ListError> {
        let index = self.position(id).ok_or_else(|| ListError::UnknownEntity(id.clone()))?;

        if self.sync_state(id).on(SyncEvent::UserAction).is_none() {
            return Err(ListError::MutationPending(id.clone()));
        }

        let previous = self.items[index].status();
        self.items[index].set_status(status.clone());

        let token = self.next_token;
        self.next_token += 1;

        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        let task_id = id.clone();
        let requested = status.clone();
        let handle = self.runtime.spawn(async move {
            let outcome = AssertUnwindSafe(api.update_status(&task_id, &requested))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(ApiError::Transport {
                        url: api.resource_name().to_string(),
                        message: "status update task panicked".to_string(),
                    })
                });
            let _ = sender.send(MutationResult { id: task_id, token, outcome });
        });

        tracing::debug!(
            resource = self.api.resource_name(),
            %id,
            token,
            from = %previous,
            to = %status,
            "optimistic status applied"
        );

        self.pending.insert(
            id.clone(),
            PendingMutation { token, previous, requested: status, task: handle.abort_handle() },
        );

        Ok(MutationTicket { id: id.clone(), token })
    }

    /// Applies every mutation result that has already arrived.
    pub fn poll_results(&mut self) -> Vec<Settlement<E::Status>> {
        let mut settlements = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            settlements.extend(self.apply_result(result));
        }

        settlements
    }

    /// Waits until no mutation is outstanding.
    pub async fn settle(&mut self) -> Vec<Settlement<E::Status>> {
        let mut settlements = self.poll_results();

        while !self.pending.is_empty() {
            match self.receiver.recv().await {
                Some(result) => settlements.extend(self.apply_result(result)),
                None => break,
            }
        }

        settlements
    }

    fn apply_result(&mut self, result: MutationResult<E>) -> Option<Settlement<E::Status>> {
        let MutationResult { id, token, outcome } = result;

        let pending = match self.pending.remove(&id) {
            Some(pending) if pending.token == token => pending,
            Some(other) => {
                self.pending.insert(id.clone(), other);
                tracing::debug!(%id, token, "discarding stale mutation result");
                return None;
            }
            None => {
                tracing::debug!(%id, token, "discarding mutation result with nothing pending");
                return None;
            }
        };

        let index = self.position(&id);

        match outcome {
            Ok(server_copy) => {
                if let (Some(index), Some(server_copy)) = (index, server_copy) {
                    if server_copy.id() == &id {
                        self.items[index] = server_copy;
                    }
                }

                let status = match index {
                    Some(index) => self.items[index].status(),
                    None => pending.requested,
                };
                let label = self.label_of(index, &id);
                let state = SyncState::OptimisticPending.on(SyncEvent::RemoteAck);

                tracing::info!(
                    resource = self.api.resource_name(),
                    %id,
                    token,
                    %status,
                    ?state,
                    "status update confirmed"
                );
                self.notices.success(format!("{} is now {}", label, status));

                Some(Settlement { id, token, outcome: SettlementOutcome::Confirmed { status } })
            }
            Err(source) => {
                let rolling_back = SyncState::OptimisticPending.on(SyncEvent::RemoteReject);
                if let Some(index) = index {
                    self.items[index].set_status(pending.previous.clone());
                }
                let state = rolling_back.and_then(|state| state.on(SyncEvent::Restored));

                let label = self.label_of(index, &id);
                if !source.is_auth() {
                    self.notices.error(format!("Could not update {}: {}", label, source));
                }

                tracing::warn!(
                    resource = self.api.resource_name(),
                    %id,
                    token,
                    restored = %pending.previous,
                    error = %source,
                    ?state,
                    "status update rolled back"
                );

                Some(Settlement {
                    id,
                    token,
                    outcome: SettlementOutcome::RolledBack {
                        restored: pending.previous,
                        error: ListError::Update { label, source },
                    },
                })
            }
        }
    }

    /// Tears the page down: in-flight mutations are aborted and their late
    /// results are never applied.
    pub fn dispose(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.task.abort();
        }
        while self.receiver.try_recv().is_ok() {}

        self.items.clear();
        self.notices.clear();
        self.load_state = LoadState::Idle;
    }
}

impl<E: Entity, A: CollectionApi<E>> Drop for ListController<E, A> {
    fn drop(&mut self) {
        for pending in self.pending.values() {
            pending.task.abort();
        }
    }
}
