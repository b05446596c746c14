//! Client-held collections kept in sync with the API.

pub mod controller;
pub mod filter;
pub mod sort;
pub mod sync;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use controller::{
    ListController,
    LoadState,
    MutationTicket,
    Settlement,
    SettlementOutcome,
};
pub use filter::StatusFilter;
pub use sort::{
    SortDirection,
    SortState,
};
pub use sync::SyncState;
pub use view::{
    derive_view,
    ViewQuery,
};

use crate::core::{
    ApiError,
    Entity,
    EntityId,
};

/// Remote side of one collection.
#[async_trait]
pub trait CollectionApi<E: Entity>: Send + Sync + 'static {
    /// Name used in notices and logs.
    fn resource_name(&self) -> &str;

    async fn fetch_all(&self) -> Result<Vec<E>, ApiError>;

    /// `Ok(None)` is an empty success; `Ok(Some(_))` is the server's copy.
    async fn update_status(&self, id: &EntityId, status: &E::Status) -> Result<Option<E>, ApiError>;
}
