//! In-memory entity and collection API for controller tests.

use std::{
    fmt,
    sync::{
        atomic::{
            AtomicBool,
            AtomicUsize,
            Ordering,
        },
        Mutex,
    },
};

use async_trait::async_trait;

use super::CollectionApi;
use crate::core::{
    utils::parse_date,
    ApiError,
    Entity,
    EntityId,
    SortValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlotStatus {
    Ativa,
    Inativa,
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotStatus::Ativa => f.write_str("ATIVA"),
            PlotStatus::Inativa => f.write_str("INATIVA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlotField {
    Name,
    Planted,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plot {
    pub id: EntityId,
    pub name: String,
    pub status: PlotStatus,
    pub planted: Option<String>,
    pub revision: u32,
}

pub(crate) fn plot(id: i64, name: &str, status: PlotStatus) -> Plot {
    Plot { id: EntityId::Int(id), name: name.to_string(), status, planted: None, revision: 0 }
}

impl Plot {
    pub fn planted(mut self, date: &str) -> Self {
        self.planted = Some(date.to_string());
        self
    }

    pub fn id_value(&self) -> i64 {
        match self.id {
            EntityId::Int(value) => value,
            EntityId::Text(_) => -1,
        }
    }
}

impl Entity for Plot {
    type Status = PlotStatus;
    type SortField = PlotField;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn status(&self) -> PlotStatus {
        self.status
    }

    fn set_status(&mut self, status: PlotStatus) {
        self.status = status;
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_value(&self, field: PlotField) -> SortValue<'_> {
        match field {
            PlotField::Name => SortValue::Text(&self.name),
            PlotField::Planted => SortValue::Date(self.planted.as_deref().and_then(parse_date)),
        }
    }
}

/// Server-of-record stand-in with switchable failures.
#[derive(Default)]
pub(crate) struct FakeApi {
    items: Mutex<Vec<Plot>>,
    fetch_failure: Mutex<Option<ApiError>>,
    update_failure: Mutex<Option<ApiError>>,
    server_copy: AtomicBool,
    panic_updates: AtomicBool,
    update_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new(items: Vec<Plot>) -> Self {
        Self { items: Mutex::new(items), ..Self::default() }
    }

    pub fn fail_fetch_with(&self, error: Option<ApiError>) {
        *self.fetch_failure.lock().unwrap() = error;
    }

    pub fn fail_updates_with(&self, error: Option<ApiError>) {
        *self.update_failure.lock().unwrap() = error;
    }

    pub fn return_server_copy(&self, enabled: bool) {
        self.server_copy.store(enabled, Ordering::SeqCst);
    }

    pub fn panic_on_update(&self, enabled: bool) {
        self.panic_updates.store(enabled, Ordering::SeqCst);
    }

    pub fn replace_server_items(&self, items: Vec<Plot>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn server_status(&self, id: i64) -> Option<PlotStatus> {
        self.items.lock().unwrap().iter().find(|p| p.id_value() == id).map(|p| p.status)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionApi<Plot> for FakeApi {
    fn resource_name(&self) -> &str {
        "plots"
    }

    async fn fetch_all(&self) -> Result<Vec<Plot>, ApiError> {
        if let Some(error) = self.fetch_failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn update_status(
        &self,
        id: &EntityId,
        status: &PlotStatus,
    ) -> Result<Option<Plot>, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if self.panic_updates.load(Ordering::SeqCst) {
            panic!("update handler blew up");
        }

        if let Some(error) = self.update_failure.lock().unwrap().clone() {
            return Err(error);
        }

        let mut items = self.items.lock().unwrap();
        let stored = items
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(ApiError::Status { status: 404, url: format!("plots/{}", id) })?;
        stored.status = *status;
        stored.revision += 1;

        if self.server_copy.load(Ordering::SeqCst) {
            Ok(Some(stored.clone()))
        } else {
            Ok(None)
        }
    }
}
