use std::fmt;

use chrono::NaiveDateTime;
use serde::{
    Deserialize,
    Serialize,
};

/// Opaque record identifier, as handed out by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(value) => write!(f, "{}", value),
            EntityId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Text(value)
    }
}

/// Value an entity exposes for one of its sort fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Date(Option<NaiveDateTime>),
    Number(Option<i64>),
}

/// A record held in a client-side collection.
///
/// `status` is the field mutated independently of full-entity edits.
pub trait Entity: Clone + Send + Sync + 'static {
    type Status: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    type SortField: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &EntityId;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Human readable name used in notices.
    fn label(&self) -> &str;

    /// Display fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    fn sort_value(&self, field: Self::SortField) -> SortValue<'_>;
}
