use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::core::{
    utils::parse_date,
    Entity,
    EntityId,
    Resource,
    SortValue,
    StatusRoute,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GardenStatus {
    Ativa,
    Inativa,
}

impl fmt::Display for GardenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GardenStatus::Ativa => f.write_str("ATIVA"),
            GardenStatus::Inativa => f.write_str("INATIVA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenSortField {
    Name,
    Neighborhood,
    CreatedAt,
    PlotCount,
}

/// A community garden ("horta") managed by the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    pub id: EntityId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    pub status: GardenStatus,
    #[serde(rename = "dataCriacao", default)]
    pub created_at: Option<String>,
    #[serde(rename = "quantidadeCanteiros", default)]
    pub plot_count: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for Garden {
    type Status = GardenStatus;
    type SortField = GardenSortField;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn status(&self) -> GardenStatus {
        self.status
    }

    fn set_status(&mut self, status: GardenStatus) {
        self.status = status;
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.address.as_str(), self.neighborhood.as_str()]
    }

    fn sort_value(&self, field: GardenSortField) -> SortValue<'_> {
        match field {
            GardenSortField::Name => SortValue::Text(&self.name),
            GardenSortField::Neighborhood => SortValue::Text(&self.neighborhood),
            GardenSortField::CreatedAt => {
                SortValue::Date(self.created_at.as_deref().and_then(parse_date))
            }
            GardenSortField::PlotCount => SortValue::Number(self.plot_count),
        }
    }
}

impl Resource for Garden {
    const COLLECTION: &'static str = "hortas";
    const STATUS_ROUTE: StatusRoute = StatusRoute::Patch { field: "status" };

    fn status_value(status: &GardenStatus) -> Value {
        Value::String(status.to_string())
    }
}
