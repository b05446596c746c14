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
pub enum RequestStatus {
    Pendente,
    Aprovada,
    Rejeitada,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pendente => f.write_str("PENDENTE"),
            RequestStatus::Aprovada => f.write_str("APROVADA"),
            RequestStatus::Rejeitada => f.write_str("REJEITADA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSortField {
    Applicant,
    Neighborhood,
    RequestedOn,
}

/// A citizen's application for a plot in a garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenRequest {
    pub id: EntityId,
    #[serde(rename = "nomeSolicitante")]
    pub applicant: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "dataSolicitacao", default)]
    pub requested_on: Option<String>,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for GardenRequest {
    type Status = RequestStatus;
    type SortField = RequestSortField;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn label(&self) -> &str {
        &self.applicant
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.applicant.as_str(), self.email.as_str(), self.neighborhood.as_str()]
    }

    fn sort_value(&self, field: RequestSortField) -> SortValue<'_> {
        match field {
            RequestSortField::Applicant => SortValue::Text(&self.applicant),
            RequestSortField::Neighborhood => SortValue::Text(&self.neighborhood),
            RequestSortField::RequestedOn => {
                SortValue::Date(self.requested_on.as_deref().and_then(parse_date))
            }
        }
    }
}

impl Resource for GardenRequest {
    const COLLECTION: &'static str = "solicitacoes";
    const STATUS_ROUTE: StatusRoute = StatusRoute::PutQuery { param: "status" };

    fn status_value(status: &RequestStatus) -> Value {
        Value::String(status.to_string())
    }
}
