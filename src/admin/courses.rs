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

/// Courses carry a boolean `ativo`; this is how it is shown and toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseState {
    Ativo,
    Inativo,
}

impl CourseState {
    pub fn is_active(self) -> bool {
        self == CourseState::Ativo
    }
}

impl From<bool> for CourseState {
    fn from(active: bool) -> Self {
        if active {
            CourseState::Ativo
        } else {
            CourseState::Inativo
        }
    }
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseState::Ativo => f.write_str("ATIVO"),
            CourseState::Inativo => f.write_str("INATIVO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSortField {
    Title,
    Instructor,
    StartsOn,
    Seats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "instrutor", default)]
    pub instructor: String,
    #[serde(rename = "dataInicio", default)]
    pub starts_on: Option<String>,
    #[serde(rename = "vagas", default)]
    pub seats: Option<i64>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for Course {
    type Status = CourseState;
    type SortField = CourseSortField;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn status(&self) -> CourseState {
        CourseState::from(self.active)
    }

    fn set_status(&mut self, status: CourseState) {
        self.active = status.is_active();
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.instructor.as_str()]
    }

    fn sort_value(&self, field: CourseSortField) -> SortValue<'_> {
        match field {
            CourseSortField::Title => SortValue::Text(&self.title),
            CourseSortField::Instructor => SortValue::Text(&self.instructor),
            CourseSortField::StartsOn => {
                SortValue::Date(self.starts_on.as_deref().and_then(parse_date))
            }
            CourseSortField::Seats => SortValue::Number(self.seats),
        }
    }
}

impl Resource for Course {
    const COLLECTION: &'static str = "cursos";
    const STATUS_ROUTE: StatusRoute = StatusRoute::PutQuery { param: "ativo" };

    fn status_value(status: &CourseState) -> Value {
        Value::Bool(status.is_active())
    }
}
