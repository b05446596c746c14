pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod models;
pub mod session;
pub mod utils;

pub use config::Config;
pub use errors::{
    ApiError,
    HortasError,
    ListError,
};
pub use http::{
    ApiClient,
    Credentials,
    Resource,
    RestCollection,
    StatusRoute,
};
pub use models::{
    Entity,
    EntityId,
    SortValue,
};
pub use session::{
    SessionEvent,
    SessionManager,
};
