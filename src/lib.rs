pub mod admin;
pub mod app;
pub mod core;
pub mod list;
pub mod notices;
pub mod persistence;

pub use admin::AdminPanel;
pub use app::{
    AppShell,
    Route,
};
pub use crate::core::{
    ApiClient,
    ApiError,
    Config,
    Entity,
    EntityId,
    HortasError,
    ListError,
};
pub use list::{
    derive_view,
    ListController,
    ViewQuery,
};
pub use notices::{
    Notice,
    NoticeBoard,
    NoticeKind,
};
