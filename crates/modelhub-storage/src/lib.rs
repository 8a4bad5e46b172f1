pub mod entities;
pub mod store;

pub use sea_orm::DbErr;
pub use store::{HubStorage, STATUS_LIST_LIMIT};
