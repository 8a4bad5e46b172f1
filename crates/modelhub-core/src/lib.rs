pub mod core;
pub mod handlers;

pub use crate::core::{Core, CoreState};
