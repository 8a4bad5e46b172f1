pub mod catalog;
pub mod client;
pub mod error;
pub mod generate;
pub mod resolve;

pub use client::{Upstream, API_BASE_URL, CATALOG_BASE_URL};
pub use error::UpstreamError;
pub use resolve::PROVIDER_SEPARATOR;
