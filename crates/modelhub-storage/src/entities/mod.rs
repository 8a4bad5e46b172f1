pub mod api_keys;
pub mod status_checks;

pub use api_keys::Entity as ApiKeys;
pub use status_checks::Entity as StatusChecks;
