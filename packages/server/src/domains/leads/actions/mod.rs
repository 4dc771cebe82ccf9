//! Lead domain actions - business logic functions
//!
//! Actions orchestrate the model layer and the injected upstream clients.
//! They do the work and return plain result structs for the caller to render.

mod bulk_load;
mod recruit;
pub mod queries;

pub use bulk_load::{bulk_load_leads, BulkLoadResult};
pub use recruit::{recruit_leads, RecruitResult};
