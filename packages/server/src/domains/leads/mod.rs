pub mod actions;
pub mod estimator;
pub mod models;

// Re-export commonly used types
pub use estimator::{Estimator, EstimatorTables, SizeEstimate, SystemEstimate};
pub use models::{ApplyEnrichment, ClinicSize, CreditLedger, EmrSystem, Lead, LeadStats, NewLead};
