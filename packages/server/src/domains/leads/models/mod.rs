pub mod credit_ledger;
pub mod lead;

pub use credit_ledger::CreditLedger;
pub use lead::{ApplyEnrichment, ClinicSize, EmrSystem, Lead, LeadStats, NewLead};
