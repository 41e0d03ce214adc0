// RPTO Leads - app/mod.rs
//
// Application layer: the lead store and the workflow built on it.

pub mod leads;
pub mod store;
