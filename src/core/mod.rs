// RPTO Leads - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or any file/network I/O.

pub mod export;
pub mod filter;
pub mod greeting;
pub mod import;
pub mod model;
pub mod timeline;
