// Casana-api lib.rs
//
// HTTP layer for the Casana vitals dashboard.
// It wires configuration, domain services and routes together.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
