// Casana Data
// This crate handles access to the vendor API that owns all monitoring data

// Vendor payload models
pub mod models;

// Repository implementations for data access
pub mod repository;
