// Casana Domain
// This crate contains the vitals rules engine and business logic for the Casana dashboard

// Threshold table, classifiers, aggregate status, alert taxonomy and ranking
pub mod rules;

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;
