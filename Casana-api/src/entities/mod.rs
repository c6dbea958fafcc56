// Public entities for the Casana API
// This module contains data structures that cross the HTTP boundary

// Query parameters for reading history and insights
pub mod vitals;

// Alert queue, ranking and taxonomy payloads
pub mod alerts;

// Common entities for error handling, pagination, etc.
pub mod common;

pub use common::{ErrorResponse, PaginatedResponse};
