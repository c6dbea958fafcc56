pub mod insights;
pub mod vitals;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and types
pub use insights::{calculate_insights, StatusCounts, VitalsInsights};
pub use vitals::{
    AssessedReading, RankedAlert, RankedAlerts, VitalsService, VitalsServiceError, VitalsServiceTrait,
};
