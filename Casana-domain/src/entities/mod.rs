// Domain entities and value objects
pub mod alerts;
pub mod conversions;
pub mod vitals;

// Re-export common types for easier imports
pub use alerts::AlertRecord;
pub use vitals::VitalReading;
