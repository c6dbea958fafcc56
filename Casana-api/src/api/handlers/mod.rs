pub mod alerts;
pub mod health;
pub mod thresholds;
pub mod vitals;

// Re-export handlers for easier imports
pub use alerts::{get_alert_badge, get_alert_info, get_alerts, get_taxonomy, rank_alerts};
pub use health::health_check;
pub use thresholds::get_thresholds;
pub use vitals::{assess_reading, get_latest_vitals, get_user_insights, get_user_vitals};
