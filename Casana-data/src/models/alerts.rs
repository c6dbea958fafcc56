use serde::{Deserialize, Serialize};

use super::vitals::VendorVitalReading;

/// An alert as returned by the vendor API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorAlert {
    /// Vendor alert identifier
    pub id: Option<String>,

    /// Monitored user the alert belongs to
    pub user_id: Option<String>,

    /// Display name of the monitored user
    pub user_name: Option<String>,

    /// Reason codes attached by the vendor (may be empty)
    #[serde(default, alias = "alert_reasons")]
    pub reasons: Vec<String>,

    /// When the alert was raised
    #[serde(alias = "created_at")]
    pub timestamp: Option<String>,

    /// The reading that triggered the alert, when the vendor embeds it
    pub reading: Option<VendorVitalReading>,
}
