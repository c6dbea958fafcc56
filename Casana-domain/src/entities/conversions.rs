use casana_data::models::{VendorAlert, VendorVitalReading};

use super::{AlertRecord, VitalReading};

/// Conversion functions between vendor payloads and domain entities.
/// These follow the pattern convert_to_[target_layer]_[model_name].

/// Convert a vendor result into a domain reading
pub fn convert_to_domain_reading(vendor: VendorVitalReading) -> VitalReading {
    VitalReading {
        id: vendor.id,
        user_id: vendor.user_id,
        systolic: vendor.bp_systolic,
        diastolic: vendor.bp_diastolic,
        htn: vendor.htn,
        spo2: vendor.blood_oxygenation,
        heart_rate: vendor.heart_rate,
        hrv: vendor.hrv,
        agility_score: vendor.agility_score,
        duration_seconds: vendor.duration_seconds,
        timestamp: vendor.timestamp,
    }
}

/// Convert a vendor alert into a domain alert record
pub fn convert_to_domain_alert(vendor: VendorAlert) -> AlertRecord {
    AlertRecord {
        id: vendor.id,
        user_id: vendor.user_id,
        user_name: vendor.user_name,
        reasons: vendor.reasons,
        timestamp: vendor.timestamp,
        reading: vendor.reading.map(convert_to_domain_reading),
    }
}
