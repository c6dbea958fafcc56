//! Alert prioritisation: severity lookup, ordering, tallies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::classifier::{BloodPressureStage, HeartRateStatus, SitDurationStatus, SpO2Status};
use super::taxonomy::{standard_taxonomy, AlertReason, AlertTaxonomy, Severity};
use super::thresholds::{standard_thresholds, ThresholdTable};
use crate::entities::{AlertRecord, VitalReading};

/// Severity totals across a set of alerts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AlertSummary {
    /// Number of alert records
    pub total: usize,
    /// Records whose highest reason is critical
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Records with no reason codes at all
    pub unclassified: usize,
    /// Occurrences of each reason code, in first-seen order
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub by_reason: IndexMap<String, usize>,
}

impl AlertTaxonomy {
    /// Highest severity among the codes, 0 when there are none
    pub fn max_severity<S: AsRef<str>>(&self, codes: &[S]) -> u8 {
        codes
            .iter()
            .map(|code| self.severity(code.as_ref()).level())
            .max()
            .unwrap_or(0)
    }

    /// Most severe first, then most recent first; equal keys keep input order
    pub fn sort_by_severity(&self, alerts: Vec<AlertRecord>) -> Vec<AlertRecord> {
        let mut keyed: Vec<(u8, i64, AlertRecord)> = alerts
            .into_iter()
            .map(|alert| (self.max_severity(&alert.reasons), alert.timestamp_millis(), alert))
            .collect();

        // `sort_by` is stable
        keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        keyed.into_iter().map(|(_, _, alert)| alert).collect()
    }

    pub fn summarize(&self, alerts: &[AlertRecord]) -> AlertSummary {
        let mut summary = AlertSummary {
            total: alerts.len(),
            by_reason: count_alerts_by_reason(alerts),
            ..Default::default()
        };

        for alert in alerts {
            match self.max_severity(&alert.reasons) {
                0 => summary.unclassified += 1,
                level => match Severity::from_level(i64::from(level)) {
                    Severity::Critical => summary.critical += 1,
                    Severity::High => summary.high += 1,
                    Severity::Medium => summary.medium += 1,
                    Severity::Low => summary.low += 1,
                },
            }
        }

        summary
    }
}

impl ThresholdTable {
    /// Reason codes a reading triggers, most severe first
    pub fn alert_reasons(&self, reading: &VitalReading, taxonomy: &AlertTaxonomy) -> Vec<AlertReason> {
        let mut reasons = Vec::new();

        let stage = self.blood_pressure_stage(reading.systolic(), reading.diastolic());
        match stage {
            BloodPressureStage::Crisis => reasons.push(AlertReason::HypertensiveCrisis),
            BloodPressureStage::Stage2 => reasons.push(AlertReason::Hypertension),
            _ if reading.is_hypertensive() => reasons.push(AlertReason::Hypertension),
            BloodPressureStage::Stage1 | BloodPressureStage::Elevated => {
                reasons.push(AlertReason::ElevatedBloodPressure)
            }
            BloodPressureStage::Hypotension => reasons.push(AlertReason::Hypotension),
            BloodPressureStage::Normal => {
                let diastolic = reading.diastolic();
                if reading.has_blood_pressure() && diastolic > 0 && diastolic < self.blood_pressure.low_diastolic {
                    reasons.push(AlertReason::Hypotension);
                }
            }
        }

        match self.spo2_status(reading.spo2()) {
            SpO2Status::Critical => reasons.push(AlertReason::CriticalSpO2),
            SpO2Status::Low => reasons.push(AlertReason::LowSpO2),
            SpO2Status::MildLow | SpO2Status::Normal => {}
        }

        match self.heart_rate_status(reading.heart_rate()) {
            HeartRateStatus::VeryHigh => reasons.push(AlertReason::Tachycardia),
            HeartRateStatus::VeryLow => reasons.push(AlertReason::Bradycardia),
            HeartRateStatus::High => reasons.push(AlertReason::HighHeartRate),
            HeartRateStatus::Low => reasons.push(AlertReason::LowHeartRate),
            HeartRateStatus::Normal => {}
        }

        match self.sit_duration_status(reading.duration_seconds()) {
            SitDurationStatus::VeryExtended => reasons.push(AlertReason::VeryExtendedSit),
            SitDurationStatus::Extended => reasons.push(AlertReason::ExtendedSit),
            SitDurationStatus::Normal => {}
        }

        reasons.sort_by_key(|reason| std::cmp::Reverse(taxonomy.severity(reason.code())));
        reasons
    }
}

/// Highest severity among reason codes against the standard taxonomy
pub fn get_max_severity<S: AsRef<str>>(codes: &[S]) -> u8 {
    standard_taxonomy().max_severity(codes)
}

/// Order alerts by severity then recency against the standard taxonomy
pub fn sort_alerts_by_severity(alerts: Vec<AlertRecord>) -> Vec<AlertRecord> {
    standard_taxonomy().sort_by_severity(alerts)
}

/// Tally every reason code across the alerts
pub fn count_alerts_by_reason(alerts: &[AlertRecord]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for reason in alerts.iter().flat_map(|alert| alert.reasons.iter()) {
        *counts.entry(reason.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn summarize_alerts(alerts: &[AlertRecord]) -> AlertSummary {
    standard_taxonomy().summarize(alerts)
}

/// Reason codes a reading triggers against the standard tables
pub fn derive_alert_reasons(reading: &VitalReading) -> Vec<AlertReason> {
    standard_thresholds().alert_reasons(reading, standard_taxonomy())
}
