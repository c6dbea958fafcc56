//! Alert reason registry.
//!
//! Known reason codes are a closed enum so every code has metadata checked
//! at compile time. Any other upstream string becomes
//! [`AlertReason::Unknown`] and gets a synthesized entry instead of an error.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::thresholds::{standard_thresholds, ThresholdTable};

const FALLBACK_ICON: &str = "bi-exclamation-circle";
const FALLBACK_COLOR: &str = "secondary";
const FALLBACK_LABEL: &str = "Unknown Alert";

static STANDARD_TAXONOMY: Lazy<AlertTaxonomy> =
    Lazy::new(|| AlertTaxonomy::new(standard_thresholds()));

/// Taxonomy built from the standard threshold table
pub fn standard_taxonomy() -> &'static AlertTaxonomy {
    &STANDARD_TAXONOMY
}

/// Clinical urgency of an alert reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    /// All levels, least urgent first
    pub const ALL: [Severity; 4] = [Severity::Low, Severity::Medium, Severity::High, Severity::Critical];

    /// Map a numeric level; anything outside 1-4 is Medium
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Severity::Low,
            2 => Severity::Medium,
            3 => Severity::High,
            4 => Severity::Critical,
            _ => Severity::Medium,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Severity::Low => "Informational; review at the next check-in",
            Severity::Medium => "Monitor and review within 24 hours",
            Severity::High => "Needs prompt attention from the care team",
            Severity::Critical => "Requires immediate attention",
        }
    }
}

impl From<u8> for Severity {
    fn from(level: u8) -> Self {
        Severity::from_level(i64::from(level))
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Label and description for a severity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SeverityInfo {
    pub level: u8,
    pub label: String,
    pub description: String,
}

impl From<Severity> for SeverityInfo {
    fn from(severity: Severity) -> Self {
        Self {
            level: severity.level(),
            label: severity.label().to_string(),
            description: severity.description().to_string(),
        }
    }
}

/// Look up a severity level; unknown levels fall back to Medium
pub fn get_severity_info(level: i64) -> SeverityInfo {
    Severity::from_level(level).into()
}

/// Alert reason code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertReason {
    HypertensiveCrisis,
    Hypertension,
    ElevatedBloodPressure,
    Hypotension,
    CriticalSpO2,
    LowSpO2,
    Tachycardia,
    Bradycardia,
    HighHeartRate,
    LowHeartRate,
    ExtendedSit,
    VeryExtendedSit,
    /// Any code the registry does not know, kept verbatim
    Unknown(String),
}

impl AlertReason {
    /// Every known reason, in registry order
    pub fn known() -> [AlertReason; 12] {
        [
            AlertReason::HypertensiveCrisis,
            AlertReason::Hypertension,
            AlertReason::ElevatedBloodPressure,
            AlertReason::Hypotension,
            AlertReason::CriticalSpO2,
            AlertReason::LowSpO2,
            AlertReason::Tachycardia,
            AlertReason::Bradycardia,
            AlertReason::HighHeartRate,
            AlertReason::LowHeartRate,
            AlertReason::ExtendedSit,
            AlertReason::VeryExtendedSit,
        ]
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "hypertensive_crisis" => AlertReason::HypertensiveCrisis,
            "hypertension" => AlertReason::Hypertension,
            "elevated_bp" => AlertReason::ElevatedBloodPressure,
            "hypotension" => AlertReason::Hypotension,
            "critical_spo2" => AlertReason::CriticalSpO2,
            "low_spo2" => AlertReason::LowSpO2,
            "tachycardia" => AlertReason::Tachycardia,
            "bradycardia" => AlertReason::Bradycardia,
            "high_heart_rate" => AlertReason::HighHeartRate,
            "low_heart_rate" => AlertReason::LowHeartRate,
            "extended_sit" => AlertReason::ExtendedSit,
            "very_extended_sit" => AlertReason::VeryExtendedSit,
            other => AlertReason::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            AlertReason::HypertensiveCrisis => "hypertensive_crisis",
            AlertReason::Hypertension => "hypertension",
            AlertReason::ElevatedBloodPressure => "elevated_bp",
            AlertReason::Hypotension => "hypotension",
            AlertReason::CriticalSpO2 => "critical_spo2",
            AlertReason::LowSpO2 => "low_spo2",
            AlertReason::Tachycardia => "tachycardia",
            AlertReason::Bradycardia => "bradycardia",
            AlertReason::HighHeartRate => "high_heart_rate",
            AlertReason::LowHeartRate => "low_heart_rate",
            AlertReason::ExtendedSit => "extended_sit",
            AlertReason::VeryExtendedSit => "very_extended_sit",
            AlertReason::Unknown(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AlertReason::Unknown(_))
    }

    /// Registry metadata; `Unknown` gets the synthesized fallback
    pub fn entry(&self, thresholds: &ThresholdTable) -> AlertTaxonomyEntry {
        let bp = &thresholds.blood_pressure;
        let spo2 = &thresholds.spo2;
        let hr = &thresholds.heart_rate;
        let sit = &thresholds.sit_duration;

        let (label, short_label, description, severity, icon, color, threshold) = match self {
            AlertReason::HypertensiveCrisis => (
                "Hypertensive Crisis",
                "BP Crisis",
                "Blood pressure is in the crisis range",
                Severity::Critical,
                "bi-exclamation-octagon-fill",
                "danger",
                format!("Systolic ≥{} or diastolic ≥{} mmHg", bp.crisis_systolic, bp.crisis_diastolic),
            ),
            AlertReason::Hypertension => (
                "Hypertension",
                "HTN",
                "Blood pressure reading flagged as hypertensive",
                Severity::High,
                "bi-heart-pulse-fill",
                "danger",
                format!("Systolic ≥{} or diastolic ≥{} mmHg", bp.stage2_systolic, bp.stage2_diastolic),
            ),
            AlertReason::ElevatedBloodPressure => (
                "Elevated Blood Pressure",
                "Elevated BP",
                "Blood pressure above the normal range",
                Severity::Medium,
                "bi-arrow-up-circle",
                "warning",
                format!(
                    "Systolic {}-{} or diastolic {}-{} mmHg",
                    bp.elevated_systolic,
                    bp.stage2_systolic - 1,
                    bp.stage1_diastolic,
                    bp.stage2_diastolic - 1
                ),
            ),
            AlertReason::Hypotension => (
                "Hypotension",
                "Low BP",
                "Blood pressure below the normal range",
                Severity::High,
                "bi-arrow-down-circle",
                "warning",
                format!("Systolic <{} or diastolic <{} mmHg", bp.low_systolic, bp.low_diastolic),
            ),
            AlertReason::CriticalSpO2 => (
                "Critical Blood Oxygen",
                "Crit SpO2",
                "Oxygen saturation is critically low",
                Severity::Critical,
                "bi-lungs-fill",
                "danger",
                format!("SpO2 <{}%", spo2.severe_critical_max + 1.0),
            ),
            AlertReason::LowSpO2 => (
                "Low Blood Oxygen",
                "Low SpO2",
                "Oxygen saturation below the safe range",
                Severity::High,
                "bi-lungs",
                "warning",
                format!("SpO2 <{}%", spo2.critical_max + 1.0),
            ),
            AlertReason::Tachycardia => (
                "Tachycardia",
                "High HR",
                "Heart rate is severely elevated",
                Severity::High,
                "bi-activity",
                "danger",
                format!("Heart rate >{} bpm", hr.severe_tachycardia),
            ),
            AlertReason::Bradycardia => (
                "Bradycardia",
                "Low HR",
                "Heart rate is severely depressed",
                Severity::High,
                "bi-activity",
                "danger",
                format!("Heart rate <{} bpm", hr.severe_bradycardia),
            ),
            AlertReason::HighHeartRate => (
                "Elevated Heart Rate",
                "HR ↑",
                "Heart rate above the normal range",
                Severity::Medium,
                "bi-heart-pulse",
                "warning",
                format!("Heart rate >{} bpm", hr.normal_max),
            ),
            AlertReason::LowHeartRate => (
                "Low Heart Rate",
                "HR ↓",
                "Heart rate below the normal range",
                Severity::Medium,
                "bi-heart-pulse",
                "warning",
                format!("Heart rate <{} bpm", hr.normal_min),
            ),
            AlertReason::ExtendedSit => (
                "Extended Sit",
                "Long Sit",
                "Sit lasted longer than expected",
                Severity::Low,
                "bi-clock-history",
                "info",
                format!(
                    "Sit longer than {} seconds ({} min)",
                    sit.extended_seconds,
                    sit.extended_seconds / 60
                ),
            ),
            AlertReason::VeryExtendedSit => (
                "Very Extended Sit",
                "Very Long Sit",
                "Sit lasted much longer than expected; check on the user",
                Severity::Medium,
                "bi-clock-fill",
                "warning",
                format!(
                    "Sit longer than {} seconds ({} min)",
                    sit.very_extended_seconds,
                    sit.very_extended_seconds / 60
                ),
            ),
            AlertReason::Unknown(code) => return fallback_entry(code),
        };

        AlertTaxonomyEntry {
            id: self.code().to_string(),
            label: label.to_string(),
            short_label: short_label.to_string(),
            description: description.to_string(),
            severity,
            icon: icon.to_string(),
            color: color.to_string(),
            threshold,
        }
    }
}

impl From<String> for AlertReason {
    fn from(code: String) -> Self {
        AlertReason::from_code(&code)
    }
}

impl From<AlertReason> for String {
    fn from(reason: AlertReason) -> Self {
        match reason {
            AlertReason::Unknown(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl fmt::Display for AlertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Turn `low_battery` into `Low Battery`
pub fn humanize_code(code: &str) -> String {
    code.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fallback_entry(code: &str) -> AlertTaxonomyEntry {
    let mut label = humanize_code(code);
    if label.is_empty() {
        label = FALLBACK_LABEL.to_string();
    }

    AlertTaxonomyEntry {
        id: code.to_string(),
        short_label: label.clone(),
        description: format!("Alert: {}", label),
        label,
        severity: Severity::Medium,
        icon: FALLBACK_ICON.to_string(),
        color: FALLBACK_COLOR.to_string(),
        threshold: "Not defined".to_string(),
    }
}

/// Display metadata for one reason code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AlertTaxonomyEntry {
    /// The reason code
    pub id: String,
    pub label: String,
    pub short_label: String,
    pub description: String,
    /// 1 (low) to 4 (critical)
    #[cfg_attr(feature = "with-api", schema(value_type = u8))]
    pub severity: Severity,
    /// Bootstrap icon class
    pub icon: String,
    /// Bootstrap color name
    pub color: String,
    /// Human-readable trigger condition
    pub threshold: String,
}

/// Badge content for a reason code; `label` is not escaped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AlertBadge {
    pub code: String,
    pub label: String,
    pub icon: Option<String>,
    pub color: String,
    #[cfg_attr(feature = "with-api", schema(value_type = u8))]
    pub severity: Severity,
}

/// Registry of reason metadata for one threshold table
#[derive(Debug, Clone)]
pub struct AlertTaxonomy {
    entries: IndexMap<String, AlertTaxonomyEntry>,
}

impl AlertTaxonomy {
    /// Build the registry; threshold text comes from `thresholds`
    pub fn new(thresholds: &ThresholdTable) -> Self {
        let entries = AlertReason::known()
            .iter()
            .map(|reason| (reason.code().to_string(), reason.entry(thresholds)))
            .collect();
        Self { entries }
    }

    /// Metadata for a code; unknown codes get the fallback entry
    pub fn info(&self, code: &str) -> AlertTaxonomyEntry {
        self.entries
            .get(code)
            .cloned()
            .unwrap_or_else(|| fallback_entry(code))
    }

    pub fn severity(&self, code: &str) -> Severity {
        self.entries
            .get(code)
            .map(|entry| entry.severity)
            .unwrap_or(Severity::Medium)
    }

    /// Known entries in registry order
    pub fn entries(&self) -> impl Iterator<Item = &AlertTaxonomyEntry> {
        self.entries.values()
    }

    pub fn badge(&self, code: &str, show_icon: bool, use_short_label: bool) -> AlertBadge {
        let entry = self.info(code);
        AlertBadge {
            code: entry.id,
            label: if use_short_label { entry.short_label } else { entry.label },
            icon: show_icon.then_some(entry.icon),
            color: entry.color,
            severity: entry.severity,
        }
    }
}

/// Metadata for a reason code from the standard taxonomy
pub fn get_alert_info(code: &str) -> AlertTaxonomyEntry {
    standard_taxonomy().info(code)
}

/// Badge content for a reason code from the standard taxonomy
pub fn render_alert_badge(code: &str, show_icon: bool, use_short_label: bool) -> AlertBadge {
    standard_taxonomy().badge(code, show_icon, use_short_label)
}
