use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::VitalReading;
use crate::rules::{BloodPressureStage, HealthStatus, ThresholdTable};
use crate::services::vitals::VitalsServiceError;

/// How many readings landed in each aggregate status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct StatusCounts {
    pub good: usize,
    pub warning: usize,
    pub alert: usize,
}

impl StatusCounts {
    fn record(&mut self, status: HealthStatus) {
        match status {
            HealthStatus::Good => self.good += 1,
            HealthStatus::Warning => self.warning += 1,
            HealthStatus::Alert => self.alert += 1,
        }
    }
}

/// Summary statistics over a user's readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsInsights {
    /// Averages and extremes cover only readings with blood pressure
    pub avg_systolic: Option<f64>,
    pub avg_diastolic: Option<f64>,
    pub max_systolic: Option<i32>,
    pub max_diastolic: Option<i32>,
    pub min_systolic: Option<i32>,
    pub min_diastolic: Option<i32>,
    pub avg_heart_rate: Option<f64>,
    pub avg_spo2: Option<f64>,
    /// Stage of the average blood pressure
    pub category: Option<BloodPressureStage>,
    /// Distribution of the compact aggregate status
    pub status_counts: StatusCounts,
    pub reading_count: usize,
    pub period_days: u32,
    pub generated_at: DateTime<Utc>,
}

fn average(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

impl ThresholdTable {
    /// Calculate insights from readings
    pub fn calculate_insights(
        &self,
        readings: &[VitalReading],
        period_days: u32,
    ) -> Result<VitalsInsights, VitalsServiceError> {
        if readings.is_empty() {
            return Err(VitalsServiceError::InsufficientData(
                "No readings available to generate insights".to_string(),
            ));
        }

        let mut systolic_sum = 0.0;
        let mut diastolic_sum = 0.0;
        let mut bp_count = 0;
        let mut max_systolic: Option<i32> = None;
        let mut max_diastolic: Option<i32> = None;
        let mut min_systolic: Option<i32> = None;
        let mut min_diastolic: Option<i32> = None;

        let mut heart_rate_sum = 0.0;
        let mut heart_rate_count = 0;
        let mut spo2_sum = 0.0;
        let mut spo2_count = 0;

        let mut status_counts = StatusCounts::default();

        for reading in readings {
            if let (Some(systolic), Some(diastolic)) = (reading.systolic, reading.diastolic) {
                systolic_sum += f64::from(systolic);
                diastolic_sum += f64::from(diastolic);
                bp_count += 1;

                max_systolic = Some(max_systolic.map_or(systolic, |m| m.max(systolic)));
                max_diastolic = Some(max_diastolic.map_or(diastolic, |m| m.max(diastolic)));
                min_systolic = Some(min_systolic.map_or(systolic, |m| m.min(systolic)));
                min_diastolic = Some(min_diastolic.map_or(diastolic, |m| m.min(diastolic)));
            }

            if let Some(heart_rate) = reading.heart_rate {
                heart_rate_sum += f64::from(heart_rate);
                heart_rate_count += 1;
            }

            if let Some(spo2) = reading.spo2 {
                spo2_sum += spo2;
                spo2_count += 1;
            }

            status_counts.record(self.health_status(reading));
        }

        let avg_systolic = average(systolic_sum, bp_count);
        let avg_diastolic = average(diastolic_sum, bp_count);

        // Stage the rounded averages
        let category = match (avg_systolic, avg_diastolic) {
            (Some(systolic), Some(diastolic)) => {
                Some(self.blood_pressure_stage(systolic.round() as i32, diastolic.round() as i32))
            }
            _ => None,
        };

        Ok(VitalsInsights {
            avg_systolic,
            avg_diastolic,
            max_systolic,
            max_diastolic,
            min_systolic,
            min_diastolic,
            avg_heart_rate: average(heart_rate_sum, heart_rate_count),
            avg_spo2: average(spo2_sum, spo2_count),
            category,
            status_counts,
            reading_count: readings.len(),
            period_days,
            generated_at: Utc::now(),
        })
    }
}

/// Calculate insights against the standard table
pub fn calculate_insights(
    readings: &[VitalReading],
    period_days: u32,
) -> Result<VitalsInsights, VitalsServiceError> {
    crate::rules::standard_thresholds().calculate_insights(readings, period_days)
}
