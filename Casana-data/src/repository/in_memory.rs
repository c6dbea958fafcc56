use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::RepositoryError;
use super::{AlertFilter, ReadingFilter, VitalsRepositoryTrait};
use crate::models::{parse_vendor_timestamp, VendorAlert, VendorVitalReading};

/// In-memory source used when no vendor API is configured, and in tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryVitalsRepository {
    /// Readings keyed by user id
    readings: Arc<Mutex<HashMap<String, Vec<VendorVitalReading>>>>,
    /// Alerts in insertion order
    alerts: Arc<Mutex<Vec<VendorAlert>>>,
}

impl InMemoryVitalsRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading for a user
    pub fn insert_reading(&self, user_id: &str, reading: VendorVitalReading) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock()?;
        store.entry(user_id.to_string()).or_default().push(reading);
        Ok(())
    }

    /// Store an alert
    pub fn insert_alert(&self, alert: VendorAlert) -> Result<(), RepositoryError> {
        self.alerts.lock()?.push(alert);
        Ok(())
    }

    /// Builder-style variant of [`insert_reading`](Self::insert_reading)
    pub fn with_reading(self, user_id: &str, reading: VendorVitalReading) -> Result<Self, RepositoryError> {
        self.insert_reading(user_id, reading)?;
        Ok(self)
    }

    /// Builder-style variant of [`insert_alert`](Self::insert_alert)
    pub fn with_alert(self, alert: VendorAlert) -> Result<Self, RepositoryError> {
        self.insert_alert(alert)?;
        Ok(self)
    }
}

fn reading_time(reading: &VendorVitalReading) -> Option<DateTime<Utc>> {
    reading.timestamp.as_deref().and_then(parse_vendor_timestamp)
}

fn parse_bound(bound: Option<&str>, name: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    match bound {
        None => Ok(None),
        Some(raw) => parse_vendor_timestamp(raw)
            .map(Some)
            .ok_or_else(|| RepositoryError::Configuration(format!("invalid {} '{}'", name, raw))),
    }
}

#[async_trait]
impl VitalsRepositoryTrait for InMemoryVitalsRepository {
    fn source_name(&self) -> &'static str {
        "in_memory"
    }

    async fn get_readings(
        &self,
        user_id: &str,
        filter: &ReadingFilter,
    ) -> Result<(Vec<VendorVitalReading>, usize), RepositoryError> {
        let start = parse_bound(filter.start_date.as_deref(), "start_date")?;
        let end = parse_bound(filter.end_date.as_deref(), "end_date")?;
        let sort_desc = filter.sort_desc.unwrap_or(true);

        let store = self.readings.lock()?;

        // Readings without a usable timestamp only match unbounded queries
        let mut readings: Vec<VendorVitalReading> = store
            .get(user_id)
            .map(|list| {
                list.iter()
                    .filter(|reading| {
                        let time = reading_time(reading);
                        if let Some(start) = start {
                            if time.map_or(true, |t| t < start) {
                                return false;
                            }
                        }
                        if let Some(end) = end {
                            if time.map_or(true, |t| t > end) {
                                return false;
                            }
                        }
                        true
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        readings.sort_by(|a, b| {
            let cmp = reading_time(a).cmp(&reading_time(b));
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        // Apply pagination
        let total = readings.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(total);

        let page = readings.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    async fn get_latest_reading(
        &self,
        user_id: &str,
    ) -> Result<Option<VendorVitalReading>, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(store
            .get(user_id)
            .and_then(|list| list.iter().max_by_key(|reading| reading_time(reading)))
            .cloned())
    }

    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<VendorAlert>, RepositoryError> {
        let alerts = self.alerts.lock()?;
        let matching = alerts
            .iter()
            .filter(|alert| match &filter.user_id {
                Some(user_id) => alert.user_id.as_deref() == Some(user_id.as_str()),
                None => true,
            })
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let _store = self.readings.lock()?;
        Ok(())
    }
}
