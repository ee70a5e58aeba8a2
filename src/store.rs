//! Persistence boundary for forecast and segment records
//!
//! The analytics engines are the sole writers of their record types; the
//! dashboard assembler only reads. The trait keeps the storage engine
//! external to this crate: the bundled implementation is an in-memory
//! store, and anything wrapping a real database must uphold the same
//! contracts (append-only forecasts, single-call segment replacement
//! executed inside one transaction).

use chrono::NaiveDate;
use serde::Serialize;

/// One forecast point, dated the first day of the predicted month.
/// Records are append-only: every engine run adds a new point and nothing
/// is ever updated in place, leaving an audit trail of successive runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub month: NaiveDate,
    pub value: f64,
}

/// Cluster assignment plus the RFM values it was derived from.
/// After a successful segmentation run the stored set holds exactly one
/// record per customer with at least one realized order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub customer_id: i64,
    pub cluster: usize,
    pub recency_days: f64,
    pub frequency: u32,
    pub monetary: f64,
    pub active: bool,
}

pub trait AnalyticsStore {
    /// Append one forecast point; never deduplicates by month
    fn insert_forecast(&mut self, record: ForecastRecord) -> crate::Result<()>;

    /// All persisted forecast points, ascending by month
    fn forecasts(&self) -> crate::Result<Vec<ForecastRecord>>;

    /// Replace the entire segment set in one call, superseding any prior
    /// records. Implementations must not expose a window in which the set
    /// is observably empty.
    fn replace_segments(&mut self, records: Vec<SegmentRecord>) -> crate::Result<()>;

    /// The current segment set, in insertion order
    fn segments(&self) -> crate::Result<Vec<SegmentRecord>>;
}

/// In-memory store backing tests and single-process runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    forecasts: Vec<ForecastRecord>,
    segments: Vec<SegmentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalyticsStore for MemoryStore {
    fn insert_forecast(&mut self, record: ForecastRecord) -> crate::Result<()> {
        self.forecasts.push(record);
        Ok(())
    }

    fn forecasts(&self) -> crate::Result<Vec<ForecastRecord>> {
        let mut records = self.forecasts.clone();
        records.sort_by_key(|r| r.month);
        Ok(records)
    }

    fn replace_segments(&mut self, records: Vec<SegmentRecord>) -> crate::Result<()> {
        self.segments = records;
        Ok(())
    }

    fn segments(&self) -> crate::Result<Vec<SegmentRecord>> {
        Ok(self.segments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(year: i32, month: u32, value: f64) -> ForecastRecord {
        ForecastRecord {
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            value,
        }
    }

    #[test]
    fn test_forecasts_sorted_by_month() {
        let mut store = MemoryStore::new();
        store.insert_forecast(forecast(2024, 3, 30.0)).unwrap();
        store.insert_forecast(forecast(2024, 1, 10.0)).unwrap();
        store.insert_forecast(forecast(2024, 2, 20.0)).unwrap();

        let values: Vec<f64> = store.forecasts().unwrap().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_append_never_dedupes() {
        let mut store = MemoryStore::new();
        store.insert_forecast(forecast(2024, 1, 10.0)).unwrap();
        store.insert_forecast(forecast(2024, 1, 11.0)).unwrap();
        assert_eq!(store.forecasts().unwrap().len(), 2);
    }

    #[test]
    fn test_replace_segments_supersedes() {
        let record = |customer_id, cluster| SegmentRecord {
            customer_id,
            cluster,
            recency_days: 1.0,
            frequency: 1,
            monetary: 1.0,
            active: true,
        };

        let mut store = MemoryStore::new();
        store
            .replace_segments(vec![record(1, 0), record(2, 1)])
            .unwrap();
        store.replace_segments(vec![record(3, 0)]).unwrap();

        let segments = store.segments().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].customer_id, 3);
    }
}
