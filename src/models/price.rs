use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single (timestamp, price) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,

    /// Closing price
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }

    /// Timestamp as a UTC datetime (None if out of chrono's range)
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Ordered price history from one provider
///
/// Built through [`PriceSeries::normalized`] every point has a finite price
/// and timestamps are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Wrap points that are already in ascending order
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Normalize raw provider output
    ///
    /// - drops non-finite prices
    /// - sorts ascending by timestamp
    /// - keeps the first point for each duplicated timestamp
    pub fn normalized(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.price.is_finite());
        // Stable sort keeps provider order among equal timestamps
        points.sort_by_key(|p| p.timestamp_ms);

        let mut seen = HashSet::new();
        points.retain(|p| seen.insert(p.timestamp_ms));

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }

    /// Closing prices in time order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::normalized(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_sorts_and_drops_invalid() {
        let raw = vec![
            PricePoint::new(3_000, 103.0),
            PricePoint::new(1_000, 101.0),
            PricePoint::new(2_000, f64::NAN),
            PricePoint::new(4_000, f64::INFINITY),
            PricePoint::new(2_500, 102.5),
        ];

        let series = PriceSeries::normalized(raw);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![101.0, 102.5, 103.0]);
        assert_eq!(series.first().map(|p| p.timestamp_ms), Some(1_000));
        assert_eq!(series.last().map(|p| p.timestamp_ms), Some(3_000));
    }

    #[test]
    fn test_normalized_deduplicates_timestamps() {
        let raw = vec![
            PricePoint::new(1_000, 1.0),
            PricePoint::new(1_000, 2.0),
            PricePoint::new(2_000, 3.0),
        ];

        let series = PriceSeries::normalized(raw);

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_point_time() {
        let point = PricePoint::new(1_700_000_000_000, 1.0);
        assert_eq!(point.time().map(|t| t.timestamp()), Some(1_700_000_000));
    }
}
