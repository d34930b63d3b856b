use crate::constants::FOUR_HOUR_BUCKET_SIZE;
use crate::models::{PricePoint, PriceSeries};
use tracing::debug;

/// Service for downsampling hourly series into coarser timeframes
pub struct Resampler;

impl Resampler {
    /// Resample an hourly series into 4-hour buckets
    ///
    /// # Arguments
    /// * `hourly` - Hourly series in ascending order
    ///
    /// # Returns
    /// One point per bucket of 4 consecutive points, represented by the
    /// bucket's last point. A trailing partial bucket is represented by the
    /// series' final point. Output length is `ceil(len / 4)`.
    pub fn resample_to_four_hour(hourly: &PriceSeries) -> PriceSeries {
        Self::resample_last(hourly, FOUR_HOUR_BUCKET_SIZE)
    }

    /// Keep the last point of every `bucket_size` consecutive points
    pub fn resample_last(series: &PriceSeries, bucket_size: usize) -> PriceSeries {
        if bucket_size == 0 || series.is_empty() {
            return series.clone();
        }

        let points: Vec<PricePoint> = series
            .points()
            .chunks(bucket_size)
            .filter_map(|bucket| bucket.last().copied())
            .collect();

        debug!(
            "Resampled {} points into {} buckets of {}",
            series.len(),
            points.len(),
            bucket_size
        );

        PriceSeries::new(points)
    }
}
