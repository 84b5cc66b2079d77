//! Frame-time percentiles for the end-of-run report.

use hdrhistogram::{CreationError, Histogram};
use log::info;
use std::time::Duration;

/// Longest frame tracked, in microseconds (one minute).
const MAX_FRAME_MICROS: u64 = 60_000_000;

pub struct FrameStats {
    histogram: Histogram<u64>,
}

impl FrameStats {
    pub fn new() -> Result<Self, CreationError> {
        Ok(Self {
            histogram: Histogram::new_with_bounds(1, MAX_FRAME_MICROS, 3)?,
        })
    }

    pub fn record(&mut self, frame: Duration) {
        let micros = u64::try_from(frame.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros.clamp(1, MAX_FRAME_MICROS));
    }

    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn percentile(&self, quantile: f64) -> Duration {
        Duration::from_micros(self.histogram.value_at_quantile(quantile))
    }

    pub fn log_summary(&self) {
        if self.histogram.is_empty() {
            info!("No frames recorded");
            return;
        }
        info!(
            "Frame time over {} frames: mean {:.0}us, p50 {:?}, p99 {:?}, max {:?}",
            self.count(),
            self.histogram.mean(),
            self.percentile(0.5),
            self.percentile(0.99),
            Duration::from_micros(self.histogram.max()),
        );
    }
}
