//! Lap timing for profiling frame and system durations.

use std::time::{Duration, Instant};

/// Ordered record of lap times.
#[derive(Debug, Default, Clone)]
pub struct TimeRecorder {
    laps: Vec<Duration>,
}

impl TimeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lap_time(&mut self, lap: Duration) {
        self.laps.push(lap);
    }

    pub fn recordings(&self) -> &[Duration] {
        &self.laps
    }

    /// Returns the recorded laps, leaving the recorder empty.
    pub fn take_recordings(&mut self) -> Vec<Duration> {
        std::mem::take(&mut self.laps)
    }

    pub fn last(&self) -> Option<Duration> {
        self.laps.last().copied()
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }
}

/// Starts timing on construction.
///
/// When attached to a [`TimeRecorder`], every [`lap`](StopWatch::lap) is
/// recorded, and the time since the last lap is recorded on drop.
#[derive(Debug)]
pub struct StopWatch<'a> {
    start: Instant,
    last_lap: Instant,
    recorder: Option<&'a mut TimeRecorder>,
}

impl<'a> StopWatch<'a> {
    pub fn start() -> Self {
        let now = Instant::now();
        Self { start: now, last_lap: now, recorder: None }
    }

    pub fn recording(recorder: &'a mut TimeRecorder) -> Self {
        let now = Instant::now();
        Self { start: now, last_lap: now, recorder: Some(recorder) }
    }

    /// Time since the stopwatch was created.
    pub fn total_lifetime(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the previous lap (or since creation), then starts a new lap.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_lap);
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.lap_time(elapsed);
        }
        self.last_lap = now;
        elapsed
    }
}

impl Drop for StopWatch<'_> {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.lap_time(self.last_lap.elapsed());
        }
    }
}
