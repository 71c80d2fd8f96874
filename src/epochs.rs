// src/epochs.rs
//! Event-anchored epoch extraction
//!
//! Slices a continuous [`Recording`] into fixed-length windows around each
//! event marker, producing a 3-D array (epochs x channels x times). The
//! window is `[tmin, tmax]` in seconds relative to the event sample, both
//! ends inclusive, so `n_times = round((tmax - tmin) * sfreq) + 1`.
//!
//! Events whose code is not requested are ignored; events whose window
//! falls outside the recording are dropped with a warning. Optional
//! baseline correction subtracts the per-channel mean of a reference
//! window from each epoch.

use std::collections::BTreeMap;

use ndarray::{s, Array3, ArrayView3};
use tracing::{debug, warn};

use crate::error::{NeuroError, NeuroResult};
use crate::recording::events::EventTable;
use crate::recording::{Recording, RecordingInfo};

/// Baseline window edges in seconds relative to the event.
///
/// `None` start means the epoch start, `None` end means the epoch end;
/// `(None, Some(0.0))` is the conventional pre-stimulus baseline.
pub type Baseline = (Option<f64>, Option<f64>);

/// Parameters for epoch extraction
#[derive(Debug, Clone)]
pub struct EpochConfig {
    /// Window start relative to the event, in seconds (usually negative)
    pub tmin: f64,
    /// Window end relative to the event, in seconds
    pub tmax: f64,
    /// Named event codes to keep, e.g. {"aud_l": 1, "vis_l": 3}
    pub event_ids: BTreeMap<String, i64>,
    /// Channel indices into the recording to extract
    pub picks: Vec<usize>,
    /// Baseline correction window; `None` disables correction
    pub baseline: Option<Baseline>,
}

/// A set of fixed-length epochs extracted from one recording
#[derive(Debug, Clone)]
pub struct Epochs {
    info: RecordingInfo,
    data: Array3<f64>,
    labels: Vec<i64>,
    tmin: f64,
}

impl Epochs {
    /// Extract epochs from `recording` around the events in `events`.
    pub fn from_recording(
        recording: &Recording,
        events: &EventTable,
        config: &EpochConfig,
    ) -> NeuroResult<Epochs> {
        if config.picks.is_empty() {
            return Err(NeuroError::BadParameter {
                name: "picks",
                reason: "at least one channel must be picked".to_string(),
            });
        }
        if config.tmin >= config.tmax {
            return Err(NeuroError::BadParameter {
                name: "tmin",
                reason: format!("tmin ({}) must precede tmax ({})", config.tmin, config.tmax),
            });
        }
        if config.event_ids.is_empty() {
            return Err(NeuroError::BadParameter {
                name: "event_ids",
                reason: "no event codes requested".to_string(),
            });
        }

        let info = recording.info().pick(&config.picks)?;
        let sfreq = info.sfreq;
        let offset_min = (config.tmin * sfreq).round() as i64;
        let offset_max = (config.tmax * sfreq).round() as i64;
        let n_times = (offset_max - offset_min + 1) as usize;
        let rec_len = recording.n_times() as i64;

        let wanted: Vec<i64> = config.event_ids.values().copied().collect();
        let mut kept = Vec::new();
        for event in events.events() {
            if !wanted.contains(&event.code) {
                continue;
            }
            let start = event.sample as i64 + offset_min;
            let end = event.sample as i64 + offset_max;
            if start < 0 || end >= rec_len {
                warn!(
                    sample = event.sample,
                    code = event.code,
                    "event window outside recording bounds, dropping epoch"
                );
                continue;
            }
            kept.push((*event, start as usize));
        }
        if kept.is_empty() {
            return Err(NeuroError::Epoching(
                "no requested events fit inside the recording".to_string(),
            ));
        }

        let n_epochs = kept.len();
        let n_picks = config.picks.len();
        let mut data = Array3::<f64>::zeros((n_epochs, n_picks, n_times));
        let mut labels = Vec::with_capacity(n_epochs);
        for (e, (event, start)) in kept.iter().enumerate() {
            for (c, &ch) in config.picks.iter().enumerate() {
                let window = recording.data().slice(s![ch, *start..*start + n_times]);
                data.slice_mut(s![e, c, ..]).assign(&window);
            }
            labels.push(event.code);
        }

        let mut epochs = Epochs {
            info,
            data,
            labels,
            tmin: config.tmin,
        };
        if let Some(baseline) = config.baseline {
            epochs.apply_baseline(baseline, sfreq)?;
        }
        debug!(n_epochs, n_picks, n_times, "extracted epochs");
        Ok(epochs)
    }

    /// Metadata for the picked channels.
    pub fn info(&self) -> &RecordingInfo {
        &self.info
    }

    /// Epoch data, shape (n_epochs, n_channels, n_times).
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Borrowed view of the epoch data.
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Event code per epoch, in extraction order (the classifier target).
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Number of epochs.
    pub fn n_epochs(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of channels per epoch.
    pub fn n_channels(&self) -> usize {
        self.data.shape()[1]
    }

    /// Number of time samples per epoch.
    pub fn n_times(&self) -> usize {
        self.data.shape()[2]
    }

    /// Window start relative to the event, in seconds.
    pub fn tmin(&self) -> f64 {
        self.tmin
    }

    fn apply_baseline(&mut self, baseline: Baseline, sfreq: f64) -> NeuroResult<()> {
        let n_times = self.n_times();
        let clamp = |idx: i64| idx.max(0).min(n_times as i64 - 1) as usize;
        let start = match baseline.0 {
            Some(t) => clamp(((t - self.tmin) * sfreq).round() as i64),
            None => 0,
        };
        let end = match baseline.1 {
            Some(t) => clamp(((t - self.tmin) * sfreq).round() as i64),
            None => n_times - 1,
        };
        if start > end {
            return Err(NeuroError::BadParameter {
                name: "baseline",
                reason: format!("window ({:?}) is empty after rounding", baseline),
            });
        }
        for e in 0..self.n_epochs() {
            for c in 0..self.n_channels() {
                let mean = self
                    .data
                    .slice(s![e, c, start..=end])
                    .mean()
                    .unwrap_or(0.0);
                self.data
                    .slice_mut(s![e, c, ..])
                    .mapv_inplace(|v| v - mean);
            }
        }
        Ok(())
    }
}
