// src/config/mod.rs
//! Configuration management for the preprocessing pipeline

pub mod constants;
pub mod loader;

pub use loader::{from_toml_str, ConfigError, ConfigLoader};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::epochs::EpochConfig;
use crate::error::NeuroResult;
use crate::recording::RecordingInfo;
use crate::transform::{FilterEstimator, PsdEstimator};

/// Complete preprocessing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocConfig {
    /// Sampling expectations
    #[serde(default)]
    pub sampling: SamplingSettings,
    /// Band-pass filter settings
    #[serde(default)]
    pub filter: FilterSettings,
    /// Welch PSD settings
    #[serde(default)]
    pub psd: PsdSettings,
    /// Epoch extraction settings
    #[serde(default)]
    pub epoching: EpochSettings,
}

/// Sampling-rate expectations for incoming recordings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Expected sampling frequency in Hz
    #[serde(default = "defaults::sfreq_hz")]
    pub sfreq_hz: f64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            sfreq_hz: defaults::sfreq_hz(),
        }
    }
}

/// Band-pass filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Low band edge in Hz
    #[serde(default = "defaults::filter_low_hz")]
    pub low_hz: f64,
    /// High band edge in Hz
    #[serde(default = "defaults::filter_high_hz")]
    pub high_hz: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            low_hz: defaults::filter_low_hz(),
            high_hz: defaults::filter_high_hz(),
        }
    }
}

/// Welch PSD settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsdSettings {
    /// Segment length in samples
    #[serde(default = "defaults::psd_segment_len")]
    pub segment_len: usize,
    /// Overlap fraction between consecutive segments, in [0, 1)
    #[serde(default = "defaults::psd_overlap")]
    pub overlap: f64,
}

impl Default for PsdSettings {
    fn default() -> Self {
        Self {
            segment_len: defaults::psd_segment_len(),
            overlap: defaults::psd_overlap(),
        }
    }
}

/// Epoch extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSettings {
    /// Window start relative to the event, seconds
    #[serde(default = "defaults::tmin")]
    pub tmin: f64,
    /// Window end relative to the event, seconds
    #[serde(default = "defaults::tmax")]
    pub tmax: f64,
    /// Named event codes to keep
    #[serde(default)]
    pub event_ids: BTreeMap<String, i64>,
    /// Apply baseline correction
    #[serde(default = "defaults::apply_baseline")]
    pub apply_baseline: bool,
    /// Baseline window start, seconds; `None` means epoch start
    #[serde(default)]
    pub baseline_start: Option<f64>,
    /// Baseline window end, seconds; `None` means epoch end
    #[serde(default = "defaults::baseline_end")]
    pub baseline_end: Option<f64>,
}

impl Default for EpochSettings {
    fn default() -> Self {
        Self {
            tmin: defaults::tmin(),
            tmax: defaults::tmax(),
            event_ids: BTreeMap::new(),
            apply_baseline: defaults::apply_baseline(),
            baseline_start: None,
            baseline_end: defaults::baseline_end(),
        }
    }
}

impl EpochSettings {
    /// Materialize extraction parameters for a concrete channel selection.
    pub fn to_epoch_config(&self, picks: Vec<usize>) -> EpochConfig {
        let baseline = if self.apply_baseline {
            Some((self.baseline_start, self.baseline_end))
        } else {
            None
        };
        EpochConfig {
            tmin: self.tmin,
            tmax: self.tmax,
            event_ids: self.event_ids.clone(),
            picks,
            baseline,
        }
    }
}

impl PreprocConfig {
    /// Build the configured band-pass estimator for `info`.
    pub fn filter_estimator(&self, info: &RecordingInfo) -> NeuroResult<FilterEstimator> {
        FilterEstimator::new(info, self.filter.low_hz, self.filter.high_hz)
    }

    /// Build the configured Welch estimator for `info`.
    pub fn psd_estimator(&self, info: &RecordingInfo) -> NeuroResult<PsdEstimator> {
        PsdEstimator::with_params(info, self.psd.segment_len, self.psd.overlap)
    }
}

/// Default value providers backed by the constants module
mod defaults {
    use super::constants::{epoching, filter, psd, signal};

    pub fn sfreq_hz() -> f64 {
        signal::DEFAULT_SFREQ_HZ
    }
    pub fn filter_low_hz() -> f64 {
        filter::DEFAULT_LOW_HZ
    }
    pub fn filter_high_hz() -> f64 {
        filter::DEFAULT_HIGH_HZ
    }
    pub fn psd_segment_len() -> usize {
        psd::DEFAULT_SEGMENT_LEN
    }
    pub fn psd_overlap() -> f64 {
        psd::DEFAULT_OVERLAP
    }
    pub fn tmin() -> f64 {
        epoching::DEFAULT_TMIN
    }
    pub fn tmax() -> f64 {
        epoching::DEFAULT_TMAX
    }
    pub fn apply_baseline() -> bool {
        true
    }
    pub fn baseline_end() -> Option<f64> {
        Some(0.0)
    }
}
