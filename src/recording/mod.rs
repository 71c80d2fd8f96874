// src/recording/mod.rs
//! Continuous recording model and channel selection
//!
//! A [`Recording`] is an immutable block of multichannel signal
//! (channels x time samples) plus the metadata needed to interpret it:
//! sampling rate and per-channel name/kind/bad flags. Channel selection
//! ([`pick_types`]) reduces the metadata to a set of channel indices that
//! downstream epoch extraction slices on.
//!
//! Recordings persist as JSON through serde. This is the crate's fixture
//! format; vendor acquisition formats are out of scope.

pub mod events;
pub mod synth;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{NeuroError, NeuroResult};

/// Physiological channel categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// MEG planar gradiometer
    MegGrad,
    /// MEG magnetometer
    MegMag,
    /// EEG electrode
    Eeg,
    /// Stimulus/trigger channel
    Stim,
    /// Electrooculogram
    Eog,
    /// Electrocardiogram
    Ecg,
    /// Anything else (reference, audio, ...)
    Misc,
}

impl ChannelKind {
    /// True for either MEG channel flavor.
    pub fn is_meg(&self) -> bool {
        matches!(self, ChannelKind::MegGrad | ChannelKind::MegMag)
    }
}

/// Metadata for a single channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel label, e.g. "MEG 0113"
    pub name: String,
    /// Channel category
    pub kind: ChannelKind,
    /// Marked bad by the acquisition operator
    pub bad: bool,
}

impl ChannelInfo {
    /// Convenience constructor for a good channel.
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bad: false,
        }
    }
}

/// Recording-level metadata: sampling rate and channel table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingInfo {
    /// Sampling frequency in Hz
    pub sfreq: f64,
    /// Per-channel metadata, acquisition order
    pub channels: Vec<ChannelInfo>,
}

impl RecordingInfo {
    /// Create metadata, validating the sampling rate.
    pub fn new(sfreq: f64, channels: Vec<ChannelInfo>) -> NeuroResult<Self> {
        if !sfreq.is_finite() || sfreq <= 0.0 {
            return Err(NeuroError::BadParameter {
                name: "sfreq",
                reason: format!("must be positive and finite, got {}", sfreq),
            });
        }
        Ok(Self { sfreq, channels })
    }

    /// Number of channels described by this metadata.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Project the metadata onto a subset of channel indices, preserving order.
    pub fn pick(&self, picks: &[usize]) -> NeuroResult<RecordingInfo> {
        let mut channels = Vec::with_capacity(picks.len());
        for &idx in picks {
            let ch = self.channels.get(idx).ok_or_else(|| NeuroError::BadParameter {
                name: "picks",
                reason: format!("channel index {} out of range ({} channels)", idx, self.channels.len()),
            })?;
            channels.push(ch.clone());
        }
        Ok(RecordingInfo {
            sfreq: self.sfreq,
            channels,
        })
    }
}

/// Channel selection criteria for [`pick_types`]
///
/// Defaults select nothing and exclude bad channels; flip the kinds you want.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickSelection {
    /// Include MEG channels (both gradiometers and magnetometers)
    pub meg: bool,
    /// Include EEG channels
    pub eeg: bool,
    /// Include stimulus channels
    pub stim: bool,
    /// Include EOG channels
    pub eog: bool,
    /// Include ECG channels
    pub ecg: bool,
    /// Skip channels flagged bad
    pub exclude_bads: bool,
}

impl Default for PickSelection {
    fn default() -> Self {
        Self {
            meg: false,
            eeg: false,
            stim: false,
            eog: false,
            ecg: false,
            exclude_bads: true,
        }
    }
}

impl PickSelection {
    /// MEG channels only, bads excluded.
    pub fn meg_only() -> Self {
        Self {
            meg: true,
            ..Self::default()
        }
    }

    fn matches(&self, ch: &ChannelInfo) -> bool {
        if self.exclude_bads && ch.bad {
            return false;
        }
        match ch.kind {
            ChannelKind::MegGrad | ChannelKind::MegMag => self.meg,
            ChannelKind::Eeg => self.eeg,
            ChannelKind::Stim => self.stim,
            ChannelKind::Eog => self.eog,
            ChannelKind::Ecg => self.ecg,
            ChannelKind::Misc => false,
        }
    }
}

/// Select channel indices by kind and bad-flag criteria.
///
/// Returned indices are strictly increasing (acquisition order).
pub fn pick_types(info: &RecordingInfo, selection: &PickSelection) -> Vec<usize> {
    info.channels
        .iter()
        .enumerate()
        .filter(|(_, ch)| selection.matches(ch))
        .map(|(idx, _)| idx)
        .collect()
}

/// A continuous multichannel recording, immutable once constructed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    info: RecordingInfo,
    data: Array2<f64>,
}

impl Recording {
    /// Build a recording from metadata and a channels x times array.
    pub fn new(info: RecordingInfo, data: Array2<f64>) -> NeuroResult<Self> {
        if data.nrows() != info.channel_count() {
            return Err(NeuroError::shape(
                "recording.new",
                (info.channel_count(), data.ncols()),
                data.dim(),
            ));
        }
        Ok(Self { info, data })
    }

    /// Recording metadata.
    pub fn info(&self) -> &RecordingInfo {
        &self.info
    }

    /// Raw signal, shape (channels, times).
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Number of time samples.
    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }

    /// Write the recording to a JSON fixture file.
    pub fn save(&self, path: impl AsRef<Path>) -> NeuroResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a recording back from a JSON fixture file.
    pub fn load(path: impl AsRef<Path>) -> NeuroResult<Self> {
        let file = File::open(path)?;
        let recording: Recording = serde_json::from_reader(BufReader::new(file))?;
        // Re-validate: the file may not have been written by us.
        Recording::new(recording.info, recording.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_info(n_meg: usize) -> RecordingInfo {
        let mut channels: Vec<ChannelInfo> = (0..n_meg)
            .map(|i| {
                let kind = if i % 3 == 0 {
                    ChannelKind::MegMag
                } else {
                    ChannelKind::MegGrad
                };
                ChannelInfo::new(format!("MEG {:04}", i), kind)
            })
            .collect();
        channels.push(ChannelInfo::new("STI 014", ChannelKind::Stim));
        channels.push(ChannelInfo::new("EOG 061", ChannelKind::Eog));
        RecordingInfo::new(600.0, channels).unwrap()
    }

    #[test]
    fn test_pick_types_meg_only() {
        let info = test_info(6);
        let picks = pick_types(&info, &PickSelection::meg_only());
        assert_eq!(picks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pick_types_excludes_bads() {
        let mut info = test_info(6);
        info.channels[2].bad = true;
        let picks = pick_types(&info, &PickSelection::meg_only());
        assert_eq!(picks, vec![0, 1, 3, 4, 5]);

        let keep_bads = PickSelection {
            exclude_bads: false,
            ..PickSelection::meg_only()
        };
        assert_eq!(pick_types(&info, &keep_bads).len(), 6);
    }

    #[test]
    fn test_recording_shape_validation() {
        let info = test_info(4);
        // info has 6 channels (4 MEG + stim + EOG), data only 4 rows
        let data = Array2::<f64>::zeros((4, 100));
        assert!(Recording::new(info, data).is_err());
    }

    #[test]
    fn test_info_pick_out_of_range() {
        let info = test_info(4);
        assert!(info.pick(&[0, 99]).is_err());
        let picked = info.pick(&[1, 3]).unwrap();
        assert_eq!(picked.channel_count(), 2);
        assert_eq!(picked.channels[0].name, "MEG 0001");
    }

    #[test]
    fn test_invalid_sfreq_rejected() {
        assert!(RecordingInfo::new(0.0, vec![]).is_err());
        assert!(RecordingInfo::new(f64::NAN, vec![]).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let info = test_info(3);
        let n_ch = info.channel_count();
        let data = Array2::from_shape_fn((n_ch, 50), |(c, t)| c as f64 + t as f64 * 0.1);
        let recording = Recording::new(info, data).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.json");
        recording.save(&path).unwrap();
        let loaded = Recording::load(&path).unwrap();

        assert_eq!(loaded.info(), recording.info());
        assert_eq!(loaded.data(), recording.data());
    }
}
