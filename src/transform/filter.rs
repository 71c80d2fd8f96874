// src/transform/filter.rs
//! FIR band-pass filtering of epoch data

use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2, ArrayView3};
use rayon::prelude::*;
use tracing::debug;

use super::{SignalInput, Transform};
use crate::error::{NeuroError, NeuroResult};
use crate::recording::RecordingInfo;

/// Band-pass filters each channel along the time axis.
///
/// `fit` designs a linear-phase FIR filter (windowed sinc, Hamming window)
/// for the configured pass band; the tap count follows the transition
/// bandwidth but is clamped to the epoch length. `transform` convolves each
/// channel with the taps and compensates the group delay; symmetric taps
/// make the net response zero-phase. Output shape equals input shape.
#[derive(Debug, Clone)]
pub struct FilterEstimator {
    sfreq: f64,
    low_hz: f64,
    high_hz: f64,
    taps: Option<Vec<f64>>,
}

impl FilterEstimator {
    /// Create an unfitted band-pass estimator.
    ///
    /// Fails unless `0 < low_hz < high_hz < sfreq / 2`.
    pub fn new(info: &RecordingInfo, low_hz: f64, high_hz: f64) -> NeuroResult<Self> {
        let nyquist = info.sfreq / 2.0;
        if !low_hz.is_finite() || low_hz <= 0.0 {
            return Err(NeuroError::BadParameter {
                name: "low_hz",
                reason: format!("must be positive, got {}", low_hz),
            });
        }
        if high_hz <= low_hz {
            return Err(NeuroError::BadParameter {
                name: "high_hz",
                reason: format!("band edges out of order: {} >= {}", low_hz, high_hz),
            });
        }
        if high_hz >= nyquist {
            return Err(NeuroError::BadParameter {
                name: "high_hz",
                reason: format!("{} Hz at or above Nyquist ({} Hz)", high_hz, nyquist),
            });
        }
        Ok(Self {
            sfreq: info.sfreq,
            low_hz,
            high_hz,
            taps: None,
        })
    }

    /// Designed filter taps, if `fit` has run.
    pub fn taps(&self) -> Option<&[f64]> {
        self.taps.as_deref()
    }

    /// Pass band in Hz.
    pub fn band(&self) -> (f64, f64) {
        (self.low_hz, self.high_hz)
    }

    fn tap_count(&self, n_times: usize) -> usize {
        // Transition bandwidth tied to the low edge; longer signals afford
        // sharper filters, but the kernel never exceeds the epoch length.
        let transition_hz = (self.low_hz * 0.5).max(0.5);
        let ideal = ((3.3 * self.sfreq / transition_hz).ceil() as usize) | 1;
        let ceiling = if n_times % 2 == 0 { n_times.saturating_sub(1) } else { n_times };
        ideal.min(ceiling.max(3))
    }
}

fn design_bandpass(low_hz: f64, high_hz: f64, sfreq: f64, n_taps: usize) -> Vec<f64> {
    let fc1 = low_hz / sfreq;
    let fc2 = high_hz / sfreq;
    let mid = (n_taps - 1) as f64 / 2.0;
    (0..n_taps)
        .map(|i| {
            let n = i as f64 - mid;
            let ideal = if n == 0.0 {
                2.0 * (fc2 - fc1)
            } else {
                ((std::f64::consts::TAU * fc2 * n).sin()
                    - (std::f64::consts::TAU * fc1 * n).sin())
                    / (std::f64::consts::PI * n)
            };
            let hamming = 0.54
                - 0.46 * (std::f64::consts::TAU * i as f64 / (n_taps - 1) as f64).cos();
            ideal * hamming
        })
        .collect()
}

/// Delay-compensated convolution with zero padding at the edges.
fn filter_channel(row: ArrayView1<'_, f64>, taps: &[f64]) -> Vec<f64> {
    let n = row.len();
    let delay = taps.len() / 2;
    let mut out = vec![0.0; n];
    for (t, slot) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &tap) in taps.iter().enumerate() {
            let idx = t as i64 + delay as i64 - k as i64;
            if idx >= 0 && (idx as usize) < n {
                acc += tap * row[idx as usize];
            }
        }
        *slot = acc;
    }
    out
}

fn filter_epoch(epoch: ArrayView2<'_, f64>, taps: &[f64]) -> Array2<f64> {
    let (n_channels, n_times) = epoch.dim();
    let mut out = Array2::<f64>::zeros((n_channels, n_times));
    for c in 0..n_channels {
        let filtered = filter_channel(epoch.slice(s![c, ..]), taps);
        out.slice_mut(s![c, ..])
            .assign(&ArrayView1::from(&filtered[..]));
    }
    out
}

impl Transform for FilterEstimator {
    type Output = Array3<f64>;

    fn fit(&mut self, x: SignalInput<'_>, _y: &[i64]) -> NeuroResult<&mut Self> {
        let x = x.as_array()?;
        let (_, _, n_times) = x.dim();
        if n_times < 3 {
            return Err(NeuroError::InvalidInput(format!(
                "epochs too short to filter: {} samples",
                n_times
            )));
        }
        let n_taps = self.tap_count(n_times);
        debug!(n_taps, low_hz = self.low_hz, high_hz = self.high_hz, "designed band-pass FIR");
        self.taps = Some(design_bandpass(self.low_hz, self.high_hz, self.sfreq, n_taps));
        Ok(self)
    }

    fn transform(&self, x: ArrayView3<'_, f64>) -> NeuroResult<Self::Output> {
        let taps = self
            .taps
            .as_deref()
            .ok_or(NeuroError::NotFitted("FilterEstimator"))?;
        let (n_epochs, n_channels, n_times) = x.dim();

        // Epochs are independent, so they filter in parallel.
        let filtered: Vec<Array2<f64>> = (0..n_epochs)
            .into_par_iter()
            .map(|e| filter_epoch(x.slice(s![e, .., ..]), taps))
            .collect();

        let mut out = Array3::<f64>::zeros((n_epochs, n_channels, n_times));
        for (e, epoch) in filtered.iter().enumerate() {
            out.slice_mut(s![e, .., ..]).assign(epoch);
        }
        Ok(out)
    }
}
