// src/transform/scaler.rs
//! Per-channel standardization of epoch data

use ndarray::{s, Array1, Array3, ArrayView3};
use tracing::debug;

use super::{SignalInput, Transform};
use crate::error::{NeuroError, NeuroResult};
use crate::recording::RecordingInfo;

/// Standardizes each channel to zero mean and unit variance.
///
/// `fit` computes the mean and standard deviation of every channel across
/// all epochs and time samples; `transform` applies
/// `(x - mean[ch]) / std[ch]`, preserving the input shape. A channel with
/// zero variance keeps a unit divisor, so constant channels map to zeros
/// instead of NaN.
#[derive(Debug, Clone)]
pub struct Scaler {
    info: RecordingInfo,
    state: Option<ScalerState>,
}

#[derive(Debug, Clone)]
struct ScalerState {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Scaler {
    /// Create an unfitted scaler for the channels described by `info`.
    pub fn new(info: &RecordingInfo) -> Self {
        Self {
            info: info.clone(),
            state: None,
        }
    }

    /// Fitted per-channel means, if `fit` has run.
    pub fn channel_means(&self) -> Option<&Array1<f64>> {
        self.state.as_ref().map(|s| &s.mean)
    }

    /// Fitted per-channel standard deviations, if `fit` has run.
    pub fn channel_stds(&self) -> Option<&Array1<f64>> {
        self.state.as_ref().map(|s| &s.std)
    }

    fn check_channels(&self, n_channels: usize, context: &'static str) -> NeuroResult<()> {
        if n_channels != self.info.channel_count() {
            return Err(NeuroError::shape(
                context,
                self.info.channel_count(),
                n_channels,
            ));
        }
        Ok(())
    }
}

impl Transform for Scaler {
    type Output = Array3<f64>;

    fn fit(&mut self, x: SignalInput<'_>, _y: &[i64]) -> NeuroResult<&mut Self> {
        // Validation happens before any state change: a failed fit leaves
        // previously fitted parameters intact.
        let x = x.as_array()?;
        let (_, n_channels, _) = x.dim();
        self.check_channels(n_channels, "scaler.fit")?;

        let mut mean = Array1::<f64>::zeros(n_channels);
        let mut std = Array1::<f64>::zeros(n_channels);
        for c in 0..n_channels {
            let lane = x.slice(s![.., c, ..]);
            let n = lane.len() as f64;
            let m = lane.sum() / n;
            let var = lane.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / n;
            mean[c] = m;
            std[c] = if var > 0.0 { var.sqrt() } else { 1.0 };
        }
        debug!(n_channels, "fitted per-channel scaling parameters");
        self.state = Some(ScalerState { mean, std });
        Ok(self)
    }

    fn transform(&self, x: ArrayView3<'_, f64>) -> NeuroResult<Self::Output> {
        let state = self
            .state
            .as_ref()
            .ok_or(NeuroError::NotFitted("Scaler"))?;
        let (_, n_channels, _) = x.dim();
        self.check_channels(n_channels, "scaler.transform")?;

        let mut out = x.to_owned();
        for c in 0..n_channels {
            let m = state.mean[c];
            let s = state.std[c];
            out.slice_mut(s![.., c, ..]).mapv_inplace(|v| (v - m) / s);
        }
        Ok(out)
    }
}
