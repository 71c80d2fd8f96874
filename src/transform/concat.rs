// src/transform/concat.rs
//! Channel concatenation into per-epoch feature vectors

use ndarray::{s, Array2, ArrayView3};

use super::{SignalInput, Transform};
use crate::error::{NeuroError, NeuroResult};
use crate::recording::RecordingInfo;

/// Flattens each epoch's (channels, times) block into one feature vector.
///
/// Output shape is `(n_epochs, n_channels * n_times)`, channel-major:
/// `out[e, c * n_times + t] == x[e, c, t]`. Samples are copied verbatim,
/// so the first `n_times` values of a row are channel 0's time series
/// unmodified. This is the usual last step before handing epochs to a
/// classifier that expects one row per observation.
#[derive(Debug, Clone)]
pub struct ChannelConcatenator {
    info: RecordingInfo,
}

impl ChannelConcatenator {
    /// Create a concatenator for the channels described by `info`.
    pub fn new(info: &RecordingInfo) -> Self {
        Self { info: info.clone() }
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

impl Transform for ChannelConcatenator {
    type Output = Array2<f64>;

    fn fit(&mut self, x: SignalInput<'_>, _y: &[i64]) -> NeuroResult<&mut Self> {
        let x = x.as_array()?;
        self.check_channels(x.dim().1, "concat.fit")?;
        Ok(self)
    }

    fn transform(&self, x: ArrayView3<'_, f64>) -> NeuroResult<Self::Output> {
        let (n_epochs, n_channels, n_times) = x.dim();
        self.check_channels(n_channels, "concat.transform")?;

        let mut out = Array2::<f64>::zeros((n_epochs, n_channels * n_times));
        for e in 0..n_epochs {
            for c in 0..n_channels {
                out.slice_mut(s![e, c * n_times..(c + 1) * n_times])
                    .assign(&x.slice(s![e, c, ..]));
            }
        }
        Ok(out)
    }
}
