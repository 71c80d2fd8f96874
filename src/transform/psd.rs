// src/transform/psd.rs
//! Welch power-spectral-density estimation over epochs

use ndarray::{s, Array3, ArrayView3};
use rustfft::{num_complex::Complex, FftPlanner};

use super::{SignalInput, Transform};
use crate::config::constants::psd;
use crate::error::{NeuroError, NeuroResult};
use crate::recording::RecordingInfo;

/// Estimates the one-sided PSD of every channel in every epoch.
///
/// Welch's method: the time axis is split into Hann-windowed, overlapping
/// segments, each segment's periodogram is computed with an FFT, and the
/// periodograms are averaged. The epoch axis is preserved; the time axis is
/// replaced by `segment_len / 2 + 1` frequency bins (fewer when the epoch
/// is shorter than the configured segment).
#[derive(Debug, Clone)]
pub struct PsdEstimator {
    sfreq: f64,
    segment_len: usize,
    overlap: f64,
}

impl PsdEstimator {
    /// Welch estimator with default segment length and overlap.
    pub fn new(info: &RecordingInfo) -> Self {
        Self {
            sfreq: info.sfreq,
            segment_len: psd::DEFAULT_SEGMENT_LEN,
            overlap: psd::DEFAULT_OVERLAP,
        }
    }

    /// Welch estimator with explicit segment length and overlap fraction.
    pub fn with_params(info: &RecordingInfo, segment_len: usize, overlap: f64) -> NeuroResult<Self> {
        if segment_len < psd::MIN_SEGMENT_LEN {
            return Err(NeuroError::BadParameter {
                name: "segment_len",
                reason: format!("must be >= {}, got {}", psd::MIN_SEGMENT_LEN, segment_len),
            });
        }
        if !(0.0..1.0).contains(&overlap) {
            return Err(NeuroError::BadParameter {
                name: "overlap",
                reason: format!("must be in [0, 1), got {}", overlap),
            });
        }
        Ok(Self {
            sfreq: info.sfreq,
            segment_len,
            overlap,
        })
    }

    /// Effective segment length for epochs of `n_times` samples.
    fn effective_segment(&self, n_times: usize) -> usize {
        self.segment_len.min(n_times)
    }

    /// Frequency bin centers in Hz for epochs of `n_times` samples.
    pub fn freqs(&self, n_times: usize) -> Vec<f64> {
        let seg = self.effective_segment(n_times);
        (0..seg / 2 + 1)
            .map(|k| k as f64 * self.sfreq / seg as f64)
            .collect()
    }
}

fn hann(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 * (1.0 - (std::f64::consts::TAU * i as f64 / (len - 1) as f64).cos()))
        .collect()
}

impl Transform for PsdEstimator {
    type Output = Array3<f64>;

    fn fit(&mut self, x: SignalInput<'_>, _y: &[i64]) -> NeuroResult<&mut Self> {
        // Spectral estimation learns nothing from the data; fit only
        // enforces the input contract.
        x.as_array()?;
        Ok(self)
    }

    fn transform(&self, x: ArrayView3<'_, f64>) -> NeuroResult<Self::Output> {
        let (n_epochs, n_channels, n_times) = x.dim();
        if n_times < psd::MIN_SEGMENT_LEN {
            return Err(NeuroError::InvalidInput(format!(
                "epochs too short for spectral estimation: {} samples, need {}",
                n_times,
                psd::MIN_SEGMENT_LEN
            )));
        }

        let seg = self.effective_segment(n_times);
        let step = ((seg as f64) * (1.0 - self.overlap)).round().max(1.0) as usize;
        let window = hann(seg);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        let n_freqs = seg / 2 + 1;

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(seg);
        let mut buf = vec![Complex::new(0.0, 0.0); seg];

        let mut out = Array3::<f64>::zeros((n_epochs, n_channels, n_freqs));
        for e in 0..n_epochs {
            for c in 0..n_channels {
                let row = x.slice(s![e, c, ..]);
                let mut acc = vec![0.0; n_freqs];
                let mut n_segments = 0usize;
                let mut start = 0usize;
                while start + seg <= n_times {
                    for (i, slot) in buf.iter_mut().enumerate() {
                        *slot = Complex::new(row[start + i] * window[i], 0.0);
                    }
                    fft.process(&mut buf);
                    for (k, acc_k) in acc.iter_mut().enumerate() {
                        let mut power = buf[k].norm_sqr() / (self.sfreq * window_power);
                        // One-sided spectrum: double everything except DC
                        // and, for even segments, the Nyquist bin.
                        if k > 0 && !(seg % 2 == 0 && k == seg / 2) {
                            power *= 2.0;
                        }
                        *acc_k += power;
                    }
                    n_segments += 1;
                    start += step;
                }
                for (k, &acc_k) in acc.iter().enumerate() {
                    out[[e, c, k]] = acc_k / n_segments as f64;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{ChannelInfo, ChannelKind};
    use ndarray::Array3;

    fn info(sfreq: f64) -> RecordingInfo {
        let channels = vec![
            ChannelInfo::new("MEG 0001", ChannelKind::MegGrad),
            ChannelInfo::new("MEG 0002", ChannelKind::MegGrad),
        ];
        RecordingInfo::new(sfreq, channels).unwrap()
    }

    fn tone_epochs(n_epochs: usize, n_times: usize, sfreq: f64, freq_hz: f64) -> Array3<f64> {
        Array3::from_shape_fn((n_epochs, 2, n_times), |(_, _, t)| {
            (std::f64::consts::TAU * freq_hz * t as f64 / sfreq).sin()
        })
    }

    #[test]
    fn test_epoch_axis_preserved_and_freq_axis_replaces_time() {
        let info = info(256.0);
        let x = tone_epochs(5, 512, 256.0, 20.0);
        let mut psd = PsdEstimator::new(&info);
        let out = psd.fit_transform(SignalInput::from(&x), &[]).unwrap();

        assert_eq!(out.shape()[0], x.shape()[0]);
        assert_eq!(out.shape()[1], x.shape()[1]);
        assert_eq!(out.shape()[2], 256 / 2 + 1);
    }

    #[test]
    fn test_peak_at_tone_frequency() {
        let sfreq = 256.0;
        let info = info(sfreq);
        let x = tone_epochs(1, 1024, sfreq, 32.0);
        let psd = PsdEstimator::new(&info);
        let out = psd.transform(x.view()).unwrap();

        let spectrum = out.slice(s![0, 0, ..]);
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(k, _)| k)
            .unwrap();
        let freqs = psd.freqs(1024);
        approx::assert_abs_diff_eq!(freqs[peak_bin], 32.0, epsilon = 1.5);
    }

    #[test]
    fn test_short_epochs_shrink_segment() {
        let info = info(128.0);
        let x = tone_epochs(2, 100, 128.0, 10.0);
        let psd = PsdEstimator::new(&info);
        let out = psd.transform(x.view()).unwrap();
        // segment clamps to the 100-sample epoch
        assert_eq!(out.shape()[2], 100 / 2 + 1);
    }

    #[test]
    fn test_fit_then_transform_matches_fit_transform() {
        let info = info(256.0);
        let x = tone_epochs(3, 512, 256.0, 12.0);
        let y = vec![1, 3, 1];

        let mut a = PsdEstimator::new(&info);
        let fused = a.fit_transform(SignalInput::from(&x), &y).unwrap();

        let mut b = PsdEstimator::new(&info);
        let two_step = b
            .fit(SignalInput::from(&x), &y)
            .unwrap()
            .transform(x.view())
            .unwrap();
        assert_eq!(fused, two_step);
    }

    #[test]
    fn test_power_is_nonnegative() {
        let info = info(256.0);
        let x = tone_epochs(2, 300, 256.0, 40.0);
        let psd = PsdEstimator::new(&info);
        let out = psd.transform(x.view()).unwrap();
        assert!(out.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_parameter_validation() {
        let info = info(256.0);
        assert!(PsdEstimator::with_params(&info, 4, 0.5).is_err());
        assert!(PsdEstimator::with_params(&info, 256, 1.0).is_err());
        assert!(PsdEstimator::with_params(&info, 256, 0.5).is_ok());
    }
}
