// src/transform/mod.rs
//! Estimator contract for epoch preprocessing
//!
//! Every preprocessing step implements [`Transform`]: `fit` learns
//! parameters from a batch of epochs, `transform` applies them, and
//! `fit_transform` fuses the two. The contract mirrors classifier-pipeline
//! estimators: `fit(X, y).transform(X)` and `fit_transform(X, y)` produce
//! bit-identical output because they run the same code path.
//!
//! `fit` takes a [`SignalInput`], a sum type over the raw 3-D array and the
//! [`Epochs`] container. Estimators operate on raw arrays only; passing the
//! container is a caller mistake and fails with
//! [`NeuroError::InvalidInput`] before any fitted state is touched, so the
//! failure repeats identically on a second call.

pub mod concat;
pub mod filter;
pub mod psd;
pub mod scaler;

pub use concat::ChannelConcatenator;
pub use filter::FilterEstimator;
pub use psd::PsdEstimator;
pub use scaler::Scaler;

use ndarray::{Array3, ArrayView3};

use crate::epochs::Epochs;
use crate::error::{NeuroError, NeuroResult};

/// Input accepted by [`Transform::fit`]
///
/// Estimators require the raw extracted array; the `Epochs` variant exists
/// so the mistake of handing over the container is caught as a typed error
/// instead of a panic deep inside array code.
#[derive(Debug, Clone)]
pub enum SignalInput<'a> {
    /// A raw (epochs, channels, times) array view
    Array(ArrayView3<'a, f64>),
    /// The epoch container itself — always rejected by `fit`
    Epochs(&'a Epochs),
}

impl<'a> SignalInput<'a> {
    /// Return the raw array view, or fail for the container variant.
    pub fn as_array(&self) -> NeuroResult<ArrayView3<'a, f64>> {
        match self {
            SignalInput::Array(view) => Ok(view.clone()),
            SignalInput::Epochs(_) => Err(NeuroError::InvalidInput(
                "expected a raw (epochs, channels, times) array; extract the data \
                 from the epoch container before fitting"
                    .to_string(),
            )),
        }
    }
}

impl<'a> From<&'a Array3<f64>> for SignalInput<'a> {
    fn from(array: &'a Array3<f64>) -> Self {
        SignalInput::Array(array.view())
    }
}

impl<'a> From<ArrayView3<'a, f64>> for SignalInput<'a> {
    fn from(view: ArrayView3<'a, f64>) -> Self {
        SignalInput::Array(view)
    }
}

impl<'a> From<&'a Epochs> for SignalInput<'a> {
    fn from(epochs: &'a Epochs) -> Self {
        SignalInput::Epochs(epochs)
    }
}

/// Fit/transform contract shared by all preprocessing estimators
pub trait Transform {
    /// Output array type of `transform`; the epoch axis is always preserved.
    type Output;

    /// Learn parameters from `x`. `y` carries the per-epoch event codes for
    /// estimators that need them; the current estimators ignore it.
    ///
    /// Returns `&mut Self` so fitting and transforming chain naturally.
    fn fit(&mut self, x: SignalInput<'_>, y: &[i64]) -> NeuroResult<&mut Self>;

    /// Apply fitted parameters to `x`.
    fn transform(&self, x: ArrayView3<'_, f64>) -> NeuroResult<Self::Output>;

    /// Fit on `x` and transform the same `x`.
    ///
    /// Equivalent to `fit(x, y)?.transform(x)` element for element.
    fn fit_transform(&mut self, x: SignalInput<'_>, y: &[i64]) -> NeuroResult<Self::Output>
    where
        Self: Sized,
    {
        let view = x.as_array()?;
        self.fit(SignalInput::Array(view.clone()), y)?;
        self.transform(view)
    }
}
