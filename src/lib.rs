//! neuro-core: MEG/EEG epoch preprocessing for brain-signal decoding
//!
//! This library turns continuous neurophysiological recordings into
//! classifier-ready feature arrays. It provides:
//!
//! - A recording model with channel metadata and kind-based selection
//! - Event-anchored epoch extraction with baseline correction
//! - A fit/transform estimator contract over 3-D epoch arrays
//! - Four estimators: per-channel scaling, FIR band-pass filtering,
//!   Welch PSD estimation, and channel concatenation
//! - Deterministic synthetic fixtures for tests and benchmarks
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use neuro_core::recording::synth::{generate, SynthConfig};
//! use neuro_core::{pick_types, EpochConfig, Epochs, PickSelection};
//! use neuro_core::{Scaler, SignalInput, Transform};
//!
//! fn main() -> neuro_core::NeuroResult<()> {
//!     let (recording, events) = generate(&SynthConfig::default())?;
//!     let picks = pick_types(recording.info(), &PickSelection::meg_only());
//!
//!     let mut event_ids = BTreeMap::new();
//!     event_ids.insert("aud_l".to_string(), 1);
//!     let epochs = Epochs::from_recording(
//!         &recording,
//!         &events,
//!         &EpochConfig {
//!             tmin: -0.2,
//!             tmax: 0.5,
//!             event_ids,
//!             picks,
//!             baseline: Some((None, Some(0.0))),
//!         },
//!     )?;
//!
//!     let mut scaler = Scaler::new(epochs.info());
//!     let scaled = scaler.fit_transform(SignalInput::from(epochs.data()), epochs.labels())?;
//!     assert_eq!(scaled.dim(), epochs.data().dim());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod epochs;
pub mod error;
pub mod recording;
pub mod transform;

// Re-export commonly used types for convenience
pub use epochs::{Baseline, EpochConfig, Epochs};
pub use error::{NeuroError, NeuroResult};
pub use recording::events::{Event, EventTable};
pub use recording::{
    pick_types, ChannelInfo, ChannelKind, PickSelection, Recording, RecordingInfo,
};
pub use transform::{
    ChannelConcatenator, FilterEstimator, PsdEstimator, Scaler, SignalInput, Transform,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "neuro-core");
    }
}
