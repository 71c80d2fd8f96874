// src/config/constants.rs
//! Centralized constants for configuration defaults and validation ranges

/// Signal acquisition constants
pub mod signal {
    /// Lowest sampling rate the library accepts
    pub const MIN_SFREQ_HZ: f64 = 16.0;
    /// Highest sampling rate the library accepts
    pub const MAX_SFREQ_HZ: f64 = 10_000.0;
    /// Default sampling rate for synthesized fixtures
    pub const DEFAULT_SFREQ_HZ: f64 = 600.0;
}

/// Band-pass filter constants
pub mod filter {
    /// Default low band edge in Hz
    pub const DEFAULT_LOW_HZ: f64 = 1.0;
    /// Default high band edge in Hz
    pub const DEFAULT_HIGH_HZ: f64 = 40.0;
}

/// Welch PSD constants
pub mod psd {
    /// Default Welch segment length in samples
    pub const DEFAULT_SEGMENT_LEN: usize = 256;
    /// Smallest accepted segment length
    pub const MIN_SEGMENT_LEN: usize = 8;
    /// Default overlap fraction between segments
    pub const DEFAULT_OVERLAP: f64 = 0.5;
}

/// Epoch extraction constants
pub mod epoching {
    /// Default window start relative to the event, seconds
    pub const DEFAULT_TMIN: f64 = -0.2;
    /// Default window end relative to the event, seconds
    pub const DEFAULT_TMAX: f64 = 0.5;
}
