// ================================================================================
// End-to-end preprocessing pipeline tests
// File: tests/pipeline_integration_tests.rs
// ================================================================================

use std::collections::BTreeMap;

use ndarray::Array3;
use proptest::prelude::*;

use neuro_core::config::{from_toml_str, ConfigLoader};
use neuro_core::recording::synth::{generate, SynthConfig};
use neuro_core::{
    pick_types, ChannelConcatenator, ChannelInfo, ChannelKind, EpochConfig, Epochs, EventTable,
    PickSelection, Recording, RecordingInfo, Scaler, SignalInput, Transform,
};

fn fixture() -> (Recording, EventTable) {
    generate(&SynthConfig::default()).unwrap()
}

fn meg_epochs(recording: &Recording, events: &EventTable) -> Epochs {
    let picks = pick_types(recording.info(), &PickSelection::meg_only());
    let mut event_ids = BTreeMap::new();
    event_ids.insert("aud_l".to_string(), 1);
    event_ids.insert("vis_l".to_string(), 3);
    Epochs::from_recording(
        recording,
        events,
        &EpochConfig {
            tmin: -0.2,
            tmax: 0.5,
            event_ids,
            picks,
            baseline: Some((None, Some(0.0))),
        },
    )
    .unwrap()
}

#[test]
fn test_filter_scale_concat_chain() {
    let (recording, events) = fixture();
    let epochs = meg_epochs(&recording, &events);
    let y = epochs.labels().to_vec();

    let config = ConfigLoader::new().load().unwrap();
    let mut filt = config.filter_estimator(epochs.info()).unwrap();
    let filtered = filt
        .fit_transform(SignalInput::from(epochs.data()), &y)
        .unwrap();

    let mut scaler = Scaler::new(epochs.info());
    let scaled = scaler
        .fit_transform(SignalInput::from(&filtered), &y)
        .unwrap();

    let mut concat = ChannelConcatenator::new(epochs.info());
    let features = concat
        .fit_transform(SignalInput::from(&scaled), &y)
        .unwrap();

    assert_eq!(features.nrows(), epochs.n_epochs());
    assert_eq!(features.ncols(), epochs.n_channels() * epochs.n_times());
}

#[test]
fn test_config_driven_psd() {
    let (recording, events) = fixture();
    let epochs = meg_epochs(&recording, &events);

    let config = from_toml_str("[psd]\nsegment_len = 128\noverlap = 0.25\n").unwrap();
    let psd = config.psd_estimator(epochs.info()).unwrap();
    let out = psd.transform(epochs.view()).unwrap();

    assert_eq!(out.shape()[0], epochs.n_epochs());
    assert_eq!(out.shape()[2], 128 / 2 + 1);

    let freqs = psd.freqs(epochs.n_times());
    assert_eq!(freqs.len(), out.shape()[2]);
    assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    approx::assert_abs_diff_eq!(freqs[0], 0.0);
}

#[test]
fn test_fixture_files_round_trip_through_epoching() {
    let (recording, events) = fixture();
    let dir = tempfile::tempdir().unwrap();
    let rec_path = dir.path().join("sample_raw.json");
    let eve_path = dir.path().join("sample_eve.json");
    recording.save(&rec_path).unwrap();
    events.save(&eve_path).unwrap();

    let reloaded_rec = Recording::load(&rec_path).unwrap();
    let reloaded_eve = EventTable::load(&eve_path).unwrap();

    let direct = meg_epochs(&recording, &events);
    let via_files = meg_epochs(&reloaded_rec, &reloaded_eve);
    assert_eq!(direct.data(), via_files.data());
    assert_eq!(direct.labels(), via_files.labels());
}

fn grad_info(n_ch: usize) -> RecordingInfo {
    let channels = (0..n_ch)
        .map(|i| ChannelInfo::new(format!("MEG {:04}", i), ChannelKind::MegGrad))
        .collect();
    RecordingInfo::new(100.0, channels).unwrap()
}

proptest! {
    #[test]
    fn prop_concat_preserves_every_sample(
        n_epochs in 1usize..4,
        n_channels in 1usize..5,
        n_times in 1usize..24,
    ) {
        let x = Array3::from_shape_fn((n_epochs, n_channels, n_times), |(e, c, t)| {
            (e * 10_000 + c * 100 + t) as f64
        });
        let concat = ChannelConcatenator::new(&grad_info(n_channels));
        let out = concat.transform(x.view()).unwrap();

        prop_assert_eq!(out.dim(), (n_epochs, n_channels * n_times));
        for ((e, c, t), &v) in x.indexed_iter() {
            prop_assert_eq!(out[[e, c * n_times + t]], v);
        }
    }

    #[test]
    fn prop_scaler_preserves_shape(
        n_epochs in 1usize..5,
        n_channels in 1usize..5,
        n_times in 2usize..32,
    ) {
        let x = Array3::from_shape_fn((n_epochs, n_channels, n_times), |(e, c, t)| {
            ((e + 1) * (c + 2)) as f64 * (t as f64 * 0.7).sin()
        });
        let mut scaler = Scaler::new(&grad_info(n_channels));
        let out = scaler.fit_transform(SignalInput::from(&x), &[]).unwrap();
        prop_assert_eq!(out.dim(), x.dim());
    }
}
