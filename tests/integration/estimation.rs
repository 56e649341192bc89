//! Pitch estimation seen through the public API.

use intone::analysis::is_distinct_voice;
use intone::prelude::*;
use intone::{
    hz_to_midi, midi_to_hz, note_name_to_hz, EstimatorConfig, PitchEstimator, FREQ_MAX, FREQ_MIN,
};
use proptest::prelude::*;

use crate::helpers::tolerances::*;
use crate::helpers::*;

fn estimator() -> PitchEstimator {
    PitchEstimator::new(TEST_SAMPLE_RATE, EstimatorConfig::default()).unwrap()
}

#[test]
fn test_reference_pitch() {
    assert_eq!(note_name_to_hz("A4"), Some(440.0));
    assert_eq!(hz_to_midi(440.0), Some(69.0));
}

#[test]
fn test_octave_is_not_a_second_voice() {
    let samples = generate_chord(&[220.0, 440.0], TEST_SAMPLE_RATE, TEST_FRAME_SIZE);
    let voices = estimator().estimate(&AudioFrame::new(&samples, TEST_SAMPLE_RATE), 3);

    assert!(!voices.is_empty());
    assert!((voices[0] - 220.0).abs() / 220.0 < PITCH_TOLERANCE, "{:?}", voices);
    assert!(
        voices.iter().all(|f| (f - 440.0).abs() / 440.0 > 0.05),
        "octave reported as a voice: {:?}",
        voices
    );
    for (i, &a) in voices.iter().enumerate() {
        for &b in &voices[i + 1..] {
            assert!(is_distinct_voice(a, &[b], 0.15, 0.1), "{:?}", voices);
        }
    }
}

#[test]
fn test_configure_keeps_old_estimator() {
    let original = estimator();
    let resampled = original.configure(22050.0).unwrap();

    let at_48k = generate_sine(330.0, TEST_SAMPLE_RATE, TEST_FRAME_SIZE);
    let at_22k = generate_sine(330.0, 22050.0, TEST_FRAME_SIZE);

    let a = original.estimate(&AudioFrame::new(&at_48k, TEST_SAMPLE_RATE), 1);
    let b = resampled.estimate(&AudioFrame::new(&at_22k, 22050.0), 1);
    assert!((a[0] - 330.0).abs() / 330.0 < PITCH_TOLERANCE);
    assert!((b[0] - 330.0).abs() / 330.0 < PITCH_TOLERANCE);
}

#[test]
fn test_detected_note_scores_in_tune() {
    let mut session = test_session();
    let target = Target::from_note_name("G3").unwrap();
    session.start_game(target.clone());

    let samples = generate_sine(target.frequency_hz, TEST_SAMPLE_RATE, TEST_FRAME_SIZE);
    session.process_frame(&AudioFrame::new(&samples, TEST_SAMPLE_RATE), FRAME);
    let snapshot = session.snapshot();
    assert!(snapshot.last_error.unwrap() < SEMITONE_TOLERANCE);
    assert_eq!(snapshot.voice_notes(), vec!["G3".to_string()]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_sine_estimates_within_tolerance(midi in 45.0f64..84.0) {
        let freq = midi_to_hz(midi);
        let samples = generate_sine(freq, TEST_SAMPLE_RATE, TEST_FRAME_SIZE);
        let voices = estimator().estimate(&AudioFrame::new(&samples, TEST_SAMPLE_RATE), 1);
        prop_assert_eq!(voices.len(), 1);
        prop_assert!((voices[0] - freq).abs() / freq < PITCH_TOLERANCE);
    }

    #[test]
    fn prop_estimates_stay_in_band(
        freqs in proptest::collection::vec(60.0f64..1500.0, 1..4),
        max_voices in 1usize..6,
    ) {
        let samples = generate_chord(&freqs, TEST_SAMPLE_RATE, TEST_FRAME_SIZE);
        let voices = estimator().estimate(&AudioFrame::new(&samples, TEST_SAMPLE_RATE), max_voices);
        prop_assert!(voices.len() <= max_voices);
        for f in voices {
            prop_assert!(f.is_finite());
            prop_assert!((FREQ_MIN..=FREQ_MAX).contains(&f));
        }
    }
}
