//! Sequence-mode tests: demo playback, countdown, looping targets.

use std::time::Duration;

use intone::prelude::*;

use crate::helpers::*;

const SECOND: Duration = Duration::from_secs(1);

#[test]
fn test_sequence_phases() {
    let cue = RecordingCue::default();
    let mut session = GameSession::builder()
        .cue(cue.clone())
        .seed(1)
        .build()
        .unwrap();
    session.start_sequence_game();

    let played = cue.played();
    assert_eq!(played.len(), 1);
    let names: Vec<&str> = played[0].iter().map(|n| n.note_name.as_str()).collect();
    assert_eq!(names, ["C4", "D4", "E4", "F4", "G4"]);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::ListenToDemo);
    assert!(!snapshot.is_playing());
    assert_eq!(snapshot.demo_index, Some(0));
    assert_eq!(snapshot.targets[0].note_name, "C4");

    session.tick(&[], Duration::from_millis(1500));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.demo_index, Some(1));
    assert_eq!(snapshot.targets[0].note_name, "D4");
    // Nothing is scored while the demo plays
    assert_eq!(snapshot.survival_secs, 0.0);

    session.tick(&[], Duration::from_millis(3500));
    assert_eq!(session.snapshot().phase, Phase::Countdown);

    let mut countdown = Vec::new();
    while session.phase() == Phase::Countdown {
        countdown.extend(session.snapshot().countdown);
        session.tick(&[], SECOND);
    }
    assert_eq!(countdown, [3, 2, 1]);

    let snapshot = session.snapshot();
    assert!(snapshot.is_playing());
    assert_eq!(snapshot.countdown, None);
    assert_eq!(snapshot.sequence_index, Some(0));
    assert_eq!(snapshot.targets[0].note_name, "C4");
}

fn playing_session() -> GameSession {
    let mut session = test_session();
    session.start_sequence_game();
    // 5 s demo, 3 s countdown
    session.tick(&[], 8 * SECOND);
    assert_eq!(session.phase(), Phase::Playing);
    session
}

#[test]
fn test_sequence_loops_back() {
    let mut session = playing_session();
    assert_eq!(session.snapshot().sequence_index, Some(0));

    // Five notes, then one more (and a few frames to settle)
    for _ in 0..6 * 60 + 6 {
        sing_along(&mut session, 0.0, FRAME);
    }
    let snapshot = session.snapshot();
    assert_eq!(snapshot.sequence_index, Some(1));
    assert_eq!(snapshot.targets[0].note_name, "D4");
    assert_eq!(snapshot.state, EmotionalState::Calm);
    // Only the frames straddling a note change are off target
    assert!(snapshot.score.danger() < 0.05);
}

#[test]
fn test_singing_the_sequence_keeps_calm() {
    let mut session = playing_session();
    let mut visited = Vec::new();
    for _ in 0..590 {
        sing_along(&mut session, 0.1, FRAME);
        let index = session.snapshot().sequence_index.unwrap();
        if visited.last() != Some(&index) {
            visited.push(index);
        }
    }
    assert_eq!(visited, [0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
    assert_eq!(session.snapshot().state, EmotionalState::Calm);
}

#[test]
fn test_wrong_note_in_sequence_drains() {
    let mut session = playing_session();
    // Holding C4 over the whole sequence is wrong from D4 on
    let c4 = Target::from_note_name("C4").unwrap().frequency_hz;
    run_frames(&mut session, &[c4], 270, FRAME);
    let snapshot = session.snapshot();
    assert!(snapshot.score.danger() > 0.0);
    assert_ne!(snapshot.state, EmotionalState::Calm);
}

#[test]
fn test_game_over_ends_sequence() {
    let mut session = playing_session();
    run_frames(&mut session, &[1100.0], 600, FRAME);
    let snapshot = session.snapshot();
    assert!(snapshot.game_over);
    assert_eq!(snapshot.phase, Phase::GameOver);
    assert!(snapshot.targets.is_empty());

    let index = snapshot.sequence_index;
    run_frames(&mut session, &[1100.0], 120, FRAME);
    assert_eq!(session.snapshot().sequence_index, index);

    assert!(session.restart());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::ListenToDemo);
    assert!(!snapshot.game_over);
}

#[test]
fn test_empty_sequence_skips_scoring() {
    let config = GameConfig {
        sequence: Vec::new(),
        ..GameConfig::default()
    };
    let mut session = test_session_with(config);
    session.start_sequence_game();
    assert_eq!(session.phase(), Phase::Countdown);

    session.tick(&[], 3 * SECOND);
    assert_eq!(session.phase(), Phase::Playing);

    run_frames(&mut session, &[1000.0], 600, FRAME);
    let snapshot = session.snapshot();
    assert!(snapshot.targets.is_empty());
    assert_eq!(snapshot.sequence_index, None);
    assert_eq!(snapshot.score, Score::Life(1.0));
    assert_eq!(snapshot.state, EmotionalState::Calm);
    assert!(snapshot.survival_secs > 9.9);
}

#[test]
fn test_reset_from_sequence() {
    let mut session = playing_session();
    session.reset_game();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.countdown, None);
    assert_eq!(snapshot.demo_index, None);
    assert_eq!(snapshot.sequence_index, None);
}
