//! Scoring tests: life and doom models driven through a session.

use std::time::Duration;

use intone::prelude::*;

use crate::helpers::tolerances::*;
use crate::helpers::*;

#[test]
fn test_life_runs_out_after_sustained_chaos() {
    let mut session = test_session();
    let target = Target::from_note_name("A4").unwrap();
    session.start_game(target.clone());
    let off = [detuned(&target, 4.0)];

    // 1 / 0.15 s of chaos at 60 fps is 400 frames
    let outcome = run_frames(&mut session, &off, 399, FRAME);
    assert!(!outcome.game_over);
    assert!(!session.snapshot().game_over);
    assert!(session.snapshot().score.danger() < 1.0);

    let outcome = session.tick(&off, FRAME);
    assert!(outcome.game_over);

    let snapshot = session.snapshot();
    assert!(snapshot.game_over);
    assert_eq!(snapshot.phase, Phase::GameOver);
    match snapshot.score {
        Score::Life(life) => assert!(life.abs() < SCORE_EPSILON),
        other => panic!("expected life score, got {:?}", other),
    }
}

#[test]
fn test_game_over_freezes_session() {
    let mut session = test_session();
    let target = Target::from_note_name("A4").unwrap();
    session.start_game(target.clone());
    run_frames(&mut session, &[detuned(&target, 4.0)], 500, FRAME);
    let frozen = session.snapshot();
    assert!(frozen.game_over);

    run_frames(&mut session, &[detuned(&target, 0.0)], 120, FRAME);
    let later = session.snapshot();
    assert_eq!(later.state, frozen.state);
    assert_eq!(later.energy, frozen.energy);
    assert_eq!(later.score, frozen.score);
    assert_eq!(later.survival_secs, frozen.survival_secs);
}

#[test]
fn test_unstable_drains_slower_than_chaos() {
    let target = Target::from_note_name("A4").unwrap();
    let mut unstable = test_session();
    let mut chaos = test_session();
    unstable.start_game(target.clone());
    chaos.start_game(target.clone());

    run_frames(&mut unstable, &[detuned(&target, 1.0)], 120, FRAME);
    run_frames(&mut chaos, &[detuned(&target, 3.0)], 120, FRAME);
    assert_eq!(unstable.snapshot().state, EmotionalState::Unstable);
    assert_eq!(chaos.snapshot().state, EmotionalState::Chaos);

    let unstable_loss = unstable.snapshot().score.danger();
    let chaos_loss = chaos.snapshot().score.danger();
    assert!((chaos_loss / unstable_loss - 3.0).abs() < 1e-3);
}

#[test]
fn test_worst_voice_drives_state() {
    let mut session = GameSession::builder().voices(2).seed(1).build().unwrap();
    let target = Target::from_note_name("C4").unwrap();
    session.start_game(target.clone());

    // One singer nails it, the other is two semitones flat
    run_frames(
        &mut session,
        &[detuned(&target, 0.0), detuned(&target, -2.0)],
        30,
        FRAME,
    );
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, EmotionalState::Chaos);
    assert!((snapshot.last_error.unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn test_silence_grace_period() {
    let mut session = test_session();
    let target = Target::from_note_name("D4").unwrap();
    session.start_game(target.clone());
    run_frames(&mut session, &[detuned(&target, 1.0)], 30, FRAME);
    let before = session.snapshot();
    assert_eq!(before.state, EmotionalState::Unstable);

    // 299 ms of silence in 1 ms steps changes nothing
    let outcome = run_frames(&mut session, &[], 299, Duration::from_millis(1));
    assert!(outcome.frozen);
    let during = session.snapshot();
    assert_eq!(during.state, before.state);
    assert_eq!(during.energy, before.energy);
    assert_eq!(during.score, before.score);

    // Crossing the threshold counts as badly out of tune
    let outcome = session.tick(&[], Duration::from_millis(1));
    assert!(!outcome.frozen);
    assert_eq!(outcome.transition, Some(EmotionalState::Chaos));
    let after = session.snapshot();
    assert_eq!(after.state, EmotionalState::Chaos);
    assert!(after.energy < before.energy);
    assert_eq!(after.last_error, Some(12.0));
}

#[test]
fn test_breath_pauses_are_free() {
    let mut session = test_session();
    let target = Target::from_note_name("D4").unwrap();
    session.start_game(target.clone());

    for _ in 0..20 {
        run_frames(&mut session, &[detuned(&target, 0.0)], 30, FRAME);
        run_frames(&mut session, &[], 15, FRAME);
    }
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, EmotionalState::Calm);
    assert_eq!(snapshot.score, Score::Life(1.0));
}

fn doom_session(seed: u64) -> GameSession {
    GameSession::builder()
        .scoring(ScoringPolicy::Doom(DoomConfig::default()))
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_doom_calm_hold_retargets() {
    let mut session = doom_session(9);
    let target = Target::from_note_name("A4").unwrap();
    session.start_game(target.clone());

    // Build some doom first
    run_frames(&mut session, &[detuned(&target, 3.0)], 120, FRAME);
    let doom_before = match session.snapshot().score {
        Score::Doom { value, .. } => value,
        other => panic!("expected doom score, got {:?}", other),
    };
    assert!((doom_before - 20.0).abs() < 1e-3);

    // Chaos needs one tick through unstable before calm counts
    let mut retargeted = false;
    for _ in 0..200 {
        if sing_along(&mut session, 0.0, FRAME).retarget {
            retargeted = true;
            break;
        }
    }
    assert!(retargeted);

    let snapshot = session.snapshot();
    let new_target = &snapshot.targets[0];
    assert_ne!(new_target.note_name, "A4");
    assert!(session.config().target_pool.contains(&new_target.note_name));
    match snapshot.score {
        Score::Doom { value, max } => {
            assert_eq!(max, 100.0);
            assert!(value < doom_before);
        }
        other => panic!("expected doom score, got {:?}", other),
    }
}

#[test]
fn test_doom_retarget_is_seeded() {
    let pick = |seed| {
        let mut session = doom_session(seed);
        session.start_game(Target::from_note_name("C4").unwrap());
        for _ in 0..400 {
            if sing_along(&mut session, 0.0, FRAME).retarget {
                break;
            }
        }
        session.snapshot().targets[0].clone()
    };
    assert_eq!(pick(11), pick(11));
}

#[test]
fn test_doom_fills_to_game_over() {
    let mut session = doom_session(2);
    let target = Target::from_note_name("B3").unwrap();
    session.start_game(target.clone());
    let outcome = run_frames(&mut session, &[detuned(&target, 6.0)], 601, FRAME);
    assert!(outcome.game_over || session.is_game_over());
    assert_eq!(
        session.snapshot().score,
        Score::Doom {
            value: 100.0,
            max: 100.0
        }
    );
}
