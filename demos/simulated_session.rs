//! # Simulated Session
//!
//! Run a sequence game against a synthetic singer who drifts sharp
//! halfway through each note.
//!
//! **Concepts:** Builder, cue playback, `process_frame`, snapshots
//!
//! ```bash
//! cargo run --example simulated_session
//! ```

use std::f64::consts::TAU;
use std::time::Duration;

use intone::prelude::*;

const SAMPLE_RATE: f64 = 48000.0;
const FRAME_SIZE: usize = 2048;
const FRAME: Duration = Duration::from_nanos(16_666_667);

fn sine(freq: f64, phase: &mut f64) -> Vec<f32> {
    let step = TAU * freq / SAMPLE_RATE;
    (0..FRAME_SIZE)
        .map(|_| {
            let s = (0.5 * phase.sin()) as f32;
            *phase = (*phase + step) % TAU;
            s
        })
        .collect()
}

fn main() -> intone::Result<()> {
    tracing_subscriber::fmt::init();

    let mut session = GameSession::builder()
        .sample_rate(SAMPLE_RATE)
        .seed(7)
        .cue(|notes: &[CueNote]| {
            let names: Vec<&str> = notes.iter().map(|n| n.note_name.as_str()).collect();
            println!("cue: {}", names.join(" "));
        })
        .build()?;

    session.start_sequence_game();

    let mut phase = 0.0;
    let mut frames = 0u64;
    while !session.is_game_over() && frames < 60 * 30 {
        let snapshot = session.snapshot();
        let samples = match snapshot.targets.first() {
            Some(target) if snapshot.is_playing() => {
                // Drift sharp over the second half of every second
                let drift = if frames % 60 < 30 { 0.0 } else { 1.2 };
                sine(target.frequency_hz * 2f64.powf(drift / 12.0), &mut phase)
            }
            _ => vec![0.0; FRAME_SIZE],
        };

        session.process_frame(&AudioFrame::new(&samples, SAMPLE_RATE), FRAME);
        frames += 1;

        if frames % 30 == 0 {
            let s = session.snapshot();
            println!(
                "{:>6.2}s {:?} {:?} energy={:.2} danger={:.2} voices={:?}",
                frames as f64 * FRAME.as_secs_f64(),
                s.phase,
                s.state,
                s.energy,
                s.score.danger(),
                s.voice_notes(),
            );
        }
    }

    let s = session.snapshot();
    println!("survived {:.2}s, game over: {}", s.survival_secs, s.game_over);
    Ok(())
}
