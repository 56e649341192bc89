//! Frequency, MIDI and note-name conversions.
//!
//! All functions are pure. Inputs that have no musical meaning (non-positive
//! or non-finite frequencies, malformed note names) yield `None` rather than
//! an error.

use regex::Regex;
use std::sync::OnceLock;

/// Reference pitch for A4.
pub const A4_FREQ: f64 = 440.0;

/// MIDI note number for A4.
pub const A4_NOTE: f64 = 69.0;

/// Chromatic note names, sharp notation, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a frequency to a fractional MIDI note number.
///
/// `midi = 69 + 12 * log2(f / 440)`. Returns `None` for `f <= 0` or
/// non-finite input.
pub fn hz_to_midi(freq: f64) -> Option<f64> {
    if !freq.is_finite() || freq <= 0.0 {
        return None;
    }
    Some(A4_NOTE + 12.0 * (freq / A4_FREQ).log2())
}

/// Convert a (possibly fractional) MIDI note number to Hz.
pub fn midi_to_hz(midi: f64) -> f64 {
    A4_FREQ * 2.0f64.powf((midi - A4_NOTE) / 12.0)
}

/// Name of the nearest equal-tempered note, e.g. `"A4"`, `"C#5"`.
pub fn midi_to_note_name(midi: f64) -> Option<String> {
    if !midi.is_finite() {
        return None;
    }
    let rounded = midi.round() as i64;
    let pitch_class = rounded.rem_euclid(12) as usize;
    let octave = rounded.div_euclid(12) - 1;
    Some(format!("{}{}", NOTE_NAMES[pitch_class], octave))
}

/// Name of the nearest note for a frequency in Hz.
pub fn hz_to_note_name(freq: f64) -> Option<String> {
    hz_to_midi(freq).and_then(midi_to_note_name)
}

/// Cents deviation of `freq` from its nearest equal-tempered note (-50..=50).
pub fn cents_offset(freq: f64) -> Option<f64> {
    let midi = hz_to_midi(freq)?;
    Some(100.0 * (midi - midi.round()))
}

fn note_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-G]#?)(\d+)$").expect("static note pattern"))
}

/// Parse a note name such as `"A4"` or `"F#3"` into its MIDI note number.
pub fn note_name_to_midi(name: &str) -> Option<i64> {
    let captures = note_name_pattern().captures(name)?;
    let pitch = captures.get(1)?.as_str();
    let octave: i64 = captures.get(2)?.as_str().parse().ok()?;
    let pitch_class = NOTE_NAMES.iter().position(|n| *n == pitch)? as i64;
    // E#/B# are not in the table and fall out above
    octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|base| base.checked_add(pitch_class))
}

/// Parse a note name into Hz. `note_name_to_hz("A4") == Some(440.0)` exactly.
pub fn note_name_to_hz(name: &str) -> Option<f64> {
    note_name_to_midi(name).map(|midi| midi_to_hz(midi as f64))
}
