//! Control-surface protocol: message parsing and relative encoder decoding
//!
//! The control surface speaks MIDI-style 3-byte messages. Its rotary encoders
//! are endless: each one reports a 7-bit counter that wraps in `[0, 127]`, so
//! only the signed difference between consecutive values means anything.

use std::collections::HashMap;

/// Control change status nibble
const STATUS_CONTROL_CHANGE: u8 = 0xB0;
const STATUS_NOTE_ON: u8 = 0x90;
const STATUS_NOTE_OFF: u8 = 0x80;

/// Jumps larger than this are a wrap across 0/127, not a real move
pub const WRAP_THRESHOLD: i16 = 64;
/// Weight of the newest delta in the smoothed delta
pub const SMOOTHING: f32 = 0.7;

/// A decoded control-surface message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    ControlChange { channel: u8, controller: u8, value: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
}

impl ControlMessage {
    /// Parse raw bytes. Anything malformed or uninteresting yields `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let [status, data1, data2, ..] = *bytes else {
            return None;
        };
        if data1 > 0x7F || data2 > 0x7F {
            return None;
        }
        let channel = status & 0x0F;
        match status & 0xF0 {
            STATUS_CONTROL_CHANGE => Some(ControlMessage::ControlChange {
                channel,
                controller: data1,
                value: data2,
            }),
            // Note-on with zero velocity is a release
            STATUS_NOTE_ON if data2 == 0 => Some(ControlMessage::NoteOff {
                channel,
                note: data1,
            }),
            STATUS_NOTE_ON => Some(ControlMessage::NoteOn {
                channel,
                note: data1,
                velocity: data2,
            }),
            STATUS_NOTE_OFF => Some(ControlMessage::NoteOff {
                channel,
                note: data1,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            ControlMessage::ControlChange { channel, .. }
            | ControlMessage::NoteOn { channel, .. }
            | ControlMessage::NoteOff { channel, .. } => channel,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EncoderTrack {
    last_value: u8,
    smoothed: f32,
}

/// Turns successive raw encoder values into smoothed signed deltas.
///
/// One track per (channel, controller). The first value seen on a track only
/// seeds it and yields 0.
#[derive(Debug, Clone, Default)]
pub struct EncoderDecoder {
    tracks: HashMap<(u8, u8), EncoderTrack>,
}

impl EncoderDecoder {
    pub fn delta(&mut self, channel: u8, controller: u8, value: u8) -> f32 {
        let Some(track) = self.tracks.get_mut(&(channel, controller)) else {
            self.tracks.insert(
                (channel, controller),
                EncoderTrack {
                    last_value: value,
                    smoothed: 0.0,
                },
            );
            return 0.0;
        };

        let smoothed = SMOOTHING * wrapped_delta(track.last_value, value) as f32
            + (1.0 - SMOOTHING) * track.smoothed;
        track.last_value = value;
        track.smoothed = smoothed;
        smoothed
    }

    /// Forget every track (device reconnected)
    pub fn reset(&mut self) {
        self.tracks.clear();
    }
}

/// Signed difference between two 7-bit counter values, corrected for wrap
pub fn wrapped_delta(prev: u8, next: u8) -> i16 {
    let delta = next as i16 - prev as i16;
    if delta < -WRAP_THRESHOLD {
        delta + 128
    } else if delta > WRAP_THRESHOLD {
        delta - 128
    } else {
        delta
    }
}
