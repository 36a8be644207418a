//! Keyboard + control-surface fusion into one snapshot per frame

use glam::Vec2;

use super::encoder::{ControlMessage, EncoderDecoder};
use super::keyboard::{Key, KeyboardState};
use super::snapshot::{ActorInput, EnemyInputs, InputState};

/// Axis step per unit of encoder delta
pub const SENSITIVITY: f32 = 0.25;
/// Per-frame multiplicative decay of encoder axes
pub const AXIS_DECAY: f32 = 0.6;
/// Encoder axes below this snap to zero
pub const AXIS_DEAD_ZONE: f32 = 0.05;
/// Smoothed deltas below this are ignored
pub const DELTA_DEAD_ZONE: f32 = 0.01;
/// Encoder player axis overrides the keyboard above this magnitude
pub const PLAYER_ENCODER_PRIORITY: f32 = 0.1;

/// Encoder controllers
pub const CC_AXIS_X: u8 = 48;
pub const CC_AXIS_Y: u8 = 49;
/// Button notes
pub const NOTE_TELEPORT: u8 = 1;
pub const NOTE_TAG: u8 = 14;
pub const NOTE_BOOST: u8 = 15;

/// Controllable actors, one control-surface channel each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Dog,
    Player,
    OldMan,
    Barrier,
}

impl Actor {
    pub fn from_channel(channel: u8) -> Option<Self> {
        match channel {
            0 => Some(Actor::Dog),
            1 => Some(Actor::Player),
            2 => Some(Actor::OldMan),
            3 => Some(Actor::Barrier),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Encoder-driven state for one actor
#[derive(Debug, Clone, Copy, Default)]
struct ActorChannel {
    axis: Vec2,
    /// Tag for the player, rotate for the barrier
    primary: bool,
    boost: bool,
    teleport: bool,
    /// Primary went down since the last sample
    primary_pressed: bool,
}

impl ActorChannel {
    fn nudge(&mut self, controller: u8, delta: f32) {
        if delta.abs() < DELTA_DEAD_ZONE {
            return;
        }
        match controller {
            // Incrementing X turns left
            CC_AXIS_X => self.axis.x = (self.axis.x - delta * SENSITIVITY).clamp(-1.0, 1.0),
            CC_AXIS_Y => self.axis.y = (self.axis.y + delta * SENSITIVITY).clamp(-1.0, 1.0),
            _ => {}
        }
    }

    fn button(&mut self, note: u8, down: bool) -> bool {
        match note {
            NOTE_TAG => {
                if down && !self.primary {
                    self.primary_pressed = true;
                }
                self.primary = down;
            }
            NOTE_BOOST => self.boost = down,
            NOTE_TELEPORT => self.teleport = down,
            _ => return false,
        }
        true
    }

    fn decay(&mut self) {
        self.axis.x = decay_axis(self.axis.x);
        self.axis.y = decay_axis(self.axis.y);
    }

    fn as_actor_input(&self) -> ActorInput {
        ActorInput {
            axis_x: self.axis.x,
            axis_y: self.axis.y,
            boost: self.boost,
            action1: self.primary,
        }
    }
}

fn decay_axis(value: f32) -> f32 {
    if value.abs() < AXIS_DEAD_ZONE {
        0.0
    } else {
        value * AXIS_DECAY
    }
}

/// Accumulates input events between frames and hands out snapshots.
///
/// Event methods only accumulate; `sample` reads everything once and clears
/// the per-frame edges. Callers on a multi-threaded runtime must serialize
/// access (e.g. wrap it in a `Mutex`).
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer {
    keyboard: KeyboardState,
    decoder: EncoderDecoder,
    channels: [ActorChannel; 4],
    last_message: Option<ControlMessage>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key, repeat: bool) {
        self.keyboard.key_down(key, repeat);
    }

    pub fn key_up(&mut self, key: Key) {
        self.keyboard.key_up(key);
    }

    /// Feed raw control-surface bytes. Unknown messages are ignored.
    pub fn control_bytes(&mut self, bytes: &[u8]) {
        match ControlMessage::parse(bytes) {
            Some(message) => self.control_message(message),
            None => log::debug!("Ignoring control bytes {:02X?}", bytes),
        }
    }

    pub fn control_message(&mut self, message: ControlMessage) {
        self.last_message = Some(message);
        let Some(actor) = Actor::from_channel(message.channel()) else {
            log::debug!("Ignoring message on unmapped channel: {:?}", message);
            return;
        };

        match message {
            ControlMessage::ControlChange {
                channel,
                controller,
                value,
            } => {
                if controller != CC_AXIS_X && controller != CC_AXIS_Y {
                    return;
                }
                let delta = self.decoder.delta(channel, controller, value);
                self.channels[actor.index()].nudge(controller, delta);
            }
            ControlMessage::NoteOn { note, .. } | ControlMessage::NoteOff { note, .. } => {
                let down = matches!(message, ControlMessage::NoteOn { .. });
                if !self.channels[actor.index()].button(note, down) {
                    log::debug!("Ignoring note {} for {:?}", note, actor);
                }
            }
        }
    }

    /// Last message received, for debug overlays
    pub fn last_message(&self) -> Option<ControlMessage> {
        self.last_message
    }

    /// Produce this frame's snapshot.
    ///
    /// Encoder axes decay first, then the player axis is fused with the
    /// keyboard per axis, then fresh-press edges are consumed.
    pub fn sample(&mut self) -> InputState {
        for channel in &mut self.channels {
            channel.decay();
        }

        let keys = self.keyboard.arrow_axis();
        let player = self.channels[Actor::Player.index()];
        let axis_x = if player.axis.x.abs() > PLAYER_ENCODER_PRIORITY {
            player.axis.x
        } else {
            keys.x
        };
        let axis_y = if player.axis.y.abs() > PLAYER_ENCODER_PRIORITY {
            player.axis.y
        } else {
            keys.y
        };

        let kb = &self.keyboard;
        let input = InputState {
            axis_x,
            axis_y,
            action_primary: kb.is_down(Key::Space) || player.primary,
            action_primary_trigger: kb.was_just_pressed(Key::Space) || player.primary_pressed,
            action_secondary: kb.is_down(Key::ShiftLeft)
                || kb.is_down(Key::ShiftRight)
                || player.boost,
            action_tertiary: kb.is_down(Key::KeyZ) || player.teleport,
            action_cancel: kb.is_down(Key::KeyA),
            enemies: EnemyInputs {
                barrier: self.channels[Actor::Barrier.index()].as_actor_input(),
                dog: self.channels[Actor::Dog.index()].as_actor_input(),
                old_man: self.channels[Actor::OldMan.index()].as_actor_input(),
            },
        };

        self.keyboard.end_frame();
        for channel in &mut self.channels {
            channel.primary_pressed = false;
        }

        input
    }

    /// Drop encoder history and held buttons (device reconnected)
    pub fn reset_encoders(&mut self) {
        self.decoder.reset();
        self.channels = Default::default();
    }
}
