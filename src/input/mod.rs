//! Input normalization
//!
//! Fuses keyboard state and a relative rotary-encoder control surface into
//! one immutable [`InputState`] snapshot per frame. Event handlers only
//! accumulate; [`InputNormalizer::sample`] is the single read point.

pub mod encoder;
pub mod keyboard;
pub mod normalizer;
pub mod snapshot;

pub use encoder::{ControlMessage, EncoderDecoder};
pub use keyboard::{Key, KeyboardState};
pub use normalizer::{Actor, InputNormalizer};
pub use snapshot::{ActorInput, EnemyInputs, InputState};
