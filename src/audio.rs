//! Audio cue interface
//!
//! The simulation only emits one-frame `AudioEvent`s. The `AudioDirector`
//! turns consecutive states into playable cues and music changes and hands
//! them to an `AudioSink`. Real playback backends live outside this crate.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{AudioEvent, GameState, GameStatus};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Spray can hiss
    Spray,
    /// Wall finished
    TagSuccess,
    /// Dog bite
    Bark,
    /// Old man grumble
    OldMan,
    /// Final seconds tick
    Countdown,
    /// Teleport used
    Teleport,
    /// Victory jingle
    Victory,
    /// Game over jingle
    GameOver,
}

impl From<AudioEvent> for AudioCue {
    fn from(event: AudioEvent) -> Self {
        match event {
            AudioEvent::Spray => AudioCue::Spray,
            AudioEvent::WallDone => AudioCue::TagSuccess,
            AudioEvent::HitDog => AudioCue::Bark,
            AudioEvent::HitOldMan => AudioCue::OldMan,
            AudioEvent::Countdown => AudioCue::Countdown,
        }
    }
}

/// Background music, one per match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Intro,
    Game,
    Win,
    Lose,
}

impl MusicTrack {
    pub fn for_status(status: GameStatus) -> Self {
        match status {
            GameStatus::Menu => MusicTrack::Intro,
            GameStatus::Playing => MusicTrack::Game,
            GameStatus::Victory => MusicTrack::Win,
            GameStatus::GameOver => MusicTrack::Lose,
        }
    }

    /// Jingles play once, everything else loops
    pub fn looping(&self) -> bool {
        matches!(self, MusicTrack::Intro | MusicTrack::Game)
    }
}

/// Playback backend. Implementations swallow their own failures.
pub trait AudioSink {
    fn play_cue(&mut self, cue: AudioCue, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
}

/// Sink that only logs, and remembers what it was asked to play
#[derive(Debug, Default)]
pub struct LogSink {
    pub cues: Vec<AudioCue>,
    pub track: Option<MusicTrack>,
}

impl AudioSink for LogSink {
    fn play_cue(&mut self, cue: AudioCue, volume: f32) {
        log::debug!("Cue {:?} at {:.2}", cue, volume);
        self.cues.push(cue);
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("Music {:?} at {:.2} (loop: {})", track, volume, track.looping());
        self.track = Some(track);
    }
}

/// Derives cues from state transitions and applies volume settings
#[derive(Debug, Clone)]
pub struct AudioDirector {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    spray_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
}

impl Default for AudioDirector {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioDirector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            spray_volume: settings.spray_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            current_track: None,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    fn cue_volume(&self, cue: AudioCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let base = self.master_volume * self.sfx_volume;
        match cue {
            AudioCue::Spray => base * self.spray_volume,
            _ => base,
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play everything that happened between two consecutive states
    pub fn observe(&mut self, prev: &GameState, next: &GameState, sink: &mut dyn AudioSink) {
        for cue in transition_cues(prev, next) {
            sink.play_cue(cue, self.cue_volume(cue));
        }
        self.sync_music(next.status, sink);
    }

    /// Switch the music to match `status` if it isn't playing already
    pub fn sync_music(&mut self, status: GameStatus, sink: &mut dyn AudioSink) {
        let track = MusicTrack::for_status(status);
        if self.current_track != Some(track) {
            self.current_track = Some(track);
            sink.play_music(track, self.music_level());
        }
    }
}

/// Cues for one transition: the simulation's events first, then teleport,
/// then the end-of-match jingle on entry into a finished status.
pub fn transition_cues(prev: &GameState, next: &GameState) -> Vec<AudioCue> {
    let mut cues: Vec<AudioCue> = next.audio_events.iter().map(|&e| e.into()).collect();

    if prev.player.can_teleport && !next.player.can_teleport {
        cues.push(AudioCue::Teleport);
    }

    if prev.status != next.status {
        match next.status {
            GameStatus::Victory => cues.push(AudioCue::Victory),
            GameStatus::GameOver => cues.push(AudioCue::GameOver),
            _ => {}
        }
    }

    cues
}
