//! Le Tchipeur - headless runner
//!
//! Plays one match with the autopilot at a simulated 60 FPS and prints a JSON
//! summary. Usage: `tchipeur [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::collections::BTreeMap;

    use serde::Serialize;
    use tchipeur::audio::LogSink;
    use tchipeur::autopilot::Autopilot;
    use tchipeur::consts::{RESULT_SCREEN_SECONDS, SIM_DT};
    use tchipeur::{GameStatus, Session, Settings};

    #[derive(Serialize)]
    struct MatchSummary {
        seed: u64,
        status: GameStatus,
        walls_tagged: u32,
        walls_placed: usize,
        dog_hits: u32,
        teleport_used: bool,
        time_left: f32,
        frames: u64,
        cues: BTreeMap<String, u32>,
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Le Tchipeur (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let mut session = Session::new(&settings);
    let mut sink = LogSink::default();
    let mut pilot = Autopilot::new();
    session.start(settings.game_config());

    // Whole match plus one result screen
    let max_frames =
        ((session.config().game_duration + RESULT_SCREEN_SECONDS) / SIM_DT).ceil() as u64 + 60;
    let mut frames = 0;
    while frames < max_frames && !session.state().status.is_finished() {
        let snapshot = session.state().clone();
        pilot.drive(&snapshot, session.input_mut());
        session.frame(SIM_DT, &mut sink);
        frames += 1;
    }

    let state = session.state();
    let mut cues = BTreeMap::new();
    for cue in &sink.cues {
        *cues.entry(format!("{:?}", cue)).or_insert(0) += 1;
    }
    let summary = MatchSummary {
        seed: state.seed,
        status: state.status,
        walls_tagged: state.player.tags_completed,
        walls_placed: state.walls.len(),
        dog_hits: state.player.dog_hits,
        teleport_used: !state.player.can_teleport,
        time_left: state.time_left,
        frames,
        cues,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a web host; there is no standalone binary
}
