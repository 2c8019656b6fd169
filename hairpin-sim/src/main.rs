use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use hairpin_core::sink::LatestSnapshotSink;
use hairpin_core::storage::JsonFileStore;
use hairpin_core::track::Track;

mod fixed_step;
mod game;
mod input;
mod lap_tracker;
mod physics;

const DEFAULT_TRACK: &str = include_str!("../tracks/default.json");

/* Headless demo: drives the bundled track for a few simulated seconds
 * with a held throttle, reporting what a UI would read from the sink.
 * Frame timestamps are synthesized, so this runs at full speed. */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let track = Track::from_json(DEFAULT_TRACK).expect("bundled track data is valid");
    let store =
        Arc::new(JsonFileStore::open("hairpin-data.json".into()).expect("could not open data file"));
    let sink = Arc::new(LatestSnapshotSink::new());

    let mut session = game::GameSession::new(track, store, sink.clone());
    session.start_run();
    session.on_gesture_move(300.0, 100.0); // right-half touch: throttle + right steer

    let frame_time = Duration::from_millis(16);
    let base = Instant::now();
    for frame in 0..600u32 {
        session.frame(base + frame_time * (frame + 1));

        if frame % 60 == 59 {
            if let Some(snapshot) = sink.latest() {
                info!(
                    "lap clock {:>5.2}s pos=({:6.1},{:6.1}) speed={:6.1} laps={}",
                    snapshot.lap.current_time,
                    snapshot.vehicle.position.x,
                    snapshot.vehicle.position.y,
                    snapshot.vehicle.speed,
                    snapshot.lap.lap_count,
                );
            }
        }
    }

    session.on_gesture_release();
    session.stop_run();

    if let Some(snapshot) = sink.latest() {
        info!(
            "session over: {} lap(s), last {:?}, best {:?}",
            snapshot.lap.lap_count, snapshot.lap.last_time, snapshot.lap.best_time
        );
    }
}
