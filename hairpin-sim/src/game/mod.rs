use std::sync::Arc;
use std::time::Instant;

use glam::DVec2;
use log::{info, warn};

use hairpin_core::controls::InputMode;
use hairpin_core::run::{Run, RunSettings};
use hairpin_core::sink::{Snapshot, StateSink};
use hairpin_core::storage::KeyValueStore;
use hairpin_core::surface::Surface;
use hairpin_core::track::Track;
use hairpin_core::vehicle::{VehicleParams, VehicleState};
use hairpin_core::GLOBAL_CONFIG;

use crate::fixed_step::FixedStep;
use crate::input::InputMapper;
use crate::lap_tracker::LapTracker;
use crate::physics;

/* One player's session: owns the run state and drives the per-tick
 * chain (input sample -> integrate -> collide -> lap detect), then
 * publishes the result to the injected sink. All mutation happens on
 * the caller's frame callback; nothing here spawns work on the tick
 * path. */
pub struct GameSession {
    track: Track,
    params: VehicleParams,
    run: Run,
    settings: RunSettings,
    mapper: InputMapper,
    tracker: LapTracker,
    driver: FixedStep,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn StateSink>,
}

impl GameSession {
    pub fn new(track: Track, store: Arc<dyn KeyValueStore>, sink: Arc<dyn StateSink>) -> GameSession {
        let settings = hydrate_settings(store.as_ref());
        let tracker = LapTracker::new(&track, Arc::clone(&store));

        let spawn = spawn_point(&track);
        let mut run = Run::new(VehicleState::new(spawn, tracker.forward_heading()));
        tracker.hydrate(&mut run);

        let session = GameSession {
            track,
            params: VehicleParams::default(),
            run,
            settings,
            mapper: InputMapper::new(settings.input_mode),
            tracker,
            driver: FixedStep::new(),
            store,
            sink,
        };
        session.publish();
        session
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    pub fn start_run(&mut self) {
        if self.run.active {
            return;
        }
        let spawn = spawn_point(&self.track);
        self.run.vehicle.reset_to(spawn, self.tracker.forward_heading());
        self.run.lap.reset();
        self.run.active = true;
        self.driver.start();
        info!("run started on {}", self.track.name);
        self.publish();
    }

    pub fn stop_run(&mut self) {
        if !self.run.active {
            return;
        }
        self.run.active = false;
        self.driver.stop();
        self.tracker.update(&mut self.run); // clears crossing state
        info!(
            "run stopped after {} lap(s), best {:?}",
            self.run.lap.lap_count, self.run.lap.best_time
        );
        self.publish();
    }

    /// Host frame callback: banks elapsed time and runs the fixed-step
    /// ticks that fit. Each tick consumes the current input snapshot.
    pub fn frame(&mut self, now: Instant) {
        let ticks = self.driver.frame(now);
        for _ in 0..ticks {
            self.tick(self.driver.step());
        }
        if ticks > 0 {
            self.publish();
        }
    }

    fn tick(&mut self, dt: f64) {
        let controls = self.mapper.sample();
        let kind = self
            .track
            .surface_at(self.run.vehicle.position.x, self.run.vehicle.position.y);
        let surface = Surface::for_zone(kind);

        physics::integrate(&mut self.run.vehicle, &self.params, dt, &controls, &surface);
        physics::collision::resolve_barrier_collision(&mut self.run.vehicle, &self.track);
        self.run.lap.tick(dt, self.run.vehicle.speed);
        self.tracker.update(&mut self.run);
    }

    pub fn on_gesture_move(&mut self, x: f64, y: f64) {
        self.mapper.on_gesture_move(x, y);
    }

    pub fn on_gesture_release(&mut self) {
        self.mapper.on_gesture_release();
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.settings.input_mode = mode;
        self.mapper.set_mode(mode);
        self.persist_setting(&GLOBAL_CONFIG.input_mode_key, mode.as_str());
        self.publish();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.persist_setting(&GLOBAL_CONFIG.sound_enabled_key, &enabled.to_string());
        self.publish();
    }

    fn persist_setting(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!("failed to persist setting {}: {}", key, err);
        }
    }

    fn publish(&self) {
        self.sink.publish(&Snapshot {
            run_active: self.run.active,
            vehicle: self.run.vehicle,
            lap: self.run.lap.clone(),
            settings: self.settings,
        });
    }
}

/// Grid slot: the middle of the start line, or the middle of the track
/// if the geometry has no start line.
fn spawn_point(track: &Track) -> DVec2 {
    track
        .start_line()
        .map(|zone| zone.bounds.center())
        .unwrap_or_else(|| {
            DVec2::new(track.dimensions.width / 2.0, track.dimensions.height / 2.0)
        })
}

/// Preferences survive restarts; missing or malformed values fall back
/// to defaults.
fn hydrate_settings(store: &dyn KeyValueStore) -> RunSettings {
    let mut settings = RunSettings::default();

    match store.get(&GLOBAL_CONFIG.input_mode_key) {
        Ok(Some(stored)) => {
            if let Some(mode) = InputMode::from_stored(&stored) {
                settings.input_mode = mode;
            }
        }
        Ok(None) => {}
        Err(err) => warn!("failed to load input mode: {}", err),
    }

    match store.get(&GLOBAL_CONFIG.sound_enabled_key) {
        Ok(Some(stored)) => {
            if let Ok(enabled) = stored.parse::<bool>() {
                settings.sound_enabled = enabled;
            }
        }
        Ok(None) => {}
        Err(err) => warn!("failed to load sound setting: {}", err),
    }

    settings
}
