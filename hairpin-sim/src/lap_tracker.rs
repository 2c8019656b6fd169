use std::sync::Arc;
use std::thread;

use glam::DVec2;
use log::{debug, warn};

use hairpin_core::run::Run;
use hairpin_core::storage::KeyValueStore;
use hairpin_core::track::{Track, TrackZone};
use hairpin_core::GLOBAL_CONFIG;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, point: DVec2) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

/* Detects forward start-line crossings and keeps lap bookkeeping on the
 * run it is handed each tick.
 *
 * Internally a three-state machine: idle while the run is inactive,
 * armed on the first active tick (baseline position captured, no lap
 * running yet), then tracking previous-vs-current position against the
 * start line every tick after that. The first qualifying crossing of a
 * run only starts the clock; laps count from the second one on. */
pub struct LapTracker {
    start_line: Option<TrackZone>,
    crossing_axis: Axis,
    span_axis: Axis,
    forward_vector: DVec2,
    forward_direction: f64,
    min_lap_time: f64,
    storage_key: String,
    store: Arc<dyn KeyValueStore>,
    cached_best: Option<f64>,
    last_position: Option<DVec2>,
    lap_started: bool,
    was_run_active: bool,
}

impl LapTracker {
    pub fn new(track: &Track, store: Arc<dyn KeyValueStore>) -> LapTracker {
        let start_line = track.start_line().cloned();

        // The short axis of the start-line rectangle is the one the car
        // crosses; a zone taller than wide is a vertical gate crossed
        // along x.
        let is_vertical = start_line
            .as_ref()
            .map(|zone| zone.bounds.height > zone.bounds.width)
            .unwrap_or(false);
        let (crossing_axis, span_axis, forward_vector) = if is_vertical {
            (Axis::X, Axis::Y, DVec2::X)
        } else {
            (Axis::Y, Axis::X, DVec2::Y)
        };

        let mut tracker = LapTracker {
            start_line,
            crossing_axis,
            span_axis,
            forward_vector,
            forward_direction: GLOBAL_CONFIG.forward_direction,
            min_lap_time: GLOBAL_CONFIG.min_lap_time,
            storage_key: GLOBAL_CONFIG.best_lap_key.clone(),
            store,
            cached_best: None,
            last_position: None,
            lap_started: false,
            was_run_active: false,
        };
        tracker.load_stored_best();
        tracker
    }

    /// Heading (degrees) pointing through the start line in the race
    /// direction; used to spawn the car facing the right way.
    pub fn forward_heading(&self) -> f64 {
        let forward = self.forward_vector * self.forward_direction;
        crate::physics::normalize_heading(forward.y.atan2(forward.x).to_degrees())
    }

    /// Best time read from storage at construction, if any.
    pub fn stored_best(&self) -> Option<f64> {
        self.cached_best
    }

    /// Applies the persisted best time to a fresh lap record.
    pub fn hydrate(&self, run: &mut Run) {
        if let Some(best) = self.cached_best {
            run.lap.hydrate_best(best);
        }
    }

    pub fn update(&mut self, run: &mut Run) {
        if !run.active || self.start_line.is_none() {
            if !run.active {
                self.was_run_active = false;
                self.lap_started = false;
                self.last_position = None;
            }
            return;
        }

        if !self.was_run_active {
            self.was_run_active = true;
            self.last_position = Some(run.vehicle.position);
            self.lap_started = false;
            return;
        }

        let current = run.vehicle.position;
        let Some(previous) = self.last_position else {
            self.last_position = Some(current);
            return;
        };

        if self.crossed_start_line(previous, current, run.vehicle.velocity) {
            if !self.lap_started {
                self.lap_started = true;
                debug!("start line armed; lap clock running");
            } else if run.lap.current_time >= self.min_lap_time {
                let lap_time = run.lap.current_time;
                run.lap.complete_lap(lap_time);
                debug!(
                    "lap {} complete in {:.3}s (best {:?})",
                    run.lap.lap_count, lap_time, run.lap.best_time
                );
                self.persist_best(run);
            }
            // a crossing sooner than min_lap_time is noise from sitting
            // on the line; ignore it entirely
        }

        self.last_position = Some(current);
    }

    fn crossed_start_line(&self, previous: DVec2, current: DVec2, velocity: DVec2) -> bool {
        let Some(zone) = &self.start_line else {
            return false;
        };
        let bounds = zone.bounds;

        let center = match self.crossing_axis {
            Axis::X => bounds.x + bounds.width / 2.0,
            Axis::Y => bounds.y + bounds.height / 2.0,
        };
        let prev_side = self.crossing_axis.of(previous) - center;
        let curr_side = self.crossing_axis.of(current) - center;

        let forward_cross = if self.forward_direction > 0.0 {
            prev_side <= 0.0 && curr_side > 0.0
        } else {
            prev_side >= 0.0 && curr_side < 0.0
        };
        if !forward_cross {
            return false;
        }

        // At least one endpoint must lie within the physical line, or
        // we would count crossings of its infinite extension.
        let (span_start, span_length) = match self.span_axis {
            Axis::X => (bounds.x, bounds.width),
            Axis::Y => (bounds.y, bounds.height),
        };
        let span_end = span_start + span_length;
        let prev_span = self.span_axis.of(previous);
        let curr_span = self.span_axis.of(current);
        let within_span = (prev_span >= span_start && prev_span <= span_end)
            || (curr_span >= span_start && curr_span <= span_end);
        if !within_span {
            return false;
        }

        // Reject stationary or reversing cars nudged over the line.
        let forward_velocity = velocity.dot(self.forward_vector) * self.forward_direction;
        forward_velocity > GLOBAL_CONFIG.forward_velocity_threshold
    }

    /* Best-time writes are fire and forget: a spawned thread talks to
     * the store so the tick path never blocks on I/O. */
    fn persist_best(&mut self, run: &Run) {
        let Some(best) = run.lap.best_time else {
            return;
        };
        if let Some(cached) = self.cached_best {
            if best >= cached {
                return;
            }
        }
        self.cached_best = Some(best);

        let store = Arc::clone(&self.store);
        let key = self.storage_key.clone();
        thread::spawn(move || {
            if let Err(err) = store.set(&key, &best.to_string()) {
                warn!("failed to persist best lap: {}", err);
            }
        });
    }

    fn load_stored_best(&mut self) {
        let stored = match self.store.get(&self.storage_key) {
            Ok(stored) => stored,
            Err(err) => {
                warn!("failed to load best lap: {}", err);
                return;
            }
        };
        let Some(stored) = stored else {
            return;
        };
        match stored.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => self.cached_best = Some(parsed),
            // a corrupt record reads as "no best yet"
            _ => warn!("ignoring non-numeric stored best lap {:?}", stored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use hairpin_core::storage::MemoryStore;
    use hairpin_core::track::{Bounds, Dimensions, TrackData, TrackZone, ZoneKind};
    use hairpin_core::vehicle::VehicleState;

    fn start_line_track() -> Track {
        Track::new(TrackData {
            name: "loop".to_string(),
            dimensions: Dimensions {
                width: 800.0,
                height: 600.0,
            },
            zones: vec![TrackZone {
                id: "start".to_string(),
                label: Some("Start/Finish".to_string()),
                kind: ZoneKind::StartLine,
                bounds: Bounds {
                    x: 390.0,
                    y: 0.0,
                    width: 20.0,
                    height: 60.0,
                },
            }],
        })
    }

    fn active_run_at(x: f64, y: f64) -> Run {
        let mut run = Run::new(VehicleState::new(DVec2::new(x, y), 0.0));
        run.active = true;
        run
    }

    fn place(run: &mut Run, x: f64, y: f64, vx: f64, vy: f64) {
        run.vehicle.position = DVec2::new(x, y);
        run.vehicle.velocity = DVec2::new(vx, vy);
        run.vehicle.speed = run.vehicle.velocity.length();
    }

    fn tracker_with_store(track: &Track) -> (LapTracker, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tracker = LapTracker::new(track, store.clone());
        (tracker, store)
    }

    /// Drives the run straight through the line once, with enough lap
    /// time on the clock to qualify.
    fn cross_forward(tracker: &mut LapTracker, run: &mut Run) {
        place(run, 380.0, 30.0, 50.0, 0.0);
        tracker.update(run);
        place(run, 410.0, 30.0, 50.0, 0.0);
        tracker.update(run);
    }

    #[test]
    fn first_crossing_arms_without_counting() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run); // armed: baseline captured
        run.lap.tick(5.0, 50.0);
        cross_forward(&mut tracker, &mut run);

        assert_eq!(run.lap.lap_count, 0);
        assert_eq!(run.lap.last_time, None);
    }

    #[test]
    fn second_crossing_counts_one_lap_with_elapsed_time() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run);
        cross_forward(&mut tracker, &mut run); // arms the lap clock

        run.lap.current_time = 0.0;
        run.lap.tick(7.5, 50.0);
        cross_forward(&mut tracker, &mut run);

        assert_eq!(run.lap.lap_count, 1);
        assert_eq!(run.lap.last_time, Some(7.5));
        assert_eq!(run.lap.best_time, Some(7.5));
        assert_eq!(run.lap.current_time, 0.0);
    }

    #[test]
    fn reverse_crossing_never_counts() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(410.0, 30.0);

        tracker.update(&mut run);
        run.lap.tick(10.0, 50.0);

        // backwards through the line, then forwards but reversing
        place(&mut run, 380.0, 30.0, -50.0, 0.0);
        tracker.update(&mut run);
        assert_eq!(run.lap.lap_count, 0);

        place(&mut run, 410.0, 30.0, -50.0, 0.0);
        tracker.update(&mut run);
        assert_eq!(run.lap.lap_count, 0);
        assert!(!tracker.lap_started);
    }

    #[test]
    fn crossing_outside_span_is_rejected() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 200.0);

        tracker.update(&mut run);
        run.lap.tick(10.0, 50.0);
        place(&mut run, 380.0, 200.0, 50.0, 0.0);
        tracker.update(&mut run);
        place(&mut run, 410.0, 200.0, 50.0, 0.0);
        tracker.update(&mut run);

        assert!(!tracker.lap_started);
    }

    #[test]
    fn slow_crossing_is_rejected() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run);
        place(&mut run, 399.0, 30.0, 0.5, 0.0);
        tracker.update(&mut run);
        place(&mut run, 401.0, 30.0, 0.5, 0.0);
        tracker.update(&mut run);

        assert!(!tracker.lap_started);
    }

    #[test]
    fn crossing_under_min_lap_time_is_noise() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run);
        cross_forward(&mut tracker, &mut run);

        run.lap.current_time = 0.0;
        run.lap.tick(0.5, 50.0); // under the two second floor
        cross_forward(&mut tracker, &mut run);

        assert_eq!(run.lap.lap_count, 0);
        assert_eq!(run.lap.last_time, None);
        assert_eq!(run.lap.best_time, None);
        // and the clock keeps running as if nothing happened
        assert_eq!(run.lap.current_time, 0.5);
    }

    #[test]
    fn deactivating_resets_tracking() {
        let track = start_line_track();
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run);
        cross_forward(&mut tracker, &mut run);
        assert!(tracker.lap_started);

        run.active = false;
        tracker.update(&mut run);
        assert!(!tracker.lap_started);
        assert!(tracker.last_position.is_none());

        // reactivating re-arms from a fresh baseline
        run.active = true;
        run.lap.reset();
        tracker.update(&mut run);
        run.lap.tick(5.0, 50.0);
        cross_forward(&mut tracker, &mut run);
        assert_eq!(run.lap.lap_count, 0);
    }

    #[test]
    fn missing_start_line_is_a_no_op() {
        let track = Track::new(TrackData {
            name: "open field".to_string(),
            dimensions: Dimensions {
                width: 800.0,
                height: 600.0,
            },
            zones: vec![],
        });
        let (mut tracker, _) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        for _ in 0..10 {
            cross_forward(&mut tracker, &mut run);
        }
        assert_eq!(run.lap.lap_count, 0);
    }

    #[test]
    fn horizontal_line_crosses_along_y() {
        let track = Track::new(TrackData {
            name: "sideways".to_string(),
            dimensions: Dimensions {
                width: 800.0,
                height: 600.0,
            },
            zones: vec![TrackZone {
                id: "start".to_string(),
                label: None,
                kind: ZoneKind::StartLine,
                bounds: Bounds {
                    x: 100.0,
                    y: 290.0,
                    width: 60.0,
                    height: 20.0,
                },
            }],
        });
        let (mut tracker, _) = tracker_with_store(&track);
        assert_eq!(tracker.forward_heading(), 90.0);

        let mut run = active_run_at(120.0, 280.0);
        tracker.update(&mut run);
        run.lap.tick(5.0, 50.0);
        place(&mut run, 120.0, 280.0, 0.0, 50.0);
        tracker.update(&mut run);
        place(&mut run, 120.0, 310.0, 0.0, 50.0);
        tracker.update(&mut run);
        assert!(tracker.lap_started);
    }

    #[test]
    fn hydrates_best_from_store_and_min_merges() {
        let track = start_line_track();
        let store = Arc::new(MemoryStore::new());
        store.set(&GLOBAL_CONFIG.best_lap_key, "30").unwrap();

        let tracker = LapTracker::new(&track, store.clone());
        assert_eq!(tracker.stored_best(), Some(30.0));

        let mut run = active_run_at(380.0, 30.0);
        tracker.hydrate(&mut run);
        assert_eq!(run.lap.best_time, Some(30.0));

        run.lap.complete_lap(25.0);
        assert_eq!(run.lap.best_time, Some(25.0));
    }

    #[test]
    fn corrupt_stored_best_reads_as_absent() {
        let track = start_line_track();
        let store = Arc::new(MemoryStore::new());
        store.set(&GLOBAL_CONFIG.best_lap_key, "not a number").unwrap();

        let tracker = LapTracker::new(&track, store);
        assert_eq!(tracker.stored_best(), None);
    }

    #[test]
    fn improved_best_is_persisted() {
        let track = start_line_track();
        let (mut tracker, store) = tracker_with_store(&track);
        let mut run = active_run_at(380.0, 30.0);

        tracker.update(&mut run);
        cross_forward(&mut tracker, &mut run);
        run.lap.current_time = 0.0;
        run.lap.tick(8.25, 50.0);
        cross_forward(&mut tracker, &mut run);
        assert_eq!(run.lap.best_time, Some(8.25));

        // the write happens on a spawned thread; give it a moment
        for _ in 0..50 {
            if store.get(&GLOBAL_CONFIG.best_lap_key).unwrap().is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(
            store.get(&GLOBAL_CONFIG.best_lap_key).unwrap().as_deref(),
            Some("8.25")
        );
    }
}
