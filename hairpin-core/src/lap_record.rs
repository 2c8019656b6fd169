use serde::{Deserialize, Serialize};

/// Run-scoped lap bookkeeping. `current_time` and `distance` grow every
/// tick; the rest changes only on a qualifying start-line crossing.
/// `best_time` is the one field that outlives a run — it is hydrated
/// from storage at startup and only ever improves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LapRecord {
    pub current_time: f64,
    pub last_time: Option<f64>,
    pub best_time: Option<f64>,
    pub lap_count: u32,
    pub current_lap_index: u32,
    pub distance: f64,
    pub lap_times: Vec<f64>,
}

impl LapRecord {
    pub fn new() -> LapRecord {
        LapRecord {
            current_time: 0.0,
            last_time: None,
            best_time: None,
            lap_count: 0,
            current_lap_index: 0,
            distance: 0.0,
            lap_times: Vec::new(),
        }
    }

    /// Per-tick accumulation while a run is active.
    pub fn tick(&mut self, dt: f64, speed: f64) {
        self.current_time += dt;
        self.distance += speed * dt;
    }

    /// Finalizes the lap that just ended with elapsed time `lap_time`.
    pub fn complete_lap(&mut self, lap_time: f64) {
        self.lap_times.push(lap_time);
        self.lap_count += 1;
        self.current_lap_index += 1;
        self.last_time = Some(lap_time);
        self.best_time = Some(match self.best_time {
            Some(best) => best.min(lap_time),
            None => lap_time,
        });
        self.current_time = 0.0;
        self.distance = 0.0;
    }

    /// Adopts a persisted best time if it beats the in-memory one.
    pub fn hydrate_best(&mut self, stored: f64) {
        self.best_time = Some(match self.best_time {
            Some(best) => best.min(stored),
            None => stored,
        });
    }

    /// Clears everything but the best time for a fresh run.
    pub fn reset(&mut self) {
        let best_time = self.best_time;
        *self = LapRecord::new();
        self.best_time = best_time;
    }
}

impl Default for LapRecord {
    fn default() -> Self {
        LapRecord::new()
    }
}
