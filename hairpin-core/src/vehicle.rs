use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::GLOBAL_CONFIG;

/// Tuning constants for one car class; shared by reference and never
/// mutated during a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleParams {
    pub max_speed: f64,
    pub accel: f64,
    pub brake_power: f64,
    pub friction: f64,
    pub turn_rate: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        VehicleParams {
            max_speed: GLOBAL_CONFIG.car_max_speed,
            accel: GLOBAL_CONFIG.car_accel,
            brake_power: GLOBAL_CONFIG.car_brake_power,
            friction: GLOBAL_CONFIG.car_friction,
            turn_rate: GLOBAL_CONFIG.car_turn_rate,
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Degrees, always normalized into [0, 360).
    pub heading: f64,
    /// Scalar speed, always >= 0.
    pub speed: f64,
}

impl VehicleState {
    pub fn new(position: DVec2, heading: f64) -> VehicleState {
        VehicleState {
            position,
            velocity: DVec2::ZERO,
            heading,
            speed: 0.0,
        }
    }

    /// Puts the car back on a grid slot with no residual motion.
    pub fn reset_to(&mut self, position: DVec2, heading: f64) {
        self.position = position;
        self.velocity = DVec2::ZERO;
        self.heading = heading;
        self.speed = 0.0;
    }
}
