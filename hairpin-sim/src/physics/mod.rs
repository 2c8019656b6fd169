use glam::DVec2;

use hairpin_core::controls::ControlSignal;
use hairpin_core::surface::Surface;
use hairpin_core::vehicle::{VehicleParams, VehicleState};

pub mod collision;


pub fn normalize_heading(angle: f64) -> f64 {
    let mut next = angle % 360.0;
    if next < 0.0 {
        next += 360.0;
    }
    next
}

/* Advance one car by one fixed timestep. Pure function of its inputs;
 * the caller owns the state and hands it over for exactly one tick. */
pub fn integrate(
    state: &mut VehicleState,
    params: &VehicleParams,
    dt: f64,
    controls: &ControlSignal,
    surface: &Surface,
) {
    let steer_input = controls.steer.clamp(-1.0, 1.0);

    // Accelerator and brake are additive; holding both nets out.
    let mut next_speed = state.speed;
    if controls.accelerate {
        next_speed += params.accel * dt;
    }
    if controls.brake {
        next_speed -= params.brake_power * dt;
    }

    // Rolling resistance is linear in speed, drag quadratic.
    // https://asawicki.info/Mirror/Car%20Physics%20for%20Games/Car%20Physics%20for%20Games.html
    next_speed -= surface.friction_multiplier * params.friction * next_speed * dt;
    next_speed -= surface.drag * next_speed * next_speed * dt;
    next_speed = next_speed.clamp(0.0, params.max_speed);

    // Turning authority grows with speed: a stationary car cannot turn.
    let speed_factor = if params.max_speed == 0.0 {
        0.0
    } else {
        next_speed / params.max_speed
    };
    let turn_amount = steer_input * params.turn_rate * surface.grip * dt * speed_factor;
    state.heading = normalize_heading(state.heading + turn_amount);

    let radians = state.heading.to_radians();
    state.velocity = DVec2::new(radians.cos(), radians.sin()) * next_speed;
    state.position += state.velocity * dt;
    state.speed = next_speed;
}
