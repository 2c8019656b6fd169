use config::{Config, ConfigError, File};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Settings {
    // fixed-step driver
    pub ticks_per_second: f64,
    pub max_accumulated_ticks: u32,

    // lap detection
    pub min_lap_time: f64,
    pub forward_direction: f64,
    pub forward_velocity_threshold: f64,

    // collision
    pub collision_epsilon: f64,

    // default car class
    pub car_max_speed: f64,
    pub car_accel: f64,
    pub car_brake_power: f64,
    pub car_friction: f64,
    pub car_turn_rate: f64,

    // off-track surface feel
    pub grass_grip: f64,
    pub grass_friction_multiplier: f64,
    pub grass_drag: f64,

    // input geometry
    pub screen_width: f64,
    pub screen_height: f64,
    pub joystick_center_x: f64,
    pub joystick_center_y: f64,
    pub joystick_radius: f64,
    pub joystick_throttle_deadzone: f64,

    // persistence keys
    pub best_lap_key: String,
    pub input_mode_key: String,
    pub sound_enabled_key: String,
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("ticks_per_second", 60.0)?
            .set_default("max_accumulated_ticks", 5)?
            .set_default("min_lap_time", 2.0)?
            .set_default("forward_direction", 1.0)?
            .set_default("forward_velocity_threshold", 1.0)?
            .set_default("collision_epsilon", 0.5)?
            .set_default("car_max_speed", 220.0)?
            .set_default("car_accel", 140.0)?
            .set_default("car_brake_power", 260.0)?
            .set_default("car_friction", 0.4)?
            .set_default("car_turn_rate", 160.0)?
            .set_default("grass_grip", 0.6)?
            .set_default("grass_friction_multiplier", 2.5)?
            .set_default("grass_drag", 0.002)?
            .set_default("screen_width", 390.0)?
            .set_default("screen_height", 844.0)?
            .set_default("joystick_center_x", 100.0)?
            .set_default("joystick_center_y", 700.0)?
            .set_default("joystick_radius", 50.0)?
            .set_default("joystick_throttle_deadzone", 0.05)?
            .set_default("best_lap_key", "best_lap")?
            .set_default("input_mode_key", "input_mode")?
            .set_default("sound_enabled_key", "sound_enabled")?
            .add_source(File::with_name("config.yaml").required(false))
            .build()?;

        config.try_deserialize()
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}
