use glam::DVec2;

use hairpin_core::controls::{ControlSignal, InputMode};
use hairpin_core::GLOBAL_CONFIG;

/* Turns raw pointer gestures into the control snapshot the tick loop
 * samples. Only the latest derived signal is held; gesture events that
 * land between ticks overwrite each other rather than queue. */
pub struct InputMapper {
    mode: InputMode,
    screen_width: f64,
    screen_height: f64,
    joystick_center: DVec2,
    joystick_radius: f64,
    signal: ControlSignal,
}

impl InputMapper {
    pub fn new(mode: InputMode) -> InputMapper {
        InputMapper {
            mode,
            screen_width: GLOBAL_CONFIG.screen_width,
            screen_height: GLOBAL_CONFIG.screen_height,
            joystick_center: DVec2::new(
                GLOBAL_CONFIG.joystick_center_x,
                GLOBAL_CONFIG.joystick_center_y,
            ),
            joystick_radius: GLOBAL_CONFIG.joystick_radius,
            signal: ControlSignal::default(),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Switching modes drops any in-progress gesture back to neutral.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.signal = ControlSignal::default();
    }

    /// The once-per-tick read.
    pub fn sample(&self) -> ControlSignal {
        self.signal
    }

    pub fn on_gesture_move(&mut self, x: f64, y: f64) {
        match self.mode {
            InputMode::TouchZones => self.touch_zone_move(x, y),
            InputMode::Joystick => self.joystick_move(x, y),
        }
    }

    pub fn on_gesture_release(&mut self) {
        self.signal = ControlSignal::default();
    }

    fn touch_zone_move(&mut self, x: f64, y: f64) {
        // left half steers left, right half steers right; the brake pad
        // is the bottom quarter of the right half
        let steer = if x < self.screen_width / 2.0 { -1.0 } else { 1.0 };
        let brake = y > self.screen_height * 0.75 && x > self.screen_width * 0.5;
        self.signal = ControlSignal {
            accelerate: true,
            brake,
            steer,
            throttle: 0.0,
        };
    }

    fn joystick_move(&mut self, x: f64, y: f64) {
        let dx = x - self.joystick_center.x;
        // screen y grows downward; invert so pushing up is positive
        let dy = self.joystick_center.y - y;
        let distance = (dx * dx + dy * dy).sqrt().min(self.joystick_radius);
        let normalized = if self.joystick_radius == 0.0 {
            0.0
        } else {
            distance / self.joystick_radius
        };
        let angle = dy.atan2(dx);

        let steer = (angle.cos() * normalized).clamp(-1.0, 1.0);
        let throttle = (angle.sin() * normalized).clamp(0.0, 1.0);
        self.signal = ControlSignal {
            accelerate: throttle > GLOBAL_CONFIG.joystick_throttle_deadzone,
            brake: false,
            steer,
            throttle,
        };
    }
}
