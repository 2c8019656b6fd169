use serde::{Deserialize, Serialize};

/// How raw pointer gestures map to control signals. Selected from the
/// settings screen; never changes mid-gesture.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    TouchZones,
    Joystick,
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::TouchZones
    }
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::TouchZones => "touchZones",
            InputMode::Joystick => "joystick",
        }
    }

    /// Parses a persisted mode string, `None` for anything unknown.
    pub fn from_stored(value: &str) -> Option<InputMode> {
        match value {
            "touchZones" => Some(InputMode::TouchZones),
            "joystick" => Some(InputMode::Joystick),
            _ => None,
        }
    }
}

// ControlSignal is the per-tick snapshot the simulation consumes; the
// input mapper overwrites it on every gesture event, so only the
// latest state is ever visible to a tick.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ControlSignal {
    pub accelerate: bool,
    pub brake: bool,
    /// -1 (left) to 1 (right).
    pub steer: f64,
    /// 0 to 1; only meaningful in joystick mode.
    pub throttle: f64,
}
