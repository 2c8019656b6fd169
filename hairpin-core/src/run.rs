use serde::{Deserialize, Serialize};

use crate::controls::InputMode;
use crate::lap_record::LapRecord;
use crate::vehicle::VehicleState;

/// Player-facing preferences, hydrated from storage at startup.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RunSettings {
    pub input_mode: InputMode,
    pub sound_enabled: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            input_mode: InputMode::default(),
            sound_enabled: true,
        }
    }
}

/// One play session. `active` gates both the fixed-step driver and the
/// lap detector; everything inside is mutated only from the tick path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub active: bool,
    pub vehicle: VehicleState,
    pub lap: LapRecord,
}

impl Run {
    pub fn new(vehicle: VehicleState) -> Run {
        Run {
            active: false,
            vehicle,
            lap: LapRecord::new(),
        }
    }
}
