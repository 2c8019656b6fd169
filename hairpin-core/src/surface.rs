use serde::{Deserialize, Serialize};

use crate::track::ZoneKind;
use crate::GLOBAL_CONFIG;

/// Per-tick surface properties under the car, derived from the zone
/// kind at its position.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Surface {
    pub grip: f64,
    pub friction_multiplier: f64,
    pub drag: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Surface {
            grip: 1.0,
            friction_multiplier: 1.0,
            drag: 0.0,
        }
    }
}

impl Surface {
    pub fn for_zone(kind: ZoneKind) -> Surface {
        match kind {
            ZoneKind::Grass => Surface {
                grip: GLOBAL_CONFIG.grass_grip,
                friction_multiplier: GLOBAL_CONFIG.grass_friction_multiplier,
                drag: GLOBAL_CONFIG.grass_drag,
            },
            // Barriers and the start line sit on top of pavement; the
            // surface under the car is still asphalt there.
            ZoneKind::Asphalt | ZoneKind::Barrier | ZoneKind::StartLine => Surface::default(),
        }
    }
}
