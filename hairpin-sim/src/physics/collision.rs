use hairpin_core::track::Track;
use hairpin_core::vehicle::VehicleState;
use hairpin_core::GLOBAL_CONFIG;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/* Push the car just outside whichever barrier edge it penetrated least,
 * and kill the velocity component that points into the wall. Point-vs-
 * rect only; a car faster than (barrier thickness / dt) can tunnel,
 * which we accept. */
pub fn resolve_barrier_collision(state: &mut VehicleState, track: &Track) {
    let barrier = track
        .zones_by_kind(hairpin_core::track::ZoneKind::Barrier)
        .find(|zone| zone.bounds.contains(state.position));

    let Some(barrier) = barrier else {
        return;
    };

    let bounds = barrier.bounds;
    let distances = [
        (Edge::Left, state.position.x - bounds.x),
        (Edge::Right, bounds.x + bounds.width - state.position.x),
        (Edge::Top, state.position.y - bounds.y),
        (Edge::Bottom, bounds.y + bounds.height - state.position.y),
    ];

    // Minimum penetration picks the separating axis.
    let (edge, _) = distances
        .iter()
        .copied()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(distances[0]);

    let epsilon = GLOBAL_CONFIG.collision_epsilon;
    match edge {
        Edge::Left => {
            state.position.x = bounds.x - epsilon;
            if state.velocity.x > 0.0 {
                state.velocity.x = 0.0;
            }
        }
        Edge::Right => {
            state.position.x = bounds.x + bounds.width + epsilon;
            if state.velocity.x < 0.0 {
                state.velocity.x = 0.0;
            }
        }
        Edge::Top => {
            state.position.y = bounds.y - epsilon;
            if state.velocity.y > 0.0 {
                state.velocity.y = 0.0;
            }
        }
        Edge::Bottom => {
            state.position.y = bounds.y + bounds.height + epsilon;
            if state.velocity.y < 0.0 {
                state.velocity.y = 0.0;
            }
        }
    }

    state.speed = state.velocity.length();
}
