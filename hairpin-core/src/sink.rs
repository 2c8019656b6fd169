use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::lap_record::LapRecord;
use crate::run::RunSettings;
use crate::vehicle::VehicleState;

/// What the simulation publishes after every tick batch and every
/// player action; everything a UI layer needs to render a frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub run_active: bool,
    pub vehicle: VehicleState,
    pub lap: LapRecord,
    pub settings: RunSettings,
}

/// Write-only publication port. Implementations must let concurrent
/// readers observe either the pre- or post-publish snapshot, never a
/// partial one (single writer, many readers).
pub trait StateSink: Send + Sync {
    fn publish(&self, snapshot: &Snapshot);
}

pub struct NullSink;

impl StateSink for NullSink {
    fn publish(&self, _snapshot: &Snapshot) {}
}

/// Retains only the most recent snapshot, whole-snapshot swaps under a
/// lock. Enough for a headless front end or a test harness.
#[derive(Default)]
pub struct LatestSnapshotSink {
    latest: Mutex<Option<Snapshot>>,
}

impl LatestSnapshotSink {
    pub fn new() -> LatestSnapshotSink {
        LatestSnapshotSink::default()
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StateSink for LatestSnapshotSink {
    fn publish(&self, snapshot: &Snapshot) {
        if let Ok(mut guard) = self.latest.lock() {
            *guard = Some(snapshot.clone());
        }
    }
}
