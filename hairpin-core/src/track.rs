use std::collections::HashMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneKind {
    Asphalt,
    Grass,
    Barrier,
    StartLine,
}

// Surface lookup resolves overlapping zones by kind, not by insertion
// order: a barrier must win even when an asphalt zone is drawn over it.
const ZONE_PRIORITY: [ZoneKind; 4] = [
    ZoneKind::Barrier,
    ZoneKind::StartLine,
    ZoneKind::Asphalt,
    ZoneKind::Grass,
];

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackZone {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    pub bounds: Bounds,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackData {
    pub name: String,
    pub dimensions: Dimensions,
    pub zones: Vec<TrackZone>,
}

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("malformed track data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Static track geometry. Zones are immutable once loaded and may
/// overlap; see [`Track::surface_at`] for how overlaps resolve.
pub struct Track {
    pub name: String,
    pub dimensions: Dimensions,
    zones: Vec<TrackZone>,
}

impl Track {
    pub fn new(data: TrackData) -> Track {
        Track {
            name: data.name,
            dimensions: data.dimensions,
            zones: data.zones,
        }
    }

    pub fn from_json(json: &str) -> Result<Track, TrackError> {
        let data: TrackData = serde_json::from_str(json)?;
        Ok(Track::new(data))
    }

    pub fn zones(&self) -> &[TrackZone] {
        &self.zones
    }

    pub fn zones_by_kind(&self, kind: ZoneKind) -> impl Iterator<Item = &TrackZone> {
        self.zones.iter().filter(move |zone| zone.kind == kind)
    }

    pub fn start_line(&self) -> Option<&TrackZone> {
        self.zones_by_kind(ZoneKind::StartLine).next()
    }

    pub fn surface_at(&self, x: f64, y: f64) -> ZoneKind {
        let point = DVec2::new(x, y);
        for kind in ZONE_PRIORITY {
            if self
                .zones_by_kind(kind)
                .any(|zone| zone.bounds.contains(point))
            {
                return kind;
            }
        }

        ZoneKind::Grass
    }
}

/// Named tracks registered at startup, looked up by id.
#[derive(Default)]
pub struct TrackRegistry {
    tracks: HashMap<String, Track>,
}

impl TrackRegistry {
    pub fn new() -> TrackRegistry {
        TrackRegistry::default()
    }

    pub fn register(&mut self, id: &str, data: TrackData) -> &Track {
        self.tracks.insert(id.to_string(), Track::new(data));
        &self.tracks[id]
    }

    pub fn load(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }
}
