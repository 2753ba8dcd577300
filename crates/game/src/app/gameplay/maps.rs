use engine::{Rect, Vec2, ViewSize};
use serde::Deserialize;
use thiserror::Error;

use super::collision::{feet_rect, intersects};
use super::movement::{clamp_to_bounds, MovementProfile};
use super::scenes::SceneId;

const LABORATORY_JSON: &str = include_str!("../../../data/maps/laboratory.json");
const TOWN_JSON: &str = include_str!("../../../data/maps/town.json");
const GRASSLAND_JSON: &str = include_str!("../../../data/maps/grassland.json");

#[derive(Debug, Error)]
pub(crate) enum MapDataError {
    #[error("map '{map}': parse error at {path}: {source}")]
    Parse {
        map: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("map '{map}': {reason}")]
    Invalid { map: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MapSize {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl From<MapSize> for ViewSize {
    fn from(size: MapSize) -> Self {
        ViewSize::new(size.width, size.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Background {
    pub(crate) sprite: String,
    pub(crate) rect: Rect,
    pub(crate) fallback: [u8; 4],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Portal {
    pub(crate) rect: Rect,
    pub(crate) target: SceneId,
}

/// How close the player must stand to read a bulletin board.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BoardReach {
    /// Player point within `25 + w/2` of the board center.
    Radius,
    /// Feet rect overlapping the board grown by the margin.
    Expanded(f32),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum InteractableKind {
    Npc {
        name: String,
        sprite: String,
        lines: Vec<String>,
    },
    BulletinBoard {
        reach: BoardReach,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Interactable {
    pub(crate) rect: Rect,
    pub(crate) kind: InteractableKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StarterTable {
    pub(crate) rect: Rect,
    pub(crate) balls: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Arrival {
    pub(crate) from: SceneId,
    pub(crate) at: Vec2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Spawns {
    pub(crate) default: Vec2,
    #[serde(default)]
    pub(crate) arrivals: Vec<Arrival>,
}

/// Immutable per-scene data. Every coordinate is in map space once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MapDefinition {
    pub(crate) id: SceneId,
    pub(crate) size: MapSize,
    /// Shift applied to every coordinate below when the map is loaded.
    #[serde(default)]
    origin: Vec2,
    pub(crate) walk_bounds: Rect,
    pub(crate) background: Background,
    pub(crate) movement: MovementProfile,
    pub(crate) barriers: Vec<Rect>,
    #[serde(default)]
    pub(crate) ledges: Vec<Rect>,
    #[serde(default)]
    pub(crate) portals: Vec<Portal>,
    #[serde(default)]
    pub(crate) interactables: Vec<Interactable>,
    #[serde(default)]
    pub(crate) starter_table: Option<StarterTable>,
    #[serde(default)]
    pub(crate) grass_zones: Vec<Rect>,
    pub(crate) spawns: Spawns,
}

impl MapDefinition {
    pub(crate) fn spawn_for(&self, arrival: Option<SceneId>) -> Vec2 {
        arrival
            .and_then(|from| {
                self.spawns
                    .arrivals
                    .iter()
                    .find(|entry| entry.from == from)
            })
            .map(|entry| entry.at)
            .unwrap_or(self.spawns.default)
    }

    pub(crate) fn view_size(&self) -> ViewSize {
        self.size.into()
    }

    fn apply_origin(mut self) -> Self {
        let Vec2 { x: dx, y: dy } = self.origin;
        if dx == 0.0 && dy == 0.0 {
            return self;
        }
        let shift = |rect: &mut Rect| *rect = rect.translated(dx, dy);
        let shift_point = |point: &mut Vec2| *point = point.offset(dx, dy);

        shift(&mut self.walk_bounds);
        shift(&mut self.background.rect);
        self.barriers.iter_mut().for_each(shift);
        self.ledges.iter_mut().for_each(shift);
        self.grass_zones.iter_mut().for_each(shift);
        for portal in &mut self.portals {
            shift(&mut portal.rect);
        }
        for interactable in &mut self.interactables {
            shift(&mut interactable.rect);
        }
        if let Some(table) = &mut self.starter_table {
            shift(&mut table.rect);
            table.balls.iter_mut().for_each(shift_point);
        }
        shift_point(&mut self.spawns.default);
        for arrival in &mut self.spawns.arrivals {
            shift_point(&mut arrival.at);
        }
        self.origin = Vec2::ZERO;
        self
    }

    fn validate(&self, map: &'static str) -> Result<(), MapDataError> {
        let invalid = |reason: String| MapDataError::Invalid { map, reason };

        if self.id.name() != map {
            return Err(invalid(format!("declares id '{}'", self.id)));
        }

        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Err(invalid(format!(
                "size must be positive, got {}x{}",
                self.size.width, self.size.height
            )));
        }
        if self.movement.base_speed <= 0.0 || self.movement.ramp_speed < self.movement.base_speed {
            return Err(invalid(format!(
                "movement speeds must satisfy 0 < base <= ramp, got {} and {}",
                self.movement.base_speed, self.movement.ramp_speed
            )));
        }
        let spawn_points = std::iter::once(("default", self.spawns.default)).chain(
            self.spawns
                .arrivals
                .iter()
                .map(|arrival| (arrival.from.name(), arrival.at)),
        );
        for (label, point) in spawn_points {
            if clamp_to_bounds(point, self.walk_bounds) != point {
                return Err(invalid(format!("spawn '{label}' lies outside walk bounds")));
            }
            if intersects(&feet_rect(point), &self.barriers) {
                return Err(invalid(format!("spawn '{label}' overlaps a barrier")));
            }
        }
        Ok(())
    }
}

/// The three overworld maps, parsed once at startup.
#[derive(Debug, Clone)]
pub(crate) struct MapCatalog {
    pub(crate) laboratory: MapDefinition,
    pub(crate) town: MapDefinition,
    pub(crate) grassland: MapDefinition,
}

impl MapCatalog {
    pub(crate) fn builtin() -> Result<Self, MapDataError> {
        Ok(Self {
            laboratory: parse_map("laboratory", LABORATORY_JSON)?,
            town: parse_map("town", TOWN_JSON)?,
            grassland: parse_map("grassland", GRASSLAND_JSON)?,
        })
    }
}

fn parse_map(map: &'static str, raw: &str) -> Result<MapDefinition, MapDataError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let definition = serde_path_to_error::deserialize::<_, MapDefinition>(&mut deserializer)
        .map_err(|error| {
            let path = error.path().to_string();
            MapDataError::Parse {
                map,
                path,
                source: error.into_inner(),
            }
        })?
        .apply_origin();
    definition.validate(map)?;
    Ok(definition)
}
