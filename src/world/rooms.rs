//! Room definitions for the neighborhood.
//!
//! Rooms are authored in RON (`assets/data/world.ron`) and embedded into the
//! binary, so there is no file I/O at runtime. Exits reference rooms by id;
//! all referential integrity is a property of the data set, checked by
//! `RoomRegistry::integrity_problems` in tests and logged at load.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::shared::*;
use super::collision::build_collision_map;

pub const WORLD_RON: &str = include_str!("../../assets/data/world.ron");

/// On-disk shape of the world file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDef {
    pub start_room: RoomId,
    pub start_spawn: TilePos,
    pub rooms: Vec<Room>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RoomRegistry {
    pub rooms: HashMap<RoomId, Room>,
    /// Authoring order, for stable iteration.
    pub order: Vec<RoomId>,
    pub start_room: RoomId,
    pub start_spawn: TilePos,
}

impl RoomRegistry {
    pub fn from_def(def: WorldDef) -> Self {
        let mut registry = RoomRegistry {
            start_room: def.start_room,
            start_spawn: def.start_spawn,
            ..default()
        };
        for room in def.rooms {
            registry.insert(room);
        }
        registry
    }

    pub fn insert(&mut self, room: Room) {
        if !self.rooms.contains_key(&room.id) {
            self.order.push(room.id.clone());
        }
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn get(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Every violation of the data-set invariants, as readable messages.
    pub fn integrity_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.rooms.contains_key(&self.start_room) {
            problems.push(format!("start room '{}' is not defined", self.start_room));
        }

        for room in self.iter() {
            let map = build_collision_map(room);

            for exit in &room.exits {
                if !exit.tile.on_border() {
                    problems.push(format!(
                        "{}: exit '{}' at {:?} is not on the border",
                        room.id, exit.label, exit.tile
                    ));
                }
                if let Some(deco) = room.decorations.iter().find(|d| d.covers(exit.tile)) {
                    problems.push(format!(
                        "{}: {:?} covers exit '{}'",
                        room.id, deco.kind, exit.label
                    ));
                }
                match self.rooms.get(&exit.to_room) {
                    None => problems.push(format!(
                        "{}: exit '{}' targets unknown room '{}'",
                        room.id, exit.label, exit.to_room
                    )),
                    Some(target) => {
                        let target_map = build_collision_map(target);
                        if !exit.spawn.is_interior() || !target_map.is_open(exit.spawn) {
                            problems.push(format!(
                                "{}: exit '{}' spawns on unwalkable {:?} in '{}'",
                                room.id, exit.label, exit.spawn, target.id
                            ));
                        }
                    }
                }
            }

            for npc in &room.npcs {
                if !npc.home.is_interior() || !map.is_open(npc.home) {
                    problems.push(format!(
                        "{}: npc '{}' lives on unwalkable {:?}",
                        room.id, npc.id, npc.home
                    ));
                }
            }
        }

        problems
    }
}

pub fn parse_world(src: &str) -> Result<RoomRegistry, String> {
    let def: WorldDef =
        ron::from_str(src).map_err(|e| format!("World data parse failed: {}", e))?;
    if def.rooms.is_empty() {
        return Err("World data defines no rooms".to_string());
    }
    let mut seen_rooms = HashSet::new();
    let mut seen_npcs = HashSet::new();
    for room in &def.rooms {
        if !seen_rooms.insert(room.id.as_str()) {
            return Err(format!("Duplicate room id '{}'", room.id));
        }
        for npc in &room.npcs {
            if !seen_npcs.insert(npc.id.as_str()) {
                return Err(format!("NPC id '{}' is used in more than one place", npc.id));
            }
        }
    }
    Ok(RoomRegistry::from_def(def))
}
