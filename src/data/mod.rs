//! Data layer: parses the embedded room and fact files at startup.
//!
//! Runs in OnEnter(GameState::Loading), inserts `RoomRegistry` and
//! `ContentRegistry`, then moves the game to `Playing`. A parse failure is
//! logged and the game stays in Loading.

use bevy::prelude::*;
use crate::content::{parse_content, FACTS_JSON};
use crate::shared::*;
use crate::world::rooms::{parse_world, WORLD_RON};

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

fn load_all_data(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    info!("[data] Loading world data…");

    let rooms = match parse_world(WORLD_RON) {
        Ok(rooms) => rooms,
        Err(e) => {
            error!("[data] {}", e);
            return;
        }
    };
    let content = match parse_content(FACTS_JSON) {
        Ok(content) => content,
        Err(e) => {
            error!("[data] {}", e);
            return;
        }
    };

    for problem in rooms.integrity_problems() {
        warn!("[data] {}", problem);
    }
    for room in rooms.iter() {
        for npc in &room.npcs {
            if let Some(id) = npc.fact_id.filter(|id| content.lookup(*id).is_none()) {
                warn!("[data] {}: npc '{}' unlocks unknown fact {}", room.id, npc.id, id);
            }
        }
    }

    let npc_count: usize = rooms.iter().map(|r| r.npcs.len()).sum();
    info!("[data]   Rooms loaded: {}, NPCs: {}", rooms.len(), npc_count);
    info!("[data]   Facts loaded: {}", content.len());

    commands.insert_resource(rooms);
    commands.insert_resource(content);

    info!("[data] All data loaded. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
