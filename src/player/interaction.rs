//! Proximity detection and the interact dispatcher.

use bevy::prelude::*;
use crate::shared::*;
use crate::world::rooms::RoomRegistry;
use crate::world::ActiveRoom;

/// What the player could act on from `player_tile`.
///
/// NPCs count within Manhattan distance `1..=NPC_INTERACT_RANGE` of their
/// current rounded position (home tile if they have no wander state yet).
/// Exits count within Chebyshev distance `EXIT_INTERACT_RANGE`. Ties go to
/// whichever comes first in the room's authoring order.
pub fn resolve_proximity(player_tile: TilePos, room: &Room, wander: &NpcWanderStates) -> Proximity {
    let nearby_npc = room.npcs.iter().find_map(|npc| {
        let npc_tile = wander.get(&npc.id).map_or(npc.home, WanderState::tile);
        let distance = player_tile.manhattan(npc_tile);
        (distance > 0 && distance <= NPC_INTERACT_RANGE).then(|| NearbyNpc {
            id: npc.id.clone(),
            name: npc.name.clone(),
            dialogue: npc.dialogue.clone(),
            distance,
        })
    });

    let nearby_exit = room
        .exits
        .iter()
        .enumerate()
        .find(|(_, exit)| player_tile.chebyshev(exit.tile) <= EXIT_INTERACT_RANGE)
        .map(|(index, exit)| NearbyExit {
            index,
            exit: exit.clone(),
        });

    Proximity {
        nearby_npc,
        nearby_exit,
    }
}

pub fn update_proximity(
    registry: Option<Res<RoomRegistry>>,
    active: Res<ActiveRoom>,
    player: Res<PlayerState>,
    wander: Res<NpcWanderStates>,
    mut proximity: ResMut<Proximity>,
) {
    let Some(registry) = registry else {
        return;
    };
    let Some(room) = active.room(&registry) else {
        return;
    };
    let resolved = resolve_proximity(player.tile(), room, &wander);
    // Avoid tripping change detection every frame.
    if *proximity != resolved {
        *proximity = resolved;
    }
}

/// At most one action per interact press: talking wins over leaving.
pub fn dispatch_interaction(
    input: Res<PlayerInput>,
    proximity: Res<Proximity>,
    mut interact_events: EventWriter<NpcInteractEvent>,
    mut room_requests: EventWriter<RoomChangeRequest>,
) {
    if !input.interact {
        return;
    }

    if let Some(npc) = &proximity.nearby_npc {
        info!("[player] Talking to {} ('{}')", npc.name, npc.dialogue);
        interact_events.send(NpcInteractEvent {
            npc_id: npc.id.clone(),
            dialogue: npc.dialogue.clone(),
        });
    } else if let Some(nearby) = &proximity.nearby_exit {
        info!("[player] Using exit '{}'", nearby.exit.label);
        room_requests.send(RoomChangeRequest {
            to_room: nearby.exit.to_room.clone(),
            spawn: nearby.exit.spawn,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc(id: &str, home: TilePos) -> NpcSpawn {
        NpcSpawn {
            id: id.into(),
            name: id.to_uppercase(),
            home,
            skin: Rgb(0.9, 0.75, 0.6),
            shirt: Rgb(0.3, 0.3, 0.8),
            dialogue: format!("{}_intro", id),
            fact_id: None,
        }
    }

    fn exit(col: i32, row: i32, to: &str) -> Exit {
        Exit {
            tile: TilePos::new(col, row),
            to_room: to.into(),
            spawn: TilePos::new(7, 5),
            label: format!("To {}", to),
        }
    }

    fn room(npcs: Vec<NpcSpawn>, exits: Vec<Exit>) -> Room {
        Room {
            id: "plaza".into(),
            name: "Plaza".into(),
            theme: RoomTheme::default(),
            outdoor: true,
            exits,
            npcs,
            decorations: vec![],
        }
    }

    #[test]
    fn test_npc_range_boundary_is_manhattan_two() {
        let room = room(vec![npc("ada", TilePos::new(7, 5))], vec![]);
        let wander = NpcWanderStates::for_room(&room);

        let near = resolve_proximity(TilePos::new(6, 4), &room, &wander);
        assert_eq!(near.nearby_npc.as_ref().map(|n| n.distance), Some(2));

        let far = resolve_proximity(TilePos::new(5, 4), &room, &wander);
        assert!(far.nearby_npc.is_none());
    }

    #[test]
    fn test_same_tile_is_not_nearby() {
        let room = room(vec![npc("ada", TilePos::new(7, 5))], vec![]);
        let wander = NpcWanderStates::for_room(&room);
        assert!(resolve_proximity(TilePos::new(7, 5), &room, &wander).nearby_npc.is_none());
    }

    #[test]
    fn test_npc_uses_current_wander_position() {
        let room = room(vec![npc("ada", TilePos::new(7, 5))], vec![]);
        let mut wander = NpcWanderStates::for_room(&room);
        if let Some(state) = wander.states.get_mut("ada") {
            state.pos = TilePos::new(10, 5).to_pixel();
        }
        assert!(resolve_proximity(TilePos::new(6, 5), &room, &wander).nearby_npc.is_none());
        assert!(resolve_proximity(TilePos::new(9, 5), &room, &wander).nearby_npc.is_some());
    }

    #[test]
    fn test_missing_wander_state_falls_back_to_home() {
        let room = room(vec![npc("ada", TilePos::new(7, 5))], vec![]);
        let empty = NpcWanderStates::default();
        assert!(resolve_proximity(TilePos::new(7, 6), &room, &empty).nearby_npc.is_some());
    }

    #[test]
    fn test_exit_range_boundary_is_chebyshev_one() {
        let room = room(vec![], vec![exit(0, 5, "street")]);
        let wander = NpcWanderStates::default();

        let diagonal = resolve_proximity(TilePos::new(1, 6), &room, &wander);
        assert_eq!(diagonal.nearby_exit.as_ref().map(|e| e.index), Some(0));

        let far = resolve_proximity(TilePos::new(2, 5), &room, &wander);
        assert!(far.nearby_exit.is_none());
    }

    #[test]
    fn test_first_listed_wins_ties() {
        let room = room(
            vec![npc("ada", TilePos::new(5, 5)), npc("bo", TilePos::new(7, 5))],
            vec![exit(0, 5, "street"), exit(0, 6, "park")],
        );
        let wander = NpcWanderStates::for_room(&room);

        let between = resolve_proximity(TilePos::new(6, 5), &room, &wander);
        assert_eq!(between.nearby_npc.map(|n| n.id), Some("ada".to_string()));

        let by_doors = resolve_proximity(TilePos::new(1, 5), &room, &wander);
        assert_eq!(by_doors.nearby_exit.map(|e| e.exit.to_room), Some("street".to_string()));
    }
}
