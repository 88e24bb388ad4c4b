//! World domain plugin for Storylane.
//!
//! Responsible for:
//! - The active room and its derived collision map
//! - Room activation (spawn resolution, fresh NPC wander states)
//! - The delayed, generation-guarded room transition

use bevy::prelude::*;

use crate::shared::*;
use crate::simulation::SimSet;

pub mod collision;
pub mod render;
pub mod rooms;
pub mod transition;

use collision::{build_collision_map, find_safe_spawn, CollisionMap};
use rooms::RoomRegistry;
use transition::{complete_room_transition, handle_room_change_requests, RoomTransition};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveRoom>()
            .init_resource::<RoomTransition>()
            .init_resource::<NpcWanderStates>()
            .init_resource::<Proximity>()
            .add_event::<RoomChangeRequest>()
            .add_event::<TransitionStartedEvent>()
            .add_event::<RoomChangedEvent>()
            // Data is guaranteed loaded once Loading is left.
            .add_systems(OnExit(GameState::Loading), enter_start_room)
            // The delay keeps ticking in every state so a pending swap
            // cannot get stuck behind a dialogue or pause. Completion runs
            // first so a freshly armed timer is not ticked on its own frame.
            .add_systems(
                Update,
                (complete_room_transition, handle_room_change_requests)
                    .chain()
                    .in_set(SimSet::Transition),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The room the player is standing in.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveRoom {
    pub room_id: RoomId,
    pub collision: CollisionMap,
    /// Bumped on every activation. Zero means no room is active yet.
    pub generation: u64,
}

impl ActiveRoom {
    pub fn is_loaded(&self) -> bool {
        self.generation > 0
    }

    pub fn room<'a>(&self, registry: &'a RoomRegistry) -> Option<&'a Room> {
        registry.get(&self.room_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ACTIVATION
// ═══════════════════════════════════════════════════════════════════════

/// Make `room_id` the active room and place the player near `spawn`.
///
/// Returns the change notification, or `None` (leaving everything as it
/// was) if the id is unknown.
pub fn activate_room(
    registry: &RoomRegistry,
    room_id: &str,
    spawn: TilePos,
    active: &mut ActiveRoom,
    player: &mut PlayerState,
    wander: &mut NpcWanderStates,
    proximity: &mut Proximity,
) -> Option<RoomChangedEvent> {
    let room = registry.get(room_id)?;

    let collision = build_collision_map(room);
    let resolved = find_safe_spawn(&collision, spawn, &room.npc_homes());
    if resolved != spawn {
        debug!(
            "[world] Spawn {:?} in '{}' unsafe, moved to {:?}",
            spawn, room.id, resolved
        );
    }

    let from_room = active.is_loaded().then(|| active.room_id.clone());

    active.room_id = room.id.clone();
    active.collision = collision;
    active.generation += 1;

    *wander = NpcWanderStates::for_room(room);
    *proximity = Proximity::default();

    player.pos = resolved.to_pixel();

    info!(
        "[world] Entered '{}' at {:?} ({} npcs, generation {})",
        room.name,
        resolved,
        room.npcs.len(),
        active.generation
    );

    Some(RoomChangedEvent {
        from_room,
        to_room: room.id.clone(),
        spawn: resolved,
    })
}

fn enter_start_room(
    registry: Option<Res<RoomRegistry>>,
    mut active: ResMut<ActiveRoom>,
    mut player: ResMut<PlayerState>,
    mut wander: ResMut<NpcWanderStates>,
    mut proximity: ResMut<Proximity>,
    mut changed: EventWriter<RoomChangedEvent>,
) {
    if active.is_loaded() {
        return;
    }
    let Some(registry) = registry else {
        error!("[world] Left Loading without a room registry");
        return;
    };
    let start_room = registry.start_room.clone();
    match activate_room(
        &registry,
        &start_room,
        registry.start_spawn,
        &mut active,
        &mut player,
        &mut wander,
        &mut proximity,
    ) {
        Some(event) => {
            changed.send(event);
        }
        None => error!("[world] Start room '{}' is not defined", start_room),
    }
}
