//! Room transition guard.
//!
//! A transition is a two-step affair: `begin` arms a short timer, and the
//! room swap happens when it finishes. The pending record carries the room
//! generation it was started from; a completion whose generation no longer
//! matches the active room is dropped.

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;
use super::rooms::RoomRegistry;
use super::{activate_room, ActiveRoom};

#[derive(Debug, Clone)]
pub struct PendingTransition {
    pub to_room: RoomId,
    pub spawn: TilePos,
    /// Generation of the room this transition was started from.
    pub generation: u64,
    pub timer: Timer,
}

#[derive(Debug, Clone, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Transitioning(PendingTransition),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RoomTransition {
    pub phase: TransitionPhase,
}

impl RoomTransition {
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning(_))
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        match &self.phase {
            TransitionPhase::Transitioning(pending) => Some(pending),
            TransitionPhase::Idle => None,
        }
    }

    /// Arm a transition. Refused (returns false) while one is in flight.
    pub fn begin(&mut self, to_room: RoomId, spawn: TilePos, generation: u64) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.phase = TransitionPhase::Transitioning(PendingTransition {
            to_room,
            spawn,
            generation,
            timer: Timer::new(Duration::from_millis(TRANSITION_DELAY_MS), TimerMode::Once),
        });
        true
    }

    /// Advance the delay. Returns the pending record once it elapses and
    /// goes back to idle.
    pub fn tick(&mut self, delta: Duration) -> Option<PendingTransition> {
        let finished = match &mut self.phase {
            TransitionPhase::Transitioning(pending) => pending.timer.tick(delta).finished(),
            TransitionPhase::Idle => false,
        };
        if !finished {
            return None;
        }
        match std::mem::take(&mut self.phase) {
            TransitionPhase::Transitioning(pending) => Some(pending),
            TransitionPhase::Idle => None,
        }
    }

    /// 0.0 when idle, else how far through the delay we are (0..=1).
    pub fn progress(&self) -> f32 {
        self.pending().map_or(0.0, |p| p.timer.fraction())
    }
}

/// External callers and the interaction dispatcher both come through here.
pub fn handle_room_change_requests(
    mut requests: EventReader<RoomChangeRequest>,
    mut transition: ResMut<RoomTransition>,
    active: Res<ActiveRoom>,
    mut started: EventWriter<TransitionStartedEvent>,
) {
    for request in requests.read() {
        if transition.begin(request.to_room.clone(), request.spawn, active.generation) {
            info!(
                "[world] Transition to '{}' started from '{}'",
                request.to_room, active.room_id
            );
            started.send(TransitionStartedEvent {
                to_room: request.to_room.clone(),
            });
        } else {
            debug!(
                "[world] Ignoring request for '{}': transition already in progress",
                request.to_room
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn complete_room_transition(
    time: Res<Time>,
    mut transition: ResMut<RoomTransition>,
    registry: Option<Res<RoomRegistry>>,
    mut active: ResMut<ActiveRoom>,
    mut player: ResMut<PlayerState>,
    mut wander: ResMut<NpcWanderStates>,
    mut proximity: ResMut<Proximity>,
    mut changed: EventWriter<RoomChangedEvent>,
) {
    let Some(pending) = transition.tick(time.delta()) else {
        return;
    };

    if pending.generation != active.generation {
        debug!(
            "[world] Dropping stale transition to '{}' (generation {} != {})",
            pending.to_room, pending.generation, active.generation
        );
        return;
    }

    let Some(registry) = registry else {
        warn!("[world] No room registry loaded; transition to '{}' aborted", pending.to_room);
        return;
    };

    match activate_room(
        &registry,
        &pending.to_room,
        pending.spawn,
        &mut active,
        &mut player,
        &mut wander,
        &mut proximity,
    ) {
        Some(event) => {
            changed.send(event);
        }
        None => warn!("[world] Unknown room '{}'; transition aborted", pending.to_room),
    }
}
