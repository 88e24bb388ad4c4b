//! Frame scheduler for the world core.
//!
//! Bevy's `Update` schedule is the continuous per-frame loop; it is never
//! stopped. Instead, `SimClock` is polled once per frame and the movement,
//! wander and proximity systems only run while it reads `Running`.

use bevy::prelude::*;

use crate::shared::*;
use crate::world::transition::RoomTransition;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>();

        // Fixed order inside one frame: proximity sees this tick's movement,
        // while the player's blocking check sees NPCs from the previous tick.
        app.configure_sets(
            Update,
            (
                SimSet::Clock,
                SimSet::Player,
                SimSet::Npcs,
                SimSet::Proximity,
                SimSet::Interaction,
                SimSet::Transition,
            )
                .chain(),
        );
        app.configure_sets(
            Update,
            (SimSet::Player, SimSet::Npcs, SimSet::Proximity).run_if(simulation_running),
        );

        app.add_systems(Update, update_sim_clock.in_set(SimSet::Clock));
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Clock,
    Player,
    Npcs,
    Proximity,
    Interaction,
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimPhase {
    Running,
    #[default]
    Suspended,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SimClock {
    pub phase: SimPhase,
    /// Animation frame counter. Only advances while running.
    pub frame: u64,
}

impl SimClock {
    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }
}

/// Decide this frame's phase from the external flags.
pub fn sim_phase_for(state: GameState, transitioning: bool) -> SimPhase {
    if state == GameState::Playing && !transitioning {
        SimPhase::Running
    } else {
        SimPhase::Suspended
    }
}

pub fn update_sim_clock(
    state: Res<State<GameState>>,
    transition: Res<RoomTransition>,
    mut clock: ResMut<SimClock>,
) {
    let phase = sim_phase_for(*state.get(), transition.is_transitioning());
    if phase != clock.phase {
        debug!("[sim] {:?} -> {:?} at frame {}", clock.phase, phase, clock.frame);
    }
    clock.phase = phase;
    if clock.is_running() {
        clock.frame += 1;
    }
}

/// Run condition for the movement, wander and proximity sets.
pub fn simulation_running(clock: Res<SimClock>) -> bool {
    clock.is_running()
}
