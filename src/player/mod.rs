mod interaction;
mod movement;

use bevy::prelude::*;
use crate::shared::*;
use crate::simulation::{simulation_running, SimSet};

pub use interaction::resolve_proximity;
pub use movement::step_player;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerState>();
        app.add_event::<NpcInteractEvent>();

        // -- Movement: one step per running tick --
        app.add_systems(Update, movement::player_movement.in_set(SimSet::Player));

        // -- Proximity sees this tick's player and NPC positions --
        app.add_systems(Update, interaction::update_proximity.in_set(SimSet::Proximity));

        // -- Edge-triggered interact. Suspended with the rest of the world --
        app.add_systems(
            Update,
            interaction::dispatch_interaction
                .in_set(SimSet::Interaction)
                .run_if(in_state(GameState::Playing))
                .run_if(simulation_running),
        );
    }
}
