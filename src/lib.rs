//! Storylane library crate: the world core plus its presentation layer.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! `tests/` integration tests drive the same plugins headlessly, without a
//! window or GPU.

pub mod shared;
pub mod simulation;
pub mod input;
pub mod data;
pub mod world;
pub mod player;
pub mod npcs;
pub mod content;
pub mod session;
pub mod ui;

use bevy::prelude::*;

/// Every non-visual plugin, in registration order.
///
/// Needs `StatesPlugin` (part of `DefaultPlugins`) to be added first.
pub struct WorldCorePlugins;

impl Plugin for WorldCorePlugins {
    fn build(&self, app: &mut App) {
        app.init_state::<shared::GameState>()
            .add_plugins(simulation::SimulationPlugin)
            .add_plugins(input::InputPlugin)
            .add_plugins(world::WorldPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(npcs::NpcPlugin)
            .add_plugins(content::ContentPlugin)
            .add_plugins(session::SessionPlugin);
    }
}
