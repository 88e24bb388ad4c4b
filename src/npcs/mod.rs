//! NPC domain plugin for Storylane.
//!
//! NPCs roam around their home tiles while the world is running. Their
//! runtime state lives in `NpcWanderStates`, rebuilt by the world domain on
//! every room activation.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::shared::*;
use crate::simulation::SimSet;

pub mod wander;

use wander::wander_npcs;

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WanderRng>();
        app.add_systems(Update, wander_npcs.in_set(SimSet::Npcs));
    }
}

/// Source of wander randomness. Tests replace it with a seeded one.
#[derive(Resource)]
pub struct WanderRng(pub StdRng);

impl WanderRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for WanderRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
