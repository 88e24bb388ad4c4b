use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use storylane::data::DataPlugin;
use storylane::shared::*;
use storylane::ui::UiPlugin;
use storylane::world::render::WorldRenderPlugin;
use storylane::WorldCorePlugins;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Storylane".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // World core: state, simulation, input, rooms, player, NPCs, content
        .add_plugins(WorldCorePlugins)
        // Presentation
        .add_plugins(WorldRenderPlugin)
        .add_plugins(UiPlugin)
        // Data loading
        .add_plugins(DataPlugin)
        .run();
}
