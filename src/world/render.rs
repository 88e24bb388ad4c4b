//! Sprite presentation for the active room.
//!
//! Pure read-side: nothing here mutates simulation state. Grid rows grow
//! downward while Bevy's y axis grows upward, so every world position is
//! drawn at `(x, -y)`.

use bevy::prelude::*;

use crate::shared::*;
use super::collision::Cell;
use super::rooms::RoomRegistry;
use super::ActiveRoom;

pub struct WorldRenderPlugin;

impl Plugin for WorldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_world_camera).add_systems(
            Update,
            (rebuild_room_sprites, sync_player_sprite, sync_npc_sprites).chain(),
        );
    }
}

/// Everything drawn for the current room. Despawned on room change.
#[derive(Component, Debug)]
pub struct RoomSprite;

#[derive(Component, Debug)]
pub struct PlayerSprite;

#[derive(Component, Debug, Clone)]
pub struct NpcSprite {
    pub npc_id: NpcId,
}

const Z_FLOOR: f32 = 0.0;
const Z_DECORATION: f32 = 1.0;
const Z_ACTOR: f32 = 5.0;
/// Vertical bob of the walk cycle's second frame.
const WALK_BOB: f32 = 2.0;

pub fn to_screen(pos: Vec2, z: f32) -> Vec3 {
    Vec3::new(pos.x, -pos.y, z)
}

fn spawn_world_camera(mut commands: Commands) {
    let center = Vec2::new(
        (GRID_WIDTH - 1) as f32 * TILE_SIZE / 2.0,
        (GRID_HEIGHT - 1) as f32 * TILE_SIZE / 2.0,
    );
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            // The grid is small; zoom so it fills most of the window.
            scale: (GRID_HEIGHT as f32 * TILE_SIZE) / (SCREEN_HEIGHT * 0.8),
            ..OrthographicProjection::default_2d()
        },
        Transform::from_translation(to_screen(center, 100.0)),
    ));
}

fn decoration_color(kind: DecorationKind, theme: &RoomTheme) -> Color {
    match kind {
        DecorationKind::Tree => Color::srgb(0.18, 0.45, 0.2),
        DecorationKind::Planter => Color::srgb(0.35, 0.55, 0.3),
        DecorationKind::Fountain => Color::srgb(0.4, 0.6, 0.85),
        DecorationKind::Rug => Color::srgb(0.7, 0.36, 0.34),
        _ => theme.accent.color(),
    }
}

fn rebuild_room_sprites(
    mut commands: Commands,
    mut changed: EventReader<RoomChangedEvent>,
    existing: Query<Entity, With<RoomSprite>>,
    registry: Option<Res<RoomRegistry>>,
    active: Res<ActiveRoom>,
) {
    // Only the latest change matters within one frame.
    if changed.read().last().is_none() {
        return;
    }
    let Some(registry) = registry else {
        return;
    };
    let Some(room) = active.room(&registry) else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }

    for row in 0..GRID_HEIGHT {
        for col in 0..GRID_WIDTH {
            let tile = TilePos::new(col, row);
            let color = match active.collision.get(tile) {
                Cell::Wall => room.theme.wall.color(),
                _ => room.theme.floor.color(),
            };
            commands.spawn((
                RoomSprite,
                Sprite {
                    color,
                    custom_size: Some(Vec2::splat(TILE_SIZE)),
                    ..default()
                },
                Transform::from_translation(to_screen(tile.to_pixel(), Z_FLOOR)),
            ));
        }
    }

    for decoration in &room.decorations {
        let size = Vec2::new(decoration.width as f32, decoration.height as f32) * TILE_SIZE;
        // Footprint center, relative to the origin tile's center.
        let center = decoration.origin.to_pixel() + (size - Vec2::splat(TILE_SIZE)) / 2.0;
        commands.spawn((
            RoomSprite,
            Sprite {
                color: decoration_color(decoration.kind, &room.theme),
                custom_size: Some(size - Vec2::splat(4.0)),
                ..default()
            },
            Transform::from_translation(to_screen(center, Z_DECORATION)),
        ));
    }

    for exit in &room.exits {
        commands.spawn((
            RoomSprite,
            Sprite {
                color: room.theme.accent.color().with_alpha(0.6),
                custom_size: Some(Vec2::splat(TILE_SIZE * 0.8)),
                ..default()
            },
            Transform::from_translation(to_screen(exit.tile.to_pixel(), Z_DECORATION)),
        ));
    }

    for npc in &room.npcs {
        commands
            .spawn((
                RoomSprite,
                NpcSprite {
                    npc_id: npc.id.clone(),
                },
                Sprite {
                    color: npc.shirt.color(),
                    custom_size: Some(Vec2::new(TILE_SIZE * 0.7, TILE_SIZE * 0.8)),
                    ..default()
                },
                Transform::from_translation(to_screen(npc.home.to_pixel(), Z_ACTOR)),
                Visibility::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Sprite {
                        color: npc.skin.color(),
                        custom_size: Some(Vec2::splat(TILE_SIZE * 0.4)),
                        ..default()
                    },
                    Transform::from_translation(Vec3::new(0.0, TILE_SIZE * 0.3, 0.1)),
                ));
            });
    }

    debug!("[render] Rebuilt sprites for '{}'", room.id);
}

fn sync_player_sprite(
    mut commands: Commands,
    player: Res<PlayerState>,
    active: Res<ActiveRoom>,
    mut query: Query<(&mut Transform, &mut Sprite), With<PlayerSprite>>,
) {
    if !active.is_loaded() {
        return;
    }
    let bob = if player.walk_frame() == 1 { WALK_BOB } else { 0.0 };
    let translation = to_screen(player.pos, Z_ACTOR + 1.0) + Vec3::new(0.0, bob, 0.0);

    let Ok((mut transform, mut sprite)) = query.get_single_mut() else {
        commands.spawn((
            PlayerSprite,
            Sprite {
                color: Color::srgb(0.2, 0.5, 0.8),
                custom_size: Some(Vec2::new(TILE_SIZE * 0.7, TILE_SIZE * 0.9)),
                ..default()
            },
            Transform::from_translation(translation),
        ));
        return;
    };
    transform.translation = translation;
    sprite.flip_x = player.facing == Facing::Left;
}

fn sync_npc_sprites(
    wander: Res<NpcWanderStates>,
    mut query: Query<(&NpcSprite, &mut Transform, &mut Sprite)>,
) {
    for (npc, mut transform, mut sprite) in query.iter_mut() {
        let Some(state) = wander.get(&npc.npc_id) else {
            continue;
        };
        transform.translation = to_screen(state.pos, Z_ACTOR);
        sprite.flip_x = state.facing == Facing::Left;
    }
}
