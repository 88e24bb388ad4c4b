use bevy::prelude::*;
use crate::shared::*;
use crate::world::collision::CollisionMap;
use crate::world::ActiveRoom;

/// Pixel delta for this tick. Up is -Y: rows grow downward.
/// Diagonals are deliberately left unnormalized.
pub fn movement_delta(held: HeldDirections) -> Vec2 {
    let mut delta = Vec2::ZERO;
    if held.up {
        delta.y -= PLAYER_SPEED;
    }
    if held.down {
        delta.y += PLAYER_SPEED;
    }
    if held.left {
        delta.x -= PLAYER_SPEED;
    }
    if held.right {
        delta.x += PLAYER_SPEED;
    }
    delta
}

/// Advance the player by one tick of held input.
///
/// The whole step is accepted or rejected; there is no wall sliding.
/// Returns whether the player moved.
pub fn step_player(
    player: &mut PlayerState,
    held: HeldDirections,
    map: &CollisionMap,
    npc_tiles: &[TilePos],
) -> bool {
    // Facing follows the horizontal keys even when the step is refused.
    if held.left && !held.right {
        player.facing = Facing::Left;
    } else if held.right && !held.left {
        player.facing = Facing::Right;
    }

    let delta = movement_delta(held);
    if delta == Vec2::ZERO {
        player.is_moving = false;
        return false;
    }

    let candidate = player.pos + delta;
    let tile = pixel_to_tile(candidate);
    if !tile.is_interior() || !map.is_open(tile) || npc_tiles.contains(&tile) {
        player.is_moving = false;
        return false;
    }

    player.pos = candidate;
    player.is_moving = true;
    player.steps += 1;
    true
}

pub fn player_movement(
    input: Res<PlayerInput>,
    active: Res<ActiveRoom>,
    wander: Res<NpcWanderStates>,
    mut player: ResMut<PlayerState>,
) {
    if !active.is_loaded() {
        return;
    }
    let npc_tiles = wander.occupied_tiles();
    step_player(&mut player, input.held, &active.collision, &npc_tiles);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::collision::{build_collision_map, Cell};

    fn test_room() -> Room {
        Room {
            id: "test".into(),
            name: "Test".into(),
            theme: RoomTheme::default(),
            outdoor: false,
            exits: vec![],
            npcs: vec![],
            decorations: vec![Decoration {
                kind: DecorationKind::Shelf,
                origin: TilePos::new(5, 5),
                width: 1,
                height: 1,
            }],
        }
    }

    fn open_room() -> CollisionMap {
        build_collision_map(&test_room())
    }

    fn at(col: i32, row: i32) -> PlayerState {
        PlayerState {
            pos: TilePos::new(col, row).to_pixel(),
            ..default()
        }
    }

    fn held(up: bool, down: bool, left: bool, right: bool) -> HeldDirections {
        HeldDirections { up, down, left, right }
    }

    #[test]
    fn test_step_moves_by_speed() {
        let map = open_room();
        let mut player = at(3, 3);
        assert!(step_player(&mut player, held(false, false, false, true), &map, &[]));
        assert_eq!(player.pos, Vec2::new(3.0 * TILE_SIZE + PLAYER_SPEED, 3.0 * TILE_SIZE));
        assert!(player.is_moving);
        assert_eq!(player.steps, 1);
    }

    #[test]
    fn test_up_decreases_row() {
        let map = open_room();
        let mut player = at(3, 3);
        step_player(&mut player, held(true, false, false, false), &map, &[]);
        assert!(player.pos.y < 3.0 * TILE_SIZE);
    }

    #[test]
    fn test_diagonal_is_unnormalized() {
        let map = open_room();
        let mut player = at(3, 3);
        step_player(&mut player, held(false, true, false, true), &map, &[]);
        assert_eq!(player.pos - at(3, 3).pos, Vec2::new(PLAYER_SPEED, PLAYER_SPEED));
    }

    #[test]
    fn test_blocked_tile_rejects_whole_step() {
        let map = open_room();
        // Half a tile left of (5,5): the next step rounds into the shelf.
        let mut player = PlayerState {
            pos: Vec2::new(4.0 * TILE_SIZE + 14.0, 5.0 * TILE_SIZE),
            ..default()
        };
        let before = player.pos;
        for _ in 0..10 {
            step_player(&mut player, held(false, false, false, true), &map, &[]);
        }
        assert_eq!(player.pos, before);
        assert_ne!(player.tile(), TilePos::new(5, 5));
        assert!(!player.is_moving);
        assert_eq!(player.steps, 0);
    }

    #[test]
    fn test_wall_cell_at_five_five_rejects_from_every_side() {
        let map = build_collision_map(&Room {
            decorations: vec![],
            ..test_room()
        })
        .with_cell(TilePos::new(5, 5), Cell::Wall);
        assert_eq!(map.get(TilePos::new(5, 5)), Cell::Wall);

        // Half a tile short of (5,5) on each side, pushing toward it.
        let approaches = [
            (Vec2::new(4.0 * TILE_SIZE + 14.0, 5.0 * TILE_SIZE), held(false, false, false, true)),
            (Vec2::new(5.0 * TILE_SIZE + 18.0, 5.0 * TILE_SIZE), held(false, false, true, false)),
            (Vec2::new(5.0 * TILE_SIZE, 4.0 * TILE_SIZE + 14.0), held(false, true, false, false)),
            (Vec2::new(5.0 * TILE_SIZE, 5.0 * TILE_SIZE + 18.0), held(true, false, false, false)),
        ];
        for (pos, keys) in approaches {
            let mut player = PlayerState { pos, ..default() };
            assert!(!step_player(&mut player, keys, &map, &[]), "entered wall from {:?}", pos);
            assert_eq!(player.pos, pos);
            assert!(!player.is_moving);
        }
    }

    #[test]
    fn test_wall_ring_keeps_player_inside() {
        let map = open_room();
        let mut player = at(1, 1);
        for _ in 0..40 {
            step_player(&mut player, held(true, false, true, false), &map, &[]);
        }
        assert!(player.tile().is_interior());
        assert_eq!(player.tile(), TilePos::new(1, 1));
    }

    #[test]
    fn test_npc_tile_blocks_player() {
        let map = open_room();
        let mut player = at(7, 7);
        let npc = [TilePos::new(8, 7)];
        for _ in 0..20 {
            step_player(&mut player, held(false, false, false, true), &map, &npc);
        }
        assert_eq!(player.tile(), TilePos::new(7, 7));
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_facing_updates_even_when_rejected() {
        let map = open_room();
        let mut player = at(1, 3);
        player.facing = Facing::Right;
        // First step left rounds into the wall ring at col 0 after a few ticks.
        for _ in 0..10 {
            step_player(&mut player, held(false, false, true, false), &map, &[]);
        }
        assert_eq!(player.facing, Facing::Left);
        assert!(!step_player(&mut player, held(false, false, true, false), &map, &[]));
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_no_keys_and_cancelling_keys_stop() {
        let map = open_room();
        let mut player = at(3, 3);
        step_player(&mut player, held(false, false, false, true), &map, &[]);
        assert!(player.is_moving);

        assert!(!step_player(&mut player, HeldDirections::default(), &map, &[]));
        assert!(!player.is_moving);

        step_player(&mut player, held(false, false, false, true), &map, &[]);
        let pos = player.pos;
        assert!(!step_player(&mut player, held(true, true, false, false), &map, &[]));
        assert!(!player.is_moving);
        assert_eq!(player.pos, pos);
    }

    #[test]
    fn test_rounding_boundary() {
        assert_eq!(pixel_to_tile(Vec2::new(15.9, 0.0)), TilePos::new(0, 0));
        assert_eq!(pixel_to_tile(Vec2::new(16.0, 0.0)), TilePos::new(1, 0));
        assert_eq!(pixel_to_tile(Vec2::new(-16.1, 47.9)), TilePos::new(-1, 1));
    }
}
