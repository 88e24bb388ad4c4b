//! Per-NPC wander state machine: wait, pick a target near home, walk,
//! give up when blocked.

use bevy::prelude::*;
use rand::Rng;
use crate::shared::*;
use crate::world::collision::CollisionMap;
use crate::world::rooms::RoomRegistry;
use crate::world::ActiveRoom;
use super::WanderRng;

fn has_arrived(state: &WanderState) -> bool {
    (state.target.x - state.pos.x).abs() < NPC_ARRIVE_EPSILON
        && (state.target.y - state.pos.y).abs() < NPC_ARRIVE_EPSILON
}

/// Move `from` toward `to` by at most `NPC_SPEED`, leaving sub-pixel gaps alone.
fn approach(from: f32, to: f32) -> f32 {
    let remaining = to - from;
    if remaining.abs() > 1.0 {
        from + remaining.signum() * NPC_SPEED.min(remaining.abs())
    } else {
        from
    }
}

/// Random tile within `WANDER_RADIUS` of home, clamped to the interior.
fn roll_target(home: TilePos, rng: &mut impl Rng) -> TilePos {
    let col = home.col + rng.gen_range(-WANDER_RADIUS..=WANDER_RADIUS);
    let row = home.row + rng.gen_range(-WANDER_RADIUS..=WANDER_RADIUS);
    TilePos::new(col.clamp(1, GRID_WIDTH - 2), row.clamp(1, GRID_HEIGHT - 2))
}

/// One tick of one NPC. NPCs ignore each other and the player.
pub fn tick_wander(state: &mut WanderState, map: &CollisionMap, rng: &mut impl Rng) {
    if state.wait_timer > 0 {
        state.wait_timer -= 1;
        return;
    }

    if has_arrived(state) {
        let candidate = roll_target(state.home, rng);
        // A closed tile keeps the old target; we re-roll on the next arrival.
        if map.is_open(candidate) {
            state.target = candidate.to_pixel();
        }
        state.wait_timer = rng.gen_range(NPC_WAIT_MIN_FRAMES..=NPC_WAIT_MAX_FRAMES);
        return;
    }

    let next = Vec2::new(
        approach(state.pos.x, state.target.x),
        approach(state.pos.y, state.target.y),
    );
    if !map.is_open(pixel_to_tile(next)) {
        state.target = state.pos;
        state.wait_timer = NPC_BLOCKED_WAIT_FRAMES;
        return;
    }

    let dx = next.x - state.pos.x;
    if dx < 0.0 {
        state.facing = Facing::Left;
    } else if dx > 0.0 {
        state.facing = Facing::Right;
    }
    state.pos = next;
}

/// Ticks every NPC of the active room in authoring order, so a seeded
/// `WanderRng` reproduces the same motion.
pub fn wander_npcs(
    registry: Option<Res<RoomRegistry>>,
    active: Res<ActiveRoom>,
    mut wander: ResMut<NpcWanderStates>,
    mut rng: ResMut<WanderRng>,
) {
    let Some(registry) = registry else {
        return;
    };
    let Some(room) = active.room(&registry) else {
        return;
    };
    for npc in &room.npcs {
        if let Some(state) = wander.states.get_mut(&npc.id) {
            tick_wander(state, &active.collision, &mut rng.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::world::collision::build_collision_map;

    fn room_with(decorations: Vec<Decoration>) -> Room {
        Room {
            id: "park".into(),
            name: "Park".into(),
            theme: RoomTheme::default(),
            outdoor: true,
            exits: vec![],
            npcs: vec![],
            decorations,
        }
    }

    #[test]
    fn test_waiting_npc_only_counts_down() {
        let map = build_collision_map(&room_with(vec![]));
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = WanderState::at_home(TilePos::new(7, 5));
        state.wait_timer = 3;
        state.target = TilePos::new(8, 5).to_pixel();
        let before = state.pos;

        tick_wander(&mut state, &map, &mut rng);
        assert_eq!(state.wait_timer, 2);
        assert_eq!(state.pos, before);
    }

    #[test]
    fn test_arrival_rolls_target_and_wait() {
        let map = build_collision_map(&room_with(vec![]));
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = WanderState::at_home(TilePos::new(7, 5));

        tick_wander(&mut state, &map, &mut rng);
        assert!((NPC_WAIT_MIN_FRAMES..=NPC_WAIT_MAX_FRAMES).contains(&state.wait_timer));
        assert!(pixel_to_tile(state.target).chebyshev(state.home) <= WANDER_RADIUS);
    }

    #[test]
    fn test_closed_roll_keeps_target_but_still_waits() {
        // Every tile within reach of home is covered, home included.
        let map = build_collision_map(&room_with(vec![Decoration {
            kind: DecorationKind::Planter,
            origin: TilePos::new(5, 3),
            width: 5,
            height: 5,
        }]));
        let home = TilePos::new(7, 5);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = WanderState::at_home(home);
            let before = state.target;

            tick_wander(&mut state, &map, &mut rng);
            assert_eq!(state.target, before, "seed {}", seed);
            assert!((NPC_WAIT_MIN_FRAMES..=NPC_WAIT_MAX_FRAMES).contains(&state.wait_timer));
        }
    }

    #[test]
    fn test_axis_within_one_pixel_does_not_advance() {
        let map = build_collision_map(&room_with(vec![]));
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = WanderState::at_home(TilePos::new(7, 5));
        let start = state.pos;
        state.target = start + Vec2::new(1.0, 10.0);

        tick_wander(&mut state, &map, &mut rng);
        assert_eq!(state.pos.x, start.x);
        assert_eq!(state.pos.y, start.y + NPC_SPEED);
    }

    #[test]
    fn test_en_route_steps_one_pixel_per_axis() {
        let map = build_collision_map(&room_with(vec![]));
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = WanderState::at_home(TilePos::new(7, 5));
        state.target = TilePos::new(5, 6).to_pixel();

        tick_wander(&mut state, &map, &mut rng);
        assert_eq!(state.pos, TilePos::new(7, 5).to_pixel() + Vec2::new(-NPC_SPEED, NPC_SPEED));
        assert_eq!(state.facing, Facing::Left);
    }

    #[test]
    fn test_blocked_step_cancels_travel() {
        let map = build_collision_map(&room_with(vec![Decoration {
            kind: DecorationKind::Bench,
            origin: TilePos::new(8, 5),
            width: 1,
            height: 1,
        }]));
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = WanderState::at_home(TilePos::new(7, 5));
        // Right at the rounding edge of the bench.
        state.pos = Vec2::new(7.0 * TILE_SIZE + 15.5, 5.0 * TILE_SIZE);
        state.target = TilePos::new(9, 5).to_pixel();

        tick_wander(&mut state, &map, &mut rng);
        assert_eq!(state.target, state.pos);
        assert_eq!(state.wait_timer, NPC_BLOCKED_WAIT_FRAMES);
        assert_eq!(state.tile(), TilePos::new(7, 5));
    }

    #[test]
    fn test_targets_stay_anchored_to_home() {
        let map = build_collision_map(&room_with(vec![]));
        let mut rng = StdRng::seed_from_u64(42);
        let home = TilePos::new(2, 2);
        let mut state = WanderState::at_home(home);

        for _ in 0..20_000 {
            tick_wander(&mut state, &map, &mut rng);
            let target_tile = pixel_to_tile(state.target);
            assert!(target_tile.chebyshev(home) <= WANDER_RADIUS + 1, "target {:?}", target_tile);
            assert!(target_tile.is_interior());
            assert!(state.tile().is_interior());
        }
    }

    #[test]
    fn test_same_seed_same_path() {
        let map = build_collision_map(&room_with(vec![]));
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = WanderState::at_home(TilePos::new(7, 5));
            for _ in 0..2_000 {
                tick_wander(&mut state, &map, &mut rng);
            }
            state
        };
        assert_eq!(run(9), run(9));
    }
}
