//! Collision map derivation and safe spawn resolution.
//!
//! The collision map is never hand-authored: it is a pure function of the
//! room definition, rebuilt every time a room becomes active.

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Open = 0,
    Wall = 1,
    Blocked = 2,
}

/// Row-major cell grid for one room: `cells[row * width + col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMap {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Default for CollisionMap {
    /// An all-wall map, so nothing moves before a room is activated.
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cells: vec![Cell::Wall; (GRID_WIDTH * GRID_HEIGHT) as usize],
        }
    }
}

impl CollisionMap {
    fn index(&self, tile: TilePos) -> Option<usize> {
        if tile.col < 0 || tile.row < 0 || tile.col >= self.width || tile.row >= self.height {
            None
        } else {
            Some((tile.row * self.width + tile.col) as usize)
        }
    }

    /// Out-of-range lookups fail closed.
    pub fn get(&self, tile: TilePos) -> Cell {
        self.index(tile).map_or(Cell::Wall, |i| self.cells[i])
    }

    pub fn is_open(&self, tile: TilePos) -> bool {
        self.get(tile) == Cell::Open
    }

    fn set(&mut self, tile: TilePos, cell: Cell) {
        if let Some(i) = self.index(tile) {
            self.cells[i] = cell;
        }
    }

    /// Overwrite a single cell, for hand-built test maps.
    #[cfg(test)]
    pub(crate) fn with_cell(mut self, tile: TilePos, cell: Cell) -> Self {
        self.set(tile, cell);
        self
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Open).count()
    }
}

/// The two border tiles flanking an exit, running along its edge.
fn exit_flank(tile: TilePos) -> [TilePos; 2] {
    let vertical_edge = tile.col == 0 || tile.col == GRID_WIDTH - 1;
    if vertical_edge {
        [TilePos::new(tile.col, tile.row - 1), TilePos::new(tile.col, tile.row + 1)]
    } else {
        [TilePos::new(tile.col - 1, tile.row), TilePos::new(tile.col + 1, tile.row)]
    }
}

pub fn build_collision_map(room: &Room) -> CollisionMap {
    let mut map = CollisionMap {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
        cells: vec![Cell::Open; (GRID_WIDTH * GRID_HEIGHT) as usize],
    };

    for row in 0..GRID_HEIGHT {
        for col in 0..GRID_WIDTH {
            let tile = TilePos::new(col, row);
            if tile.on_border() {
                map.set(tile, Cell::Wall);
            }
        }
    }

    for decoration in &room.decorations {
        for tile in decoration.tiles() {
            if tile.is_interior() {
                map.set(tile, Cell::Blocked);
            }
        }
    }

    for exit in &room.exits {
        map.set(exit.tile, Cell::Open);
        if exit.tile.on_border() {
            for flank in exit_flank(exit.tile) {
                if flank.on_border() {
                    map.set(flank, Cell::Open);
                }
            }
        }
    }

    map
}

fn is_safe_spawn(map: &CollisionMap, tile: TilePos, npc_homes: &[TilePos]) -> bool {
    tile.is_interior() && map.is_open(tile) && !npc_homes.contains(&tile)
}

/// Nearest interior, open tile not claimed by an NPC home.
///
/// Searches square rings of radius 1..=`SPAWN_SEARCH_RADIUS` in row-major
/// order. If nothing qualifies the target is returned as-is and the caller
/// accepts a possible overlap.
pub fn find_safe_spawn(map: &CollisionMap, target: TilePos, npc_homes: &[TilePos]) -> TilePos {
    if is_safe_spawn(map, target, npc_homes) {
        return target;
    }

    for radius in 1..=SPAWN_SEARCH_RADIUS {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                // Inner tiles were rejected at a smaller radius.
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let candidate = TilePos::new(target.col + dx, target.row + dy);
                if is_safe_spawn(map, candidate, npc_homes) {
                    return candidate;
                }
            }
        }
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with(exits: Vec<Exit>, decorations: Vec<Decoration>) -> Room {
        Room {
            id: "test".to_string(),
            name: "Test".to_string(),
            theme: RoomTheme::default(),
            outdoor: false,
            exits,
            npcs: Vec::new(),
            decorations,
        }
    }

    fn exit_at(col: i32, row: i32) -> Exit {
        Exit {
            tile: TilePos::new(col, row),
            to_room: "elsewhere".to_string(),
            spawn: TilePos::new(7, 5),
            label: "Out".to_string(),
        }
    }

    fn deco(col: i32, row: i32, width: i32, height: i32) -> Decoration {
        Decoration {
            kind: DecorationKind::Table,
            origin: TilePos::new(col, row),
            width,
            height,
        }
    }

    #[test]
    fn test_empty_room_is_walled_ring() {
        let map = build_collision_map(&room_with(vec![], vec![]));
        for row in 0..GRID_HEIGHT {
            for col in 0..GRID_WIDTH {
                let tile = TilePos::new(col, row);
                let expected = if tile.on_border() { Cell::Wall } else { Cell::Open };
                assert_eq!(map.get(tile), expected, "tile {:?}", tile);
            }
        }
        assert_eq!(map.open_count(), ((GRID_WIDTH - 2) * (GRID_HEIGHT - 2)) as usize);
    }

    #[test]
    fn test_west_exit_opens_tile_and_vertical_flank() {
        let map = build_collision_map(&room_with(vec![exit_at(0, 5)], vec![]));
        assert_eq!(map.get(TilePos::new(0, 5)), Cell::Open);
        assert_eq!(map.get(TilePos::new(0, 4)), Cell::Open);
        assert_eq!(map.get(TilePos::new(0, 6)), Cell::Open);
        assert_eq!(map.get(TilePos::new(0, 3)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(0, 7)), Cell::Wall);
    }

    #[test]
    fn test_south_exit_opens_horizontal_flank() {
        let map = build_collision_map(&room_with(vec![exit_at(7, GRID_HEIGHT - 1)], vec![]));
        assert_eq!(map.get(TilePos::new(6, GRID_HEIGHT - 1)), Cell::Open);
        assert_eq!(map.get(TilePos::new(7, GRID_HEIGHT - 1)), Cell::Open);
        assert_eq!(map.get(TilePos::new(8, GRID_HEIGHT - 1)), Cell::Open);
        assert_eq!(map.get(TilePos::new(9, GRID_HEIGHT - 1)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(7, GRID_HEIGHT - 2)), Cell::Open);
    }

    #[test]
    fn test_decoration_footprint_blocks_interior_only() {
        // Spills over the top wall and the west wall.
        let map = build_collision_map(&room_with(vec![], vec![deco(0, 0, 3, 2)]));
        assert_eq!(map.get(TilePos::new(1, 1)), Cell::Blocked);
        assert_eq!(map.get(TilePos::new(2, 1)), Cell::Blocked);
        assert_eq!(map.get(TilePos::new(0, 0)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(2, 0)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(3, 1)), Cell::Open);
    }

    #[test]
    fn test_build_is_deterministic() {
        let room = room_with(vec![exit_at(0, 5), exit_at(14, 2)], vec![deco(4, 4, 2, 3)]);
        assert_eq!(build_collision_map(&room), build_collision_map(&room));
    }

    #[test]
    fn test_out_of_range_reads_as_wall() {
        let map = build_collision_map(&room_with(vec![], vec![]));
        assert_eq!(map.get(TilePos::new(-1, 3)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(3, GRID_HEIGHT)), Cell::Wall);
        assert_eq!(map.get(TilePos::new(GRID_WIDTH + 10, -40)), Cell::Wall);
    }

    #[test]
    fn test_safe_target_returned_unchanged() {
        let map = build_collision_map(&room_with(vec![], vec![]));
        assert_eq!(find_safe_spawn(&map, TilePos::new(13, 5), &[]), TilePos::new(13, 5));
    }

    #[test]
    fn test_blocked_target_takes_first_row_major_ring_tile() {
        let map = build_collision_map(&room_with(vec![], vec![deco(13, 5, 1, 1)]));
        // Radius 1 row -1 scans (12,4), (13,4), (14,4); (12,4) is first and open.
        assert_eq!(find_safe_spawn(&map, TilePos::new(13, 5), &[]), TilePos::new(12, 4));
    }

    #[test]
    fn test_npc_home_is_not_a_safe_spawn() {
        let map = build_collision_map(&room_with(vec![], vec![]));
        let homes = [TilePos::new(7, 5), TilePos::new(6, 4)];
        assert_eq!(find_safe_spawn(&map, TilePos::new(7, 5), &homes), TilePos::new(7, 4));
    }

    #[test]
    fn test_border_target_moves_inside() {
        let map = build_collision_map(&room_with(vec![exit_at(0, 5)], vec![]));
        // The exit tile is open but on the ring, so it never qualifies.
        let spawn = find_safe_spawn(&map, TilePos::new(0, 5), &[]);
        assert!(spawn.is_interior());
        assert_eq!(spawn, TilePos::new(1, 4));
    }

    #[test]
    fn test_exhausted_search_falls_back_to_target() {
        let map = build_collision_map(&room_with(vec![], vec![deco(1, 1, 13, 9)]));
        assert_eq!(map.open_count(), 0);
        assert_eq!(find_safe_spawn(&map, TilePos::new(7, 5), &[]), TilePos::new(7, 5));
    }

    #[test]
    fn test_result_stays_within_search_radius() {
        // Only a single open tile, four rings away.
        let mut map = build_collision_map(&room_with(vec![], vec![deco(1, 1, 13, 9)]));
        map.set(TilePos::new(3, 1), Cell::Open);
        let spawn = find_safe_spawn(&map, TilePos::new(7, 5), &[]);
        assert_eq!(spawn, TilePos::new(3, 1));
        assert!(spawn.chebyshev(TilePos::new(7, 5)) <= SPAWN_SEARCH_RADIUS);
    }
}
