//! Shared components, resources, events, and states for Storylane.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, except for the
//! pure helper functions a domain chooses to make public.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

/// Everything except `Playing` suspends the world simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    /// An NPC conversation is open (the "dialogue open" flag).
    Dialogue,
    /// A quiz/matching activity owns the screen.
    Minigame,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// GRID
// ═══════════════════════════════════════════════════════════════════════

pub type RoomId = String;
pub type NpcId = String;
pub type DialogueId = String;
pub type FactId = u32;

/// Integer tile coordinate. `row` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TilePos {
    pub col: i32,
    pub row: i32,
}

impl TilePos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn manhattan(self, other: TilePos) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }

    pub fn chebyshev(self, other: TilePos) -> i32 {
        (self.col - other.col).abs().max((self.row - other.row).abs())
    }

    /// Strictly inside the outer wall ring.
    pub fn is_interior(self) -> bool {
        self.col >= 1 && self.row >= 1 && self.col < GRID_WIDTH - 1 && self.row < GRID_HEIGHT - 1
    }

    pub fn in_bounds(self) -> bool {
        self.col >= 0 && self.row >= 0 && self.col < GRID_WIDTH && self.row < GRID_HEIGHT
    }

    pub fn on_border(self) -> bool {
        self.in_bounds() && !self.is_interior()
    }

    /// Pixel position of the tile origin.
    pub fn to_pixel(self) -> Vec2 {
        Vec2::new(self.col as f32 * TILE_SIZE, self.row as f32 * TILE_SIZE)
    }
}

/// Centered rounding: a pixel position belongs to the tile whose center
/// half-tile window contains it.
pub fn pixel_to_tile(pos: Vec2) -> TilePos {
    TilePos {
        col: ((pos.x + TILE_SIZE / 2.0) / TILE_SIZE).floor() as i32,
        row: ((pos.y + TILE_SIZE / 2.0) / TILE_SIZE).floor() as i32,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ROOMS: static, load-once data
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub fn color(self) -> Color {
        Color::srgb(self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTheme {
    pub floor: Rgb,
    pub wall: Rgb,
    pub accent: Rgb,
}

impl Default for RoomTheme {
    fn default() -> Self {
        Self {
            floor: Rgb(0.62, 0.58, 0.5),
            wall: Rgb(0.3, 0.26, 0.22),
            accent: Rgb(0.45, 0.35, 0.25),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationKind {
    Tree,
    Bench,
    Shelf,
    Table,
    Counter,
    Planter,
    Fountain,
    Bed,
    Rug,
}

/// Rectangular blocking footprint anchored at its top-left tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub origin: TilePos,
    pub width: i32,
    pub height: i32,
}

impl Decoration {
    pub fn covers(&self, tile: TilePos) -> bool {
        tile.col >= self.origin.col
            && tile.col < self.origin.col + self.width
            && tile.row >= self.origin.row
            && tile.row < self.origin.row + self.height
    }

    pub fn tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        (self.origin.row..self.origin.row + self.height).flat_map(move |row| {
            (self.origin.col..self.origin.col + self.width).map(move |col| TilePos::new(col, row))
        })
    }
}

/// One-way door: a round trip needs a matching exit in the target room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub tile: TilePos,
    pub to_room: RoomId,
    pub spawn: TilePos,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub id: NpcId,
    pub name: String,
    pub home: TilePos,
    pub skin: Rgb,
    pub shirt: Rgb,
    pub dialogue: DialogueId,
    /// Knowledge unlocked by finishing this NPC's conversation.
    #[serde(default)]
    pub fact_id: Option<FactId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub theme: RoomTheme,
    pub outdoor: bool,
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub npcs: Vec<NpcSpawn>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Room {
    pub fn npc(&self, id: &str) -> Option<&NpcSpawn> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn npc_homes(&self) -> Vec<TilePos> {
        self.npcs.iter().map(|n| n.home).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The one player of the session. Persists across room changes; only the
/// position is reset when a new room is entered.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerState {
    pub pos: Vec2,
    pub facing: Facing,
    pub is_moving: bool,
    /// Accepted movement ticks. Drives footstep cadence and leg animation.
    pub steps: u64,
}

impl PlayerState {
    pub fn tile(&self) -> TilePos {
        pixel_to_tile(self.pos)
    }

    /// Two-frame walk cycle, advancing every `STEPS_PER_WALK_FRAME` steps.
    pub fn walk_frame(&self) -> usize {
        if !self.is_moving {
            return 0;
        }
        ((self.steps / STEPS_PER_WALK_FRAME) % 2) as usize
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NPC WANDER STATE
// ═══════════════════════════════════════════════════════════════════════

/// Runtime motion for one NPC in the active room.
#[derive(Debug, Clone, PartialEq)]
pub struct WanderState {
    pub pos: Vec2,
    pub target: Vec2,
    /// Frames left standing still before the next replan.
    pub wait_timer: u32,
    pub facing: Facing,
    /// Wander anchor. Targets are always rolled around this tile.
    pub home: TilePos,
}

impl WanderState {
    /// Standing on the home tile, ready to pick a target on the first tick.
    pub fn at_home(home: TilePos) -> Self {
        let pos = home.to_pixel();
        Self {
            pos,
            target: pos,
            wait_timer: 0,
            facing: Facing::default(),
            home,
        }
    }

    pub fn tile(&self) -> TilePos {
        pixel_to_tile(self.pos)
    }
}

/// Wander states for the NPCs of the active room, replaced on every
/// room activation.
#[derive(Resource, Debug, Clone, Default)]
pub struct NpcWanderStates {
    pub states: HashMap<NpcId, WanderState>,
}

impl NpcWanderStates {
    pub fn for_room(room: &Room) -> Self {
        Self {
            states: room
                .npcs
                .iter()
                .map(|npc| (npc.id.clone(), WanderState::at_home(npc.home)))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&WanderState> {
        self.states.get(id)
    }

    /// Current rounded tile of every NPC, for player blocking.
    pub fn occupied_tiles(&self) -> Vec<TilePos> {
        self.states.values().map(WanderState::tile).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Directional keys currently held, from keyboard and touch combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn set(&mut self, direction: MoveDirection, held: bool) {
        match direction {
            MoveDirection::Up => self.up = held,
            MoveDirection::Down => self.down = held,
            MoveDirection::Left => self.left = held,
            MoveDirection::Right => self.right = held,
        }
    }

    pub fn union(self, other: HeldDirections) -> HeldDirections {
        HeldDirections {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Per-frame game actions. Rebuilt every frame by the input plugin.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub held: HeldDirections,
    /// Edge-triggered: true only on the frame the confirm key went down.
    pub interact: bool,
    pub pause: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub interact_alt: KeyCode,
    pub pause: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::Space,
            interact_alt: KeyCode::KeyE,
            pause: KeyCode::Escape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Up,
    Down,
    Left,
    Right,
    Interact,
}

/// Sent by on-screen buttons. Same add/remove semantics as a key.
#[derive(Event, Debug, Clone)]
pub struct TouchButtonEvent {
    pub button: TouchButton,
    pub pressed: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// PROXIMITY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyNpc {
    pub id: NpcId,
    pub name: String,
    pub dialogue: DialogueId,
    pub distance: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyExit {
    pub index: usize,
    pub exit: Exit,
}

/// Derived every running tick from scratch.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Proximity {
    pub nearby_npc: Option<NearbyNpc>,
    pub nearby_exit: Option<NearbyExit>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONTENT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: FactId,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category: String,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Fired once per interact press when an NPC is in range.
#[derive(Event, Debug, Clone)]
pub struct NpcInteractEvent {
    pub npc_id: NpcId,
    pub dialogue: DialogueId,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueEndEvent;

#[derive(Event, Debug, Clone)]
pub struct MinigameStartEvent {
    pub minigame_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct MinigameEndEvent {
    pub minigame_id: String,
    pub score: u32,
}

/// External seam for driving a room change through the transition guard.
#[derive(Event, Debug, Clone)]
pub struct RoomChangeRequest {
    pub to_room: RoomId,
    pub spawn: TilePos,
}

#[derive(Event, Debug, Clone)]
pub struct TransitionStartedEvent {
    pub to_room: RoomId,
}

/// Sent after a room has been activated and the player placed.
#[derive(Event, Debug, Clone)]
pub struct RoomChangedEvent {
    pub from_room: Option<RoomId>,
    pub to_room: RoomId,
    pub spawn: TilePos,
}

#[derive(Event, Debug, Clone)]
pub struct DiscoverFactEvent {
    pub fact_id: FactId,
}

#[derive(Event, Debug, Clone)]
pub struct FactDiscoveredEvent {
    pub fact_id: FactId,
    pub title: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 32.0;
pub const GRID_WIDTH: i32 = 15;
pub const GRID_HEIGHT: i32 = 11;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 640.0;

/// Pixels per tick. Must stay below `TILE_SIZE` (whole-tile collision).
pub const PLAYER_SPEED: f32 = 4.0;
pub const NPC_SPEED: f32 = 1.0;
pub const STEPS_PER_WALK_FRAME: u64 = 8;

pub const WANDER_RADIUS: i32 = 2;
pub const NPC_WAIT_MIN_FRAMES: u32 = 90;
pub const NPC_WAIT_MAX_FRAMES: u32 = 270;
pub const NPC_BLOCKED_WAIT_FRAMES: u32 = 60;
/// Per-axis pixel slack for "arrived at target".
pub const NPC_ARRIVE_EPSILON: f32 = 2.0;

pub const NPC_INTERACT_RANGE: i32 = 2;
pub const EXIT_INTERACT_RANGE: i32 = 1;
pub const SPAWN_SEARCH_RADIUS: i32 = 4;

pub const TRANSITION_DELAY_MS: u64 = 300;
