use bevy::input::InputSystem;
use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<KeyBindings>()
            .init_resource::<TouchState>()
            .add_event::<TouchButtonEvent>()
            .add_systems(
                PreUpdate,
                (apply_touch_events, reset_and_read_input)
                    .chain()
                    .after(InputSystem),
            )
            .add_systems(Update, toggle_pause);
    }
}

/// On-screen button state, kept separately from the keyboard so releasing
/// a key never cancels a held touch button (or the other way round).
#[derive(Resource, Debug, Clone, Default)]
pub struct TouchState {
    pub held: HeldDirections,
    /// Latched by a press, consumed by the next input read.
    pub interact_pending: bool,
}

fn touch_direction(button: TouchButton) -> Option<MoveDirection> {
    match button {
        TouchButton::Up => Some(MoveDirection::Up),
        TouchButton::Down => Some(MoveDirection::Down),
        TouchButton::Left => Some(MoveDirection::Left),
        TouchButton::Right => Some(MoveDirection::Right),
        TouchButton::Interact => None,
    }
}

fn apply_touch_events(mut events: EventReader<TouchButtonEvent>, mut touch: ResMut<TouchState>) {
    for event in events.read() {
        match touch_direction(event.button) {
            Some(direction) => touch.held.set(direction, event.pressed),
            None => {
                if event.pressed {
                    touch.interact_pending = true;
                }
            }
        }
    }
}

pub fn keyboard_directions(keys: &ButtonInput<KeyCode>, bindings: &KeyBindings) -> HeldDirections {
    HeldDirections {
        up: keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp),
        down: keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown),
        left: keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft),
        right: keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight),
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut touch: ResMut<TouchState>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    input.held = keyboard_directions(&keys, &bindings).union(touch.held);
    input.interact = keys.just_pressed(bindings.interact)
        || keys.just_pressed(bindings.interact_alt)
        || std::mem::take(&mut touch.interact_pending);
    input.pause = keys.just_pressed(bindings.pause);
}

/// The pause flag is owned by the host; Escape flips it from gameplay only.
fn toggle_pause(
    input: Res<PlayerInput>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.pause {
        return;
    }
    match state.get() {
        GameState::Playing => {
            info!("[input] Paused");
            next_state.set(GameState::Paused);
        }
        GameState::Paused => {
            info!("[input] Resumed");
            next_state.set(GameState::Playing);
        }
        _ => {}
    }
}
