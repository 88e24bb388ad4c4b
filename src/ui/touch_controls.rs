//! On-screen d-pad and action button for touch devices. Presses and
//! releases are forwarded as `TouchButtonEvent`s with key-like semantics.

use bevy::prelude::*;
use crate::shared::*;

const BUTTON_SIZE: f32 = 56.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct TouchControl {
    pub button: TouchButton,
}

/// Last pressed state per button, so only edges become events.
#[derive(Component, Debug, Default)]
pub struct TouchPressed(pub bool);

fn spawn_button(parent: &mut ChildBuilder, button: TouchButton, label: &str, left: f32, bottom: f32) {
    parent
        .spawn((
            TouchControl { button },
            TouchPressed::default(),
            Button,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(left),
                bottom: Val::Px(bottom),
                width: Val::Px(BUTTON_SIZE),
                height: Val::Px(BUTTON_SIZE),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
        ))
        .with_children(|b| {
            b.spawn((
                Text::new(label),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            ));
        });
}

pub fn spawn_touch_controls(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            let pad = 16.0;
            spawn_button(parent, TouchButton::Up, "^", pad + BUTTON_SIZE, pad + BUTTON_SIZE * 2.0);
            spawn_button(parent, TouchButton::Left, "<", pad, pad + BUTTON_SIZE);
            spawn_button(parent, TouchButton::Right, ">", pad + BUTTON_SIZE * 2.0, pad + BUTTON_SIZE);
            spawn_button(parent, TouchButton::Down, "v", pad + BUTTON_SIZE, pad);
            spawn_button(
                parent,
                TouchButton::Interact,
                "A",
                SCREEN_WIDTH - pad - BUTTON_SIZE * 1.5,
                pad + BUTTON_SIZE,
            );
        });
}

pub fn touch_button_input(
    mut query: Query<(&TouchControl, &Interaction, &mut TouchPressed, &mut BackgroundColor)>,
    mut events: EventWriter<TouchButtonEvent>,
) {
    for (control, interaction, mut pressed, mut bg) in &mut query {
        let now = *interaction == Interaction::Pressed;
        if now == pressed.0 {
            continue;
        }
        pressed.0 = now;
        *bg = BackgroundColor(Color::srgba(1.0, 1.0, 1.0, if now { 0.35 } else { 0.15 }));
        events.send(TouchButtonEvent {
            button: control.button,
            pressed: now,
        });
    }
}
