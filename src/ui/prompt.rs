use bevy::prelude::*;
use crate::shared::*;
use super::PANEL_BG;

#[derive(Component)]
pub struct InteractionPrompt;

#[derive(Component)]
pub struct InteractionPromptText;

#[derive(Component)]
pub struct PauseBanner;

pub fn spawn_prompt(mut commands: Commands) {
    commands
        .spawn((
            InteractionPrompt,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(96.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        InteractionPromptText,
                        Text::new(""),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        });
}

pub fn prompt_text(proximity: &Proximity) -> Option<String> {
    if let Some(npc) = &proximity.nearby_npc {
        Some(format!("SPACE to talk to {}", npc.name))
    } else {
        proximity
            .nearby_exit
            .as_ref()
            .map(|nearby| format!("SPACE: {}", nearby.exit.label))
    }
}

pub fn update_prompt(
    proximity: Res<Proximity>,
    state: Res<State<GameState>>,
    mut root: Query<&mut Visibility, With<InteractionPrompt>>,
    mut text: Query<&mut Text, With<InteractionPromptText>>,
) {
    let Ok(mut visibility) = root.get_single_mut() else {
        return;
    };
    let message = if *state.get() == GameState::Playing {
        prompt_text(&proximity)
    } else {
        None
    };

    match message {
        Some(message) => {
            *visibility = Visibility::Inherited;
            if let Ok(mut text) = text.get_single_mut() {
                if text.0 != message {
                    text.0 = message;
                }
            }
        }
        None => *visibility = Visibility::Hidden,
    }
}

pub fn spawn_pause_banner(mut commands: Commands) {
    commands
        .spawn((
            PauseBanner,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
            GlobalZIndex(50),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Paused (Esc to resume)"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

pub fn despawn_pause_banner(mut commands: Commands, query: Query<Entity, With<PauseBanner>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
