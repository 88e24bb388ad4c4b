//! Stand-in conversation panel. The real dialogue engine lives outside the
//! world core; this one shows who is talking and what they can teach, then
//! closes on the next interact press.

use bevy::prelude::*;
use crate::content::ContentRegistry;
use crate::session::ActiveConversation;
use crate::shared::*;
use super::PANEL_BG;

#[derive(Component)]
pub struct DialogueBoxRoot;

fn dialogue_body(conversation: &ActiveConversation, content: &ContentRegistry) -> String {
    match conversation.unlocks.and_then(|id| content.lookup(id)) {
        Some(record) => format!("{}\n\n{}", record.title, record.body),
        None => "Nice day, isn't it?".to_string(),
    }
}

pub fn spawn_dialogue_box(
    mut commands: Commands,
    conversation: Res<ActiveConversation>,
    content: Res<ContentRegistry>,
) {
    let body = dialogue_body(&conversation, &content);

    commands
        .spawn((
            DialogueBoxRoot,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(10.0),
                width: Val::Percent(80.0),
                min_height: Val::Px(120.0),
                padding: UiRect::all(Val::Px(16.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(PANEL_BG),
            BorderColor(Color::srgb(0.75, 0.65, 0.45)),
            GlobalZIndex(20),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(conversation.npc_name.clone()),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.5)),
            ));
            parent.spawn((
                Text::new(body),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("[SPACE] Close"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
            ));
        });
}

pub fn despawn_dialogue_box(mut commands: Commands, query: Query<Entity, With<DialogueBoxRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn advance_dialogue(input: Res<PlayerInput>, mut end: EventWriter<DialogueEndEvent>) {
    if input.interact {
        end.send(DialogueEndEvent);
    }
}
