use bevy::prelude::*;
use crate::shared::*;
use super::PANEL_BG;

const TOAST_SECS: f32 = 3.0;
const MAX_TOASTS: usize = 3;

/// Column of notifications at the top of the screen.
#[derive(Component)]
pub struct ToastContainer;

#[derive(Component)]
pub struct ToastItem {
    pub timer: Timer,
}

pub fn spawn_toast_container(mut commands: Commands) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(24.0),
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
    ));
}

pub fn handle_fact_toasts(
    mut commands: Commands,
    mut events: EventReader<FactDiscoveredEvent>,
    container: Query<Entity, With<ToastContainer>>,
    existing: Query<Entity, With<ToastItem>>,
) {
    let Ok(container) = container.get_single() else {
        return;
    };

    let mut visible: Vec<Entity> = existing.iter().collect();
    for event in events.read() {
        if visible.len() >= MAX_TOASTS {
            let oldest = visible.remove(0);
            commands.entity(oldest).despawn_recursive();
        }

        let toast = commands
            .spawn((
                ToastItem {
                    timer: Timer::from_seconds(TOAST_SECS, TimerMode::Once),
                },
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(5.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(format!("New fact: {}", event.title)),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.6, 0.95, 0.7)),
                ));
            })
            .id();
        commands.entity(container).add_child(toast);
        visible.push(toast);
    }
}

pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ToastItem)>,
) {
    for (entity, mut toast) in &mut query {
        if toast.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
