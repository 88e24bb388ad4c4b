use bevy::prelude::*;
use crate::shared::*;
use crate::world::transition::RoomTransition;

/// Marker for the screen fade overlay
#[derive(Component)]
pub struct ScreenFadeOverlay;

/// Drives the fade that covers a room swap.
#[derive(Resource)]
pub struct ScreenFade {
    /// 0.0 transparent, 1.0 opaque black
    pub alpha: f32,
    /// Fade-out rate once the new room is in, alpha units per second
    pub speed: f32,
    pub active: bool,
}

impl Default for ScreenFade {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            speed: 1000.0 / TRANSITION_DELAY_MS as f32,
            active: false,
        }
    }
}

impl ScreenFade {
    /// While a transition is pending the overlay tracks its progress, so it
    /// is fully dark right as the delay runs out. Afterwards it clears.
    pub fn advance(&mut self, progress: Option<f32>, delta_secs: f32) {
        if let Some(progress) = progress {
            self.alpha = progress.clamp(0.0, 1.0);
            self.active = true;
            return;
        }
        if !self.active {
            return;
        }
        let step = self.speed * delta_secs;
        if self.alpha <= step {
            self.alpha = 0.0;
            self.active = false;
        } else {
            self.alpha -= step;
        }
    }
}

/// Spawn the fade overlay (always present but invisible)
pub fn spawn_fade_overlay(mut commands: Commands) {
    commands.insert_resource(ScreenFade::default());

    commands.spawn((
        ScreenFadeOverlay,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100),
    ));
}

pub fn update_fade(
    time: Res<Time>,
    transition: Res<RoomTransition>,
    mut fade: ResMut<ScreenFade>,
    mut query: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
) {
    if !fade.active && !transition.is_transitioning() {
        return;
    }

    let progress = transition.is_transitioning().then(|| transition.progress());
    fade.advance(progress, time.delta_secs());

    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, fade.alpha));
    }
}
