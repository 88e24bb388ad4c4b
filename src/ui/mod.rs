mod dialogue_box;
mod prompt;
mod toast;
mod touch_controls;
mod transitions;

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── FADE OVERLAY (always present) ───
        app.add_systems(Startup, transitions::spawn_fade_overlay);
        app.add_systems(Update, transitions::update_fade);

        // ─── INTERACTION PROMPT ───
        app.add_systems(Startup, prompt::spawn_prompt);
        app.add_systems(Update, prompt::update_prompt);

        // ─── DIALOGUE BOX ───
        app.add_systems(OnEnter(GameState::Dialogue), dialogue_box::spawn_dialogue_box);
        app.add_systems(OnExit(GameState::Dialogue), dialogue_box::despawn_dialogue_box);
        app.add_systems(
            Update,
            dialogue_box::advance_dialogue.run_if(in_state(GameState::Dialogue)),
        );

        // ─── PAUSE BANNER ───
        app.add_systems(OnEnter(GameState::Paused), prompt::spawn_pause_banner);
        app.add_systems(OnExit(GameState::Paused), prompt::despawn_pause_banner);

        // ─── TOASTS ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(Update, (toast::handle_fact_toasts, toast::update_toasts).chain());

        // ─── TOUCH CONTROLS ───
        app.add_systems(Startup, touch_controls::spawn_touch_controls);
        app.add_systems(Update, touch_controls::touch_button_input);
    }
}

/// Panel background shared by all overlays.
pub(crate) const PANEL_BG: Color = Color::srgba(0.08, 0.07, 0.1, 0.85);
