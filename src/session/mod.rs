//! Session flow: the host side of the suspension flags.
//!
//! The world core only reads `GameState`; this plugin is what moves it in
//! and out of conversations and minigames.

use bevy::prelude::*;

use crate::shared::*;
use crate::world::rooms::RoomRegistry;
use crate::world::ActiveRoom;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveConversation>()
            .add_event::<DialogueEndEvent>()
            .add_event::<MinigameStartEvent>()
            .add_event::<MinigameEndEvent>()
            .add_systems(
                Update,
                (
                    start_conversation,
                    end_conversation,
                    start_minigame,
                    end_minigame,
                )
                    .chain()
                    .after(crate::simulation::SimSet::Transition),
            );
    }
}

/// The conversation currently on screen, if any.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveConversation {
    pub npc_id: Option<NpcId>,
    pub npc_name: String,
    pub dialogue: Option<DialogueId>,
    pub unlocks: Option<FactId>,
}

impl ActiveConversation {
    pub fn is_open(&self) -> bool {
        self.npc_id.is_some()
    }
}

fn start_conversation(
    mut events: EventReader<NpcInteractEvent>,
    state: Res<State<GameState>>,
    registry: Option<Res<RoomRegistry>>,
    active: Res<ActiveRoom>,
    mut conversation: ResMut<ActiveConversation>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // One conversation per frame, even if several presses slipped through.
    let Some(event) = events.read().last() else {
        return;
    };
    if *state.get() != GameState::Playing {
        return;
    }

    let npc = registry
        .as_deref()
        .and_then(|r| active.room(r))
        .and_then(|room| room.npc(&event.npc_id));

    *conversation = ActiveConversation {
        npc_id: Some(event.npc_id.clone()),
        npc_name: npc.map_or_else(|| event.npc_id.clone(), |n| n.name.clone()),
        dialogue: Some(event.dialogue.clone()),
        unlocks: npc.and_then(|n| n.fact_id),
    };
    info!("[session] Dialogue '{}' opened", event.dialogue);
    next_state.set(GameState::Dialogue);
}

fn end_conversation(
    mut events: EventReader<DialogueEndEvent>,
    state: Res<State<GameState>>,
    mut conversation: ResMut<ActiveConversation>,
    mut next_state: ResMut<NextState<GameState>>,
    mut discover: EventWriter<DiscoverFactEvent>,
) {
    if events.read().last().is_none() {
        return;
    }
    if *state.get() != GameState::Dialogue {
        return;
    }

    if let Some(fact_id) = conversation.unlocks {
        discover.send(DiscoverFactEvent { fact_id });
    }
    info!(
        "[session] Dialogue with '{}' closed",
        conversation.npc_id.as_deref().unwrap_or("?")
    );
    *conversation = ActiveConversation::default();
    next_state.set(GameState::Playing);
}

fn start_minigame(
    mut events: EventReader<MinigameStartEvent>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if matches!(state.get(), GameState::Playing | GameState::Dialogue) {
        info!("[session] Minigame '{}' started", event.minigame_id);
        next_state.set(GameState::Minigame);
    }
}

fn end_minigame(
    mut events: EventReader<MinigameEndEvent>,
    state: Res<State<GameState>>,
    mut conversation: ResMut<ActiveConversation>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if *state.get() != GameState::Minigame {
        return;
    }
    info!("[session] Minigame '{}' finished, score {}", event.minigame_id, event.score);
    *conversation = ActiveConversation::default();
    next_state.set(GameState::Playing);
}
