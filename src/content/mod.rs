//! Knowledge facts the player can unlock by talking to people.
//!
//! Only a thin lookup/record seam: presentation of a fact belongs to the
//! dialogue layer.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::shared::*;

pub const FACTS_JSON: &str = include_str!("../../assets/data/facts.json");

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentRegistry>()
            .add_event::<DiscoverFactEvent>()
            .add_event::<FactDiscoveredEvent>()
            .add_systems(Update, handle_discover_fact);
    }
}

#[derive(Debug, Deserialize)]
struct FactsFile {
    facts: Vec<ContentRecord>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ContentRegistry {
    pub records: HashMap<FactId, ContentRecord>,
    pub discovered: HashSet<FactId>,
}

impl ContentRegistry {
    pub fn lookup(&self, id: FactId) -> Option<&ContentRecord> {
        self.records.get(&id)
    }

    /// True only the first time a known fact is marked.
    pub fn mark_discovered(&mut self, id: FactId) -> bool {
        self.records.contains_key(&id) && self.discovered.insert(id)
    }

    pub fn is_discovered(&self, id: FactId) -> bool {
        self.discovered.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn parse_content(src: &str) -> Result<ContentRegistry, String> {
    let file: FactsFile =
        serde_json::from_str(src).map_err(|e| format!("Fact data parse failed: {}", e))?;
    let mut registry = ContentRegistry::default();
    for record in file.facts {
        let id = record.id;
        if registry.records.insert(id, record).is_some() {
            return Err(format!("Duplicate fact id {}", id));
        }
    }
    Ok(registry)
}

fn handle_discover_fact(
    mut requests: EventReader<DiscoverFactEvent>,
    mut content: ResMut<ContentRegistry>,
    mut discovered: EventWriter<FactDiscoveredEvent>,
) {
    for request in requests.read() {
        let Some(title) = content.lookup(request.fact_id).map(|r| r.title.clone()) else {
            warn!("[content] Unknown fact id {}", request.fact_id);
            continue;
        };
        if content.mark_discovered(request.fact_id) {
            info!("[content] Discovered fact {}: {}", request.fact_id, title);
            discovered.send(FactDiscoveredEvent {
                fact_id: request.fact_id,
                title,
            });
        }
    }
}
