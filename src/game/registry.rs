use super::room::{ClientHandle, Room};
use super::types::MatchRules;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Process-wide room directory, keyed by room name.
#[derive(Debug)]
pub struct SessionRegistry {
    rooms: DashMap<String, Arc<Room>>,
    rules: MatchRules,
}

pub enum Lookup {
    /// A fresh room with the requester already seated.
    Created(Arc<Room>),
    Existing(Arc<Room>),
}

impl SessionRegistry {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            rooms: DashMap::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    #[cfg(test)]
    pub fn room(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn find_or_create(&self, name: &str, creator: &ClientHandle) -> Lookup {
        match self.rooms.entry(name.to_string()) {
            Entry::Occupied(entry) => Lookup::Existing(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let room = Arc::new(Room::with_creator(
                    name.to_string(),
                    creator.clone(),
                    self.rules.clone(),
                ));
                entry.insert(Arc::clone(&room));
                tracing::info!(room = name, client_id = creator.id(), "room created");
                Lookup::Created(room)
            }
        }
    }

    /// Drops `room` from the directory unless the name was already reused.
    pub fn remove_room(&self, room: &Arc<Room>) {
        self.rooms
            .remove_if(room.name(), |_, existing| Arc::ptr_eq(existing, room));
    }
}
