mod session;

pub use session::{ClientHandle, ClientSession};

use super::constants::MAX_ROOM_MEMBERS;
use super::match_state::{Match, TickOutcome};
use super::registry::SessionRegistry;
use super::types::{ClientId, GameOverNotice, MatchRules, Point};
use crate::protocol::ServerMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A named two-seat room. All membership, readiness and match state sits
/// behind one lock, so the room's clients and its ticker never race.
#[derive(Debug)]
pub struct Room {
    name: String,
    rules: MatchRules,
    state: Mutex<RoomState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    Full,
    /// The room emptied and left the registry before the join landed.
    Closed,
}

#[derive(Debug)]
struct RoomState {
    members: Vec<ClientHandle>,
    ready_clients: Vec<ClientId>,
    active: Option<ActiveMatch>,
    next_match_id: u64,
    closed: bool,
}

#[derive(Debug)]
struct ActiveMatch {
    id: u64,
    game: Match,
    ticker: JoinHandle<()>,
}

impl Room {
    pub(crate) fn with_creator(name: String, creator: ClientHandle, rules: MatchRules) -> Self {
        Self {
            name,
            rules,
            state: Mutex::new(RoomState {
                members: vec![creator],
                ready_clients: Vec::new(),
                active: None,
                next_match_id: 0,
                closed: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn welcome_creator(&self, client: &ClientHandle) {
        let state = self.state.lock().await;
        if state.is_member(client.id()) {
            state.welcome(client);
        }
    }

    pub async fn is_member(&self, client_id: &str) -> bool {
        self.state.lock().await.is_member(client_id)
    }

    pub async fn try_join(&self, client: &ClientHandle) -> JoinOutcome {
        let mut state = self.state.lock().await;
        if state.closed {
            return JoinOutcome::Closed;
        }
        if state.members.len() >= MAX_ROOM_MEMBERS {
            tracing::info!(room = %self.name, client_id = client.id(), "room is full");
            return JoinOutcome::Full;
        }
        state.members.push(client.clone());
        tracing::info!(room = %self.name, client_id = client.id(), "joined room");
        state.welcome(client);
        JoinOutcome::Joined
    }

    /// Leaves the room. During a match the whole room is torn down instead.
    pub async fn leave(self: &Arc<Self>, registry: &SessionRegistry, client: &ClientHandle) {
        let mut state = self.state.lock().await;
        if !state.is_member(client.id()) {
            drop(state);
            client.send(ServerMessage::LeaveRoomCallback);
            return;
        }
        if state.active.is_some() {
            self.teardown(&mut state, registry, client.id());
            return;
        }
        self.release_member(&mut state, registry, client.id());
    }

    /// Flips the client's readiness; the second ready member starts a match.
    /// Returns false when the client is no longer a member.
    pub async fn toggle_ready(self: &Arc<Self>, client_id: &str) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_member(client_id) {
            return false;
        }
        if state.active.is_some() {
            if let Some(member) = state.member(client_id) {
                member.send(ServerMessage::StartButtonClickCallback(false));
            }
            return true;
        }
        if state.is_ready(client_id) {
            state.cancel_ready(client_id);
            tracing::info!(room = %self.name, client_id, "not ready anymore");
        } else {
            state.ready_up(client_id);
            tracing::info!(room = %self.name, client_id, "ready");
            if state.ready_clients.len() == MAX_ROOM_MEMBERS {
                self.start_match(&mut state);
            }
        }
        true
    }

    /// Forwards a heading to the client's snake, if a match is running.
    /// Returns false when the client is no longer a member.
    pub async fn steer(&self, client_id: &str, direction: Point) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_member(client_id) {
            return false;
        }
        if let Some(active) = state.active.as_mut() {
            active.game.set_direction(client_id, direction);
        }
        true
    }

    fn start_match(self: &Arc<Self>, state: &mut RoomState) {
        state.broadcast(ServerMessage::StartGame);
        let players: Vec<ClientId> = state
            .members
            .iter()
            .map(|member| member.id().to_string())
            .collect();
        for player in &players {
            state.cancel_ready(player);
        }

        let game = match Match::new(&players, self.rules.clone()) {
            Ok(game) => game,
            Err(error) => {
                tracing::error!(room = %self.name, %error, "failed to start match");
                state.broadcast(ServerMessage::GameOver(GameOverNotice::quit()));
                return;
            }
        };
        state.broadcast(ServerMessage::GameData(game.snapshot()));

        state.next_match_id += 1;
        let id = state.next_match_id;
        let ticker = tokio::spawn(run_ticker(Arc::clone(self), id, self.rules.snake_rate));
        state.active = Some(ActiveMatch { id, game, ticker });
        tracing::info!(room = %self.name, match_id = id, "match started");
    }

    /// Stops the running match and pushes every member out through the
    /// regular leave path, deleting the room.
    fn teardown(
        self: &Arc<Self>,
        state: &mut RoomState,
        registry: &SessionRegistry,
        initiator: &str,
    ) {
        if let Some(active) = state.active.take() {
            active.ticker.abort();
            state.broadcast(ServerMessage::GameOver(GameOverNotice::quit()));
        }
        let member_ids: Vec<ClientId> = state
            .members
            .iter()
            .rev()
            .map(|member| member.id().to_string())
            .collect();
        for member_id in member_ids {
            self.release_member(state, registry, &member_id);
        }
        tracing::info!(
            room = %self.name,
            client_id = initiator,
            "left during a match, room deleted"
        );
    }

    fn release_member(
        self: &Arc<Self>,
        state: &mut RoomState,
        registry: &SessionRegistry,
        client_id: &str,
    ) {
        state.cancel_ready(client_id);
        let Some(index) = state.members.iter().position(|member| member.id() == client_id) else {
            return;
        };
        let member = state.members.remove(index);
        member.send(ServerMessage::LeaveRoomCallback);

        if state.members.is_empty() {
            state.closed = true;
            registry.remove_room(self);
            tracing::info!(room = %self.name, client_id, "room deleted");
        } else {
            tracing::info!(room = %self.name, client_id, "left room");
        }
    }
}

async fn run_ticker(room: Arc<Room>, match_id: u64, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let mut state = room.state.lock().await;
        if !state.tick_match(&room.name, match_id) {
            break;
        }
    }
}

impl RoomState {
    fn is_member(&self, client_id: &str) -> bool {
        self.members.iter().any(|member| member.id() == client_id)
    }

    fn is_ready(&self, client_id: &str) -> bool {
        self.ready_clients.iter().any(|id| id == client_id)
    }

    fn member(&self, client_id: &str) -> Option<&ClientHandle> {
        self.members.iter().find(|member| member.id() == client_id)
    }

    fn broadcast(&self, message: ServerMessage) {
        for member in &self.members {
            member.send(message.clone());
        }
    }

    fn welcome(&self, client: &ClientHandle) {
        client.send(ServerMessage::JoinRoomCallback(true));
        self.announce_readiness(client.id());
    }

    fn announce_readiness(&self, client_id: &str) {
        if let Some(member) = self.member(client_id) {
            member.send(ServerMessage::StartButtonClickCallback(self.is_ready(client_id)));
        }
        self.broadcast(ServerMessage::ListOfReadyPlayersChanged(self.ready_clients.clone()));
    }

    fn ready_up(&mut self, client_id: &str) {
        if self.is_ready(client_id) {
            return;
        }
        self.ready_clients.push(client_id.to_string());
        self.announce_readiness(client_id);
    }

    fn cancel_ready(&mut self, client_id: &str) {
        let Some(index) = self.ready_clients.iter().position(|id| id == client_id) else {
            return;
        };
        self.ready_clients.remove(index);
        self.announce_readiness(client_id);
    }

    /// Runs one tick of match `match_id`. Returns false once the ticker
    /// should stop: the round ended, failed, or was replaced.
    fn tick_match(&mut self, room_name: &str, match_id: u64) -> bool {
        let Some(active) = self.active.as_mut().filter(|active| active.id == match_id) else {
            return false;
        };
        match active.game.tick() {
            Ok(TickOutcome::Running(snapshot)) => {
                self.broadcast(ServerMessage::GameData(snapshot));
                true
            }
            Ok(TickOutcome::Over { notice, snapshot }) => {
                tracing::info!(room = room_name, match_id, cause = ?notice.cause, "match over");
                self.active = None;
                self.broadcast(ServerMessage::GameOver(notice));
                self.broadcast(ServerMessage::GameData(snapshot));
                false
            }
            Err(error) => {
                tracing::error!(room = room_name, match_id, %error, "match aborted");
                self.active = None;
                self.broadcast(ServerMessage::GameOver(GameOverNotice::quit()));
                false
            }
        }
    }
}
