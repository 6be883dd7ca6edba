use chrono::{DateTime, Utc};
use liar_ai::table::{SeatKind, Table, TableError};
use liar_engine::errors::GameError;
use liar_engine::events::Event;
use liar_engine::game::{Decision, TableSnapshot, Visibility};
use liar_engine::player::Action;
use liar_engine::rules::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Table setup for one interactive game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub players: usize,
    /// Seat played through the API. `None` seats bots everywhere.
    pub human_index: Option<usize>,
    /// One entry per seat (`random`, `heuristic`); the human seat's entry is
    /// ignored. Empty means random bots.
    pub bot_types: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            players: 4,
            human_index: Some(0),
            bot_types: Vec::new(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn seat_kinds(&self) -> Result<Vec<SeatKind>, SessionError> {
        let players = self.players;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(SessionError::InvalidConfig(format!(
                "players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"
            )));
        }
        if let Some(human) = self.human_index {
            if human >= players {
                return Err(SessionError::InvalidConfig(
                    "human_index out of range".to_string(),
                ));
            }
        }
        if !self.bot_types.is_empty() && self.bot_types.len() != players {
            return Err(SessionError::InvalidConfig(
                "bot_types length must match players".to_string(),
            ));
        }

        let mut kinds = Vec::with_capacity(players);
        for seat in 0..players {
            if Some(seat) == self.human_index {
                kinds.push(SeatKind::Human);
                continue;
            }
            let kind = match self.bot_types.get(seat) {
                None => SeatKind::Bot(liar_ai::BotKind::Random),
                Some(name) => name
                    .parse::<SeatKind>()
                    .map_err(|e| SessionError::InvalidConfig(e.to_string()))?,
            };
            if kind == SeatKind::Human {
                return Err(SessionError::InvalidConfig(format!(
                    "seat {seat} is not the human seat"
                )));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }
}

/// Everything a client needs after any session call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub session_id: SessionId,
    pub seed: u64,
    pub seats: Vec<String>,
    pub human_index: Option<usize>,
    pub created_at: String,
    /// What the human seat may see: its own hand, the pile face down.
    pub public_state: TableSnapshot,
    pub debug_state: TableSnapshot,
    pub pending_decision: Option<Decision>,
    pub paused: bool,
    pub finished: bool,
    /// Events emitted by this call, in order.
    pub events: Vec<Event>,
    pub event_count: usize,
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>,
    session_ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_ttl: ttl,
        }
    }

    /// Deal a new table. Bots do not move until the first `step`.
    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();
        let session = GameSession::new(id.clone(), config)?;

        tracing::info!(
            session_id = %id,
            seed = session.table.seed(),
            seats = ?session.table.labels(),
            human = ?session.human_index(),
            "creating new game session"
        );

        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), Arc::new(Mutex::new(session)));
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn state(&self, session_id: &SessionId) -> Result<GameStateResponse, SessionError> {
        self.with_live_session(session_id, |session| Ok(session.response(Vec::new())))
    }

    /// Run bots until the human seat must decide or the game ends.
    pub fn step(&self, session_id: &SessionId) -> Result<GameStateResponse, SessionError> {
        self.with_live_session(session_id, |session| {
            let events = session.step()?;
            Ok(session.response(events))
        })
    }

    /// Submit the human seat's decision, then let the bots answer.
    pub fn apply_action(
        &self,
        session_id: &SessionId,
        action: Action,
    ) -> Result<GameStateResponse, SessionError> {
        self.with_live_session(session_id, |session| {
            let events = session.apply_action(action)?;
            Ok(session.response(events))
        })
    }

    pub fn pause(&self, session_id: &SessionId) -> Result<GameStateResponse, SessionError> {
        self.with_live_session(session_id, |session| {
            session.paused = true;
            tracing::debug!(session_id = %session.id, "session paused");
            Ok(session.response(Vec::new()))
        })
    }

    /// Clear the pause flag and continue where the bots left off.
    pub fn resume(&self, session_id: &SessionId) -> Result<GameStateResponse, SessionError> {
        self.with_live_session(session_id, |session| {
            session.paused = false;
            tracing::debug!(session_id = %session.id, "session resumed");
            let events = session.step()?;
            Ok(session.response(events))
        })
    }

    pub fn delete_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(session_id)? {
            Some(_) => {
                tracing::info!(session_id = %session_id, "session deleted by request");
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.clone())),
        }
    }

    /// Drop every session idle for longer than the TTL. Returns how many went.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                let stale = match session.lock() {
                    Ok(session) => session.is_expired(self.session_ttl),
                    Err(_) => true,
                };
                if stale {
                    expired.push(id.clone());
                }
                !stale
            });
        }

        for id in &expired {
            tracing::info!(session_id = %id, "session expired");
        }
        expired.len()
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn with_live_session<T>(
        &self,
        session_id: &SessionId,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let session = self.get_session(session_id)?;
        let mut guard = session
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        if guard.is_expired(self.session_ttl) {
            drop(guard);
            self.remove_session(session_id)?;
            tracing::info!(session_id = %session_id, "expired due to inactivity");
            return Err(SessionError::Expired(session_id.clone()));
        }
        guard.touch();
        f(&mut *guard)
    }

    fn remove_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Arc<Mutex<GameSession>>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(session_id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }
}

/// One table plus the flags the API layers on top of it.
pub struct GameSession {
    id: SessionId,
    table: Table,
    human_index: Option<usize>,
    paused: bool,
    created_at: DateTime<Utc>,
    last_active: Instant,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("table", &self.table)
            .field("paused", &self.paused)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl GameSession {
    fn new(id: SessionId, config: SessionConfig) -> Result<Self, SessionError> {
        let kinds = config.seat_kinds()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let table = Table::new(seed, &kinds)?;
        Ok(Self {
            id,
            table,
            human_index: config.human_index,
            paused: false,
            created_at: Utc::now(),
            last_active: Instant::now(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn human_index(&self) -> Option<usize> {
        self.human_index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.table.engine().is_game_over()
    }

    pub fn events(&self) -> &[Event] {
        self.table.engine().events()
    }

    /// The engine's next decision, but only when the human seat owns it.
    pub fn pending_decision(&self) -> Option<Decision> {
        self.table
            .engine()
            .pending_decision()
            .filter(|d| Some(d.player) == self.human_index)
    }

    fn step(&mut self) -> Result<Vec<Event>, SessionError> {
        if self.paused || self.is_finished() {
            return Ok(Vec::new());
        }
        let events = self.table.run_until_human().map_err(|err| {
            tracing::error!(session_id = %self.id, error = %err, "bot turn failed");
            SessionError::Table(err)
        })?;
        if self.is_finished() {
            tracing::info!(
                session_id = %self.id,
                placements = ?self.table.engine().placements(),
                "game finished"
            );
        }
        Ok(events)
    }

    fn apply_action(&mut self, action: Action) -> Result<Vec<Event>, SessionError> {
        if self.paused {
            return Err(SessionError::Paused(self.id.clone()));
        }
        if self.is_finished() {
            return Err(SessionError::Finished(self.id.clone()));
        }
        let Some(decision) = self.pending_decision() else {
            return Err(SessionError::NoPendingDecision(self.id.clone()));
        };

        let mut events = self
            .table
            .apply_human(decision.player, action)
            .map_err(|err| match err {
                TableError::Game(rejected) => {
                    tracing::debug!(
                        session_id = %self.id,
                        player = decision.player,
                        code = rejected.code(),
                        "human action rejected"
                    );
                    SessionError::Rejected(rejected)
                }
                other => SessionError::Table(other),
            })?;
        events.extend(self.step()?);
        Ok(events)
    }

    fn response(&self, events: Vec<Event>) -> GameStateResponse {
        let engine = self.table.engine();
        let public = match self.human_index {
            Some(seat) => Visibility::Seat(seat),
            None => Visibility::Public,
        };
        GameStateResponse {
            session_id: self.id.clone(),
            seed: self.table.seed(),
            seats: self.table.labels(),
            human_index: self.human_index,
            created_at: self.created_at.to_rfc3339(),
            public_state: engine.snapshot(public),
            debug_state: engine.snapshot(Visibility::All),
            pending_decision: self.pending_decision(),
            paused: self.paused,
            finished: self.is_finished(),
            events,
            event_count: engine.events().len(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_active.elapsed() >= ttl
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("{0}")]
    Rejected(GameError),
    #[error("Game is paused")]
    Paused(SessionId),
    #[error("Game already finished")]
    Finished(SessionId),
    #[error("No decision is waiting for the human seat")]
    NoPendingDecision(SessionId),
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
    #[error("Session worker failed: {0}")]
    Worker(String),
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::Rejected(_) => StatusCode::BAD_REQUEST,
            SessionError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SessionError::Paused(_) => StatusCode::CONFLICT,
            SessionError::Finished(_) => StatusCode::CONFLICT,
            SessionError::NoPendingDecision(_) => StatusCode::CONFLICT,
            SessionError::Table(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::Rejected(_) => "action_rejected",
            SessionError::InvalidConfig(_) => "invalid_config",
            SessionError::Paused(_) => "session_paused",
            SessionError::Finished(_) => "game_finished",
            SessionError::NoPendingDecision(_) => "no_pending_decision",
            SessionError::Table(_) => "table_error",
            SessionError::StoragePoisoned => "session_storage_error",
            SessionError::Worker(_) => "session_worker_failed",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({
                "session_id": id
            })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Session expired due to inactivity"
            })),
            SessionError::Rejected(err) => Some(serde_json::json!({
                "engine_code": err.code()
            })),
            SessionError::Paused(id)
            | SessionError::Finished(id)
            | SessionError::NoPendingDecision(id) => Some(serde_json::json!({
                "session_id": id
            })),
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Table(_) | SessionError::Worker(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}

#[cfg(test)]
impl GameSession {
    fn force_last_active(&mut self, instant: Instant) {
        self.last_active = instant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IntoErrorResponse;
    use liar_engine::cards::Rank;
    use liar_engine::game::ActionKind;
    use std::collections::HashSet;
    use std::thread;

    fn config(seed: u64) -> SessionConfig {
        SessionConfig {
            players: 3,
            human_index: Some(0),
            bot_types: vec!["human".into(), "heuristic".into(), "random".into()],
            seed: Some(seed),
        }
    }

    /// Answer whatever the human seat is asked with the simplest legal move.
    fn simple_action(response: &GameStateResponse) -> Action {
        let decision = response.pending_decision.expect("human decision");
        match decision.kind {
            ActionKind::SelectRank => {
                let hand = response.public_state.players[decision.player]
                    .hand
                    .clone()
                    .expect("own hand visible");
                Action::SelectRank { rank: hand[0].rank }
            }
            ActionKind::Play => {
                let hand = response.public_state.players[decision.player]
                    .hand
                    .clone()
                    .expect("own hand visible");
                Action::Play {
                    cards: vec![hand[0]],
                }
            }
            ActionKind::Challenge => Action::Challenge { challenge: false },
        }
    }

    #[test]
    fn creates_session_and_provides_state() {
        let manager = SessionManager::with_ttl(Duration::from_secs(60));
        let id = manager.create_session(config(11)).expect("create session");

        let state = manager.state(&id).expect("session state");
        assert_eq!(state.session_id, id);
        assert_eq!(state.seed, 11);
        assert_eq!(state.seats, vec!["human", "heuristic", "random"]);
        assert_eq!(state.public_state.players.len(), 3);
        assert!(state.public_state.players[0].hand.is_some());
        assert!(state.public_state.players[1].hand.is_none());
        assert!(state.public_state.pile.is_none());
        assert!(state.debug_state.players.iter().all(|p| p.hand.is_some()));
        assert!(state.events.is_empty());
        assert!(!state.paused);
    }

    #[test]
    fn rejects_bad_configs() {
        let manager = SessionManager::new();
        let mut bad = config(1);
        bad.players = 7;
        assert!(matches!(
            manager.create_session(bad),
            Err(SessionError::InvalidConfig(_))
        ));

        let mut bad = config(1);
        bad.human_index = Some(3);
        assert!(matches!(
            manager.create_session(bad),
            Err(SessionError::InvalidConfig(_))
        ));

        let mut bad = config(1);
        bad.bot_types.pop();
        assert!(matches!(
            manager.create_session(bad),
            Err(SessionError::InvalidConfig(_))
        ));

        let mut bad = config(1);
        bad.bot_types[2] = "human".into();
        assert!(matches!(
            manager.create_session(bad),
            Err(SessionError::InvalidConfig(_))
        ));
        assert!(manager.active_sessions().is_empty());
    }

    #[test]
    fn seat_kinds_default_to_random_bots() {
        let kinds = SessionConfig::default().seat_kinds().unwrap();
        assert_eq!(kinds[0], SeatKind::Human);
        assert!(kinds[1..]
            .iter()
            .all(|k| *k == SeatKind::Bot(liar_ai::BotKind::Random)));
    }

    #[test]
    fn step_stops_at_the_human_seat() {
        let manager = SessionManager::new();
        let id = manager.create_session(config(5)).unwrap();
        let dealt = manager.state(&id).unwrap().event_count;
        let state = manager.step(&id).unwrap();
        assert!(state.finished || state.pending_decision.is_some());
        if let Some(decision) = state.pending_decision {
            assert_eq!(decision.player, 0);
        }
        assert_eq!(state.event_count, dealt + state.events.len());

        // nothing more happens until the human answers
        let again = manager.step(&id).unwrap();
        assert!(again.events.is_empty());
        assert_eq!(again.event_count, state.event_count);
    }

    #[test]
    fn human_plays_a_full_game() {
        let manager = SessionManager::new();
        let id = manager.create_session(config(23)).unwrap();
        let mut state = manager.step(&id).unwrap();
        let mut guard = 0;
        while !state.finished {
            let action = simple_action(&state);
            state = manager.apply_action(&id, action).unwrap();
            guard += 1;
            assert!(guard < 5_000, "game did not finish");
        }
        assert_eq!(state.debug_state.placements.len(), 3);
        assert!(state.pending_decision.is_none());
        assert!(matches!(
            manager.apply_action(&id, Action::Challenge { challenge: true }),
            Err(SessionError::Finished(_))
        ));

        let session = manager.get_session(&id).unwrap();
        let session = session.lock().unwrap();
        assert!(matches!(session.events().last(), Some(Event::GameEnd { .. })));
    }

    #[test]
    fn rejected_action_leaves_state_unchanged() {
        let manager = SessionManager::new();
        let id = manager.create_session(config(5)).unwrap();
        let before = manager.step(&id).unwrap();
        if before.finished {
            return;
        }

        let wrong = match before.pending_decision.map(|d| d.kind) {
            Some(ActionKind::Play) | Some(ActionKind::Challenge) => {
                Action::SelectRank { rank: Rank::Ace }
            }
            _ => Action::Play { cards: vec![] },
        };
        let err = manager.apply_action(&id, wrong).unwrap_err();
        assert!(matches!(err, SessionError::Rejected(GameError::WrongPhase { .. })));
        assert_eq!(err.status_code(), warp::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_error_response().details.unwrap()["engine_code"], "wrong_phase");

        let after = manager.state(&id).unwrap();
        assert_eq!(after.debug_state, before.debug_state);
        assert_eq!(after.event_count, before.event_count);
    }

    #[test]
    fn pause_blocks_progress_without_touching_events() {
        let manager = SessionManager::new();
        let id = manager.create_session(config(8)).unwrap();
        let dealt = manager.state(&id).unwrap().event_count;
        let paused = manager.pause(&id).unwrap();
        assert!(paused.paused);
        assert_eq!(paused.event_count, dealt);

        assert!(manager.step(&id).unwrap().events.is_empty());
        assert!(matches!(
            manager.apply_action(&id, Action::Challenge { challenge: false }),
            Err(SessionError::Paused(_))
        ));
        assert_eq!(manager.state(&id).unwrap().event_count, dealt);

        let resumed = manager.resume(&id).unwrap();
        assert!(!resumed.paused);
        assert!(resumed.finished || resumed.pending_decision.is_some());
        assert_eq!(resumed.event_count, dealt + resumed.events.len());
    }

    #[test]
    fn spectator_sessions_run_to_the_end() {
        let manager = SessionManager::new();
        let id = manager
            .create_session(SessionConfig {
                players: 4,
                human_index: None,
                bot_types: vec!["heuristic".into(); 4],
                seed: Some(3),
            })
            .unwrap();
        let state = manager.step(&id).unwrap();
        assert!(state.finished);
        assert!(state.public_state.players.iter().all(|p| p.hand.is_none()));
        assert!(matches!(
            manager.apply_action(&id, Action::Challenge { challenge: false }),
            Err(SessionError::Finished(_))
        ));
    }

    #[test]
    fn no_pending_decision_for_spectators_mid_game() {
        let manager = SessionManager::new();
        let id = manager
            .create_session(SessionConfig {
                human_index: None,
                seed: Some(4),
                ..SessionConfig::default()
            })
            .unwrap();
        assert!(matches!(
            manager.apply_action(&id, Action::Challenge { challenge: false }),
            Err(SessionError::NoPendingDecision(_))
        ));
    }

    #[test]
    fn same_seed_same_game() {
        let manager = SessionManager::new();
        let a = manager.create_session(config(99)).unwrap();
        let b = manager.create_session(config(99)).unwrap();
        let sa = manager.step(&a).unwrap();
        let sb = manager.step(&b).unwrap();
        assert_eq!(sa.events, sb.events);
        assert_eq!(sa.debug_state, sb.debug_state);
    }

    #[test]
    fn delete_removes_only_that_session() {
        let manager = SessionManager::new();
        let a = manager.create_session(config(1)).unwrap();
        let b = manager.create_session(config(2)).unwrap();
        manager.delete_session(&a).unwrap();
        assert!(matches!(manager.state(&a), Err(SessionError::NotFound(_))));
        assert!(matches!(
            manager.delete_session(&a),
            Err(SessionError::NotFound(_))
        ));
        assert!(manager.state(&b).is_ok());
        assert_eq!(manager.active_sessions(), vec![b]);
    }

    #[test]
    fn cleanup_expired_sessions_removes_stale_entries() {
        let manager = SessionManager::with_ttl(Duration::from_secs(1));
        let stale = manager.create_session(config(1)).unwrap();
        let fresh = manager.create_session(config(2)).unwrap();
        manager
            .get_session(&stale)
            .unwrap()
            .lock()
            .unwrap()
            .force_last_active(Instant::now() - Duration::from_secs(5));

        assert_eq!(manager.cleanup_expired_sessions(), 1);
        assert!(matches!(
            manager.get_session(&stale),
            Err(SessionError::NotFound(_))
        ));
        assert!(manager.get_session(&fresh).is_ok());
    }

    #[test]
    fn stale_session_reports_expired_once() {
        let manager = SessionManager::with_ttl(Duration::from_secs(1));
        let id = manager.create_session(config(1)).unwrap();
        manager
            .get_session(&id)
            .unwrap()
            .lock()
            .unwrap()
            .force_last_active(Instant::now() - Duration::from_secs(5));

        let err = manager.step(&id).unwrap_err();
        assert!(matches!(err, SessionError::Expired(_)));
        assert_eq!(err.status_code(), warp::http::StatusCode::GONE);
        assert!(matches!(manager.state(&id), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn concurrent_session_creation_is_safe() {
        let manager = Arc::new(SessionManager::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    let id = manager.create_session(config(i)).unwrap();
                    manager.step(&id).unwrap();
                    id
                })
            })
            .collect();
        let ids: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(manager.active_sessions().len(), 8);
    }

    #[test]
    fn creation_is_logged_with_session_id() {
        let subscriber = crate::logging::TestLogSubscriber::new();
        let layer = subscriber
            .clone()
            .into_layer::<tracing_subscriber::Registry>();
        let registry = tracing_subscriber::layer::SubscriberExt::with(
            tracing_subscriber::Registry::default(),
            layer,
        );
        let manager = SessionManager::new();
        let id = tracing::subscriber::with_default(registry, || {
            manager.create_session(config(6)).unwrap()
        });
        let entries = subscriber.with_field("session_id", &id);
        assert!(entries
            .iter()
            .any(|e| e.message.contains("creating new game session")));
    }
}
