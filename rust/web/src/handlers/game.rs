use crate::session::{GameStateResponse, SessionConfig, SessionError, SessionId, SessionManager};
use liar_engine::player::Action;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub seed: Option<u64>,
    pub players: Option<usize>,
    pub human_index: Option<usize>,
    pub bot_types: Option<Vec<String>>,
    /// Seat bots everywhere and watch.
    #[serde(default)]
    pub spectate: bool,
}

impl CreateSessionRequest {
    fn into_config(self) -> SessionConfig {
        let mut config = SessionConfig::default();
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(players) = self.players {
            config.players = players;
        }
        if let Some(human_index) = self.human_index {
            config.human_index = Some(human_index);
        }
        if self.spectate {
            config.human_index = None;
        }
        if let Some(bot_types) = self.bot_types {
            config.bot_types = bot_types;
        }
        config
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
}

/// Creates a session and lets the bots play up to the human seat's first
/// decision.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/sessions`
///
/// # Request Format
/// ```json
/// {
///   "players": 4,
///   "human_index": 0,
///   "bot_types": ["human", "heuristic", "random", "heuristic"],
///   "seed": 42
/// }
/// ```
/// Every field is optional. `"spectate": true` seats bots everywhere.
///
/// # Response Format
/// - **Success (201 Created)**: the session state, with the opening events
/// - **Error (400 Bad Request)**: `invalid_config`
pub async fn create_session(
    sessions: Arc<SessionManager>,
    request: CreateSessionRequest,
) -> Response {
    let config = request.into_config();

    let created = run_blocking(sessions, move |sessions| {
        let session_id = sessions.create_session(config)?;
        with_opening_events(sessions, &session_id)
    })
    .await;
    match created {
        Ok(state) => success_response(StatusCode::CREATED, state),
        Err(err) => session_error(err),
    }
}

/// Current state of a session. Emits no events.
///
/// # HTTP Method and Path
/// - **Method**: GET
/// - **Path**: `/api/sessions/{session_id}`
///
/// # Error Cases
/// - `session_not_found` (404)
/// - `session_expired` (410)
pub async fn get_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    respond(sessions.state(&session_id))
}

/// Runs bots until the human seat must decide. Returns no events while
/// paused or once the game is over.
pub async fn step_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    respond(run_blocking(sessions, move |sessions| sessions.step(&session_id)).await)
}

/// Submits the human seat's decision.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/sessions/{session_id}/actions`
///
/// # Request Format
/// ```json
/// { "action": { "type": "PLAY", "cards": ["7♠", "7♥"] } }
/// ```
/// Other actions are `{"type": "SELECT_RANK", "rank": "7"}` and
/// `{"type": "CHALLENGE", "challenge": true}`.
///
/// # Error Cases
/// - `action_rejected` (400): the engine refused the move, state unchanged;
///   `details.engine_code` names the rule
/// - `session_paused`, `game_finished`, `no_pending_decision` (409)
pub async fn apply_action(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: ActionRequest,
) -> Response {
    let action = request.action;
    respond(
        run_blocking(sessions, move |sessions| {
            sessions.apply_action(&session_id, action)
        })
        .await,
    )
}

pub async fn pause_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    respond(sessions.pause(&session_id))
}

/// Clears the pause and lets the bots play on.
pub async fn resume_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    respond(run_blocking(sessions, move |sessions| sessions.resume(&session_id)).await)
}

/// Drops the session. Responds 204 with an empty body.
pub async fn delete_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => session_error(err),
    }
}

/// The creation response carries the dealing events as well as whatever the
/// bots did before the human's first turn.
fn with_opening_events(
    sessions: &SessionManager,
    session_id: &SessionId,
) -> Result<GameStateResponse, SessionError> {
    let session = sessions.get_session(session_id)?;
    let dealt = session
        .lock()
        .map_err(|_| SessionError::StoragePoisoned)?
        .events()
        .to_vec();
    let mut state = sessions.step(session_id)?;
    let mut events = dealt;
    events.append(&mut state.events);
    state.events = events;
    Ok(state)
}

/// Session calls that may play out bot turns run on the blocking pool, so a
/// long all-bot game does not hold up a runtime worker.
async fn run_blocking<F>(
    sessions: Arc<SessionManager>,
    work: F,
) -> Result<GameStateResponse, SessionError>
where
    F: FnOnce(&SessionManager) -> Result<GameStateResponse, SessionError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&sessions))
        .await
        .unwrap_or_else(|e| Err(SessionError::Worker(e.to_string())))
}

fn respond(result: Result<GameStateResponse, SessionError>) -> Response {
    match result {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    reply::with_status(reply::reply(), status).into_response()
}

fn session_error(err: SessionError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}
