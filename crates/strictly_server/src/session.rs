//! Game session management and move synchronization.
//!
//! Each session owns one authoritative [`GameState`] behind its own lock.
//! Proposed moves are authorized against the proposer's seat, validated by
//! the rules engine, committed, and broadcast to subscribers while the lock
//! is still held, so every subscriber sees commits in the same order.

use derive_more::{Display, Error, From};
use derive_new::new;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_checkers::{
    apply_move, evaluate_move, legal_moves, Color, GameState, IllegalReason, Move, MoveOutcome,
    OutOfBoundsError, RulesConfig, TransitionError,
};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Secret token identifying a participant within a session.
///
/// Only the joiner learns it; snapshots and events never carry it.
pub type ParticipantId = String;

/// Length of a generated [`ParticipantId`].
const TOKEN_LEN: usize = 32;

/// Spectators allowed per session unless configured otherwise.
pub const DEFAULT_MAX_SPECTATORS: usize = 32;

fn participant_token() -> ParticipantId {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// What a participant is allowed to do in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// Moves the white pieces.
    White,
    /// Moves the black pieces.
    Black,
    /// Observes only.
    Spectator,
}

impl Seat {
    /// The color this seat may move, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Seat::White => Some(Color::White),
            Seat::Black => Some(Color::Black),
            Seat::Spectator => None,
        }
    }
}

impl From<Color> for Seat {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Seat::White,
            Color::Black => Seat::Black,
        }
    }
}

/// A participant in a game session, as returned to the joiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Participant {
    /// Participant's secret token.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Assigned seat.
    pub seat: Seat,
}

/// Public view of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatHolder {
    /// Display name.
    pub name: String,
    /// Assigned seat.
    pub seat: Seat,
}

impl From<&Participant> for SeatHolder {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            seat: participant.seat,
        }
    }
}

/// Broadcast record of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Session the move belongs to.
    pub session_id: SessionId,
    /// State version after the move.
    pub version: u64,
    /// Who proposed the move.
    pub player: SeatHolder,
    /// Side that moved.
    pub color: Color,
    /// The move.
    #[serde(rename = "move")]
    pub mv: Move,
    /// How the engine classified it.
    pub outcome: MoveOutcome,
    /// Authoritative state after the move.
    pub state: GameState,
}

/// A legal move offered to a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    /// Side that may play it.
    pub color: Color,
    /// The move.
    #[serde(rename = "move")]
    pub mv: Move,
    /// Its classification.
    pub outcome: MoveOutcome,
}

/// Read-only projection of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session ID.
    pub session_id: SessionId,
    /// Authoritative state.
    pub state: GameState,
    /// Text rendering of the board.
    pub board: String,
    /// Everyone who joined, in join order.
    pub participants: Vec<SeatHolder>,
    /// Legal moves for the side to move (both sides when turns are free).
    pub legal_moves: Vec<LegalMove>,
}

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// No session with this ID.
    #[display("Session {} not found", _0)]
    #[from(ignore)]
    NotFound(#[error(not(source))] SessionId),

    /// A session with this ID already exists.
    #[display("Session {} already exists", _0)]
    #[from(ignore)]
    AlreadyExists(#[error(not(source))] SessionId),

    /// No participant in this session holds the given token.
    #[display("Unknown participant")]
    #[from(ignore)]
    UnknownParticipant,

    /// The session has no free seat and no room for another spectator.
    #[display("Session {} is full", _0)]
    #[from(ignore)]
    SessionFull(#[error(not(source))] SessionId),

    /// The participant's seat does not allow moving `claimed`.
    #[display("Participant {} (seat {:?}) may not move for {}", name, seat, claimed)]
    #[from(ignore)]
    NotAuthorized {
        /// Who asked.
        name: String,
        /// Their seat.
        seat: Seat,
        /// The color they claimed.
        claimed: Color,
    },

    /// The engine rejected the move.
    #[display("Illegal move: {}", _0)]
    #[from(ignore)]
    Illegal(#[error(not(source))] IllegalReason),

    /// The move names a square off the board.
    #[display("{}", _0)]
    OutOfBounds(OutOfBoundsError),

    /// The transition failed after validation passed.
    #[display("{}", _0)]
    Transition(TransitionError),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A game session with its participants and broadcast channel.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    state: GameState,
    participants: Vec<Participant>,
    max_spectators: usize,
    events: broadcast::Sender<SyncEvent>,
}

impl GameSession {
    /// Creates a new game session in the starting position.
    #[instrument]
    pub fn new(id: SessionId, rules: RulesConfig, event_buffer: usize) -> Self {
        info!(session_id = %id, ?rules, "Creating new game session");
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            id,
            state: GameState::initial(rules),
            participants: Vec::new(),
            max_spectators: DEFAULT_MAX_SPECTATORS,
            events,
        }
    }

    /// Limits how many spectators may join.
    pub fn with_max_spectators(mut self, max_spectators: usize) -> Self {
        self.max_spectators = max_spectators;
        self
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current authoritative state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Participants in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Seats a new participant.
    ///
    /// The first joiner plays White, the second Black, later joiners
    /// spectate until the spectator limit is reached.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn join(&mut self, name: String) -> Result<Participant, SessionError> {
        let taken = |seat: Seat| self.participants.iter().any(|p| p.seat == seat);
        let seat = Color::iter()
            .map(Seat::from)
            .find(|seat| !taken(*seat))
            .unwrap_or(Seat::Spectator);

        if seat == Seat::Spectator {
            let spectators = self
                .participants
                .iter()
                .filter(|p| p.seat == Seat::Spectator)
                .count();
            if spectators >= self.max_spectators {
                warn!(spectators, "Rejected join, session full");
                return Err(SessionError::SessionFull(self.id.clone()));
            }
        }

        let id = loop {
            let candidate = participant_token();
            if self.participant(&candidate).is_none() {
                break candidate;
            }
        };
        let participant = Participant::new(id, name, seat);
        info!(name = %participant.name, ?seat, "Participant joined");
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Looks up a participant by token.
    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Authorizes, validates, commits, and broadcasts a move.
    ///
    /// On any error the state is unchanged and nothing is broadcast.
    #[instrument(skip(self, participant_id), fields(session_id = %self.id, version = self.state.version()))]
    pub fn submit_move(
        &mut self,
        participant_id: &str,
        claimed: Color,
        mv: Move,
    ) -> Result<SyncEvent, SessionError> {
        let player = self
            .participant(participant_id)
            .map(SeatHolder::from)
            .ok_or_else(|| {
                warn!("Unknown participant attempted move");
                SessionError::UnknownParticipant
            })?;

        if player.seat.color() != Some(claimed) {
            warn!(name = %player.name, seat = ?player.seat, %claimed, "Participant claimed a color they do not hold");
            return Err(SessionError::NotAuthorized {
                name: player.name,
                seat: player.seat,
                claimed,
            });
        }

        let outcome = evaluate_move(&self.state, mv, claimed)?;
        if let MoveOutcome::Illegal(reason) = outcome {
            warn!(name = %player.name, %mv, %reason, "Rejected illegal move");
            return Err(SessionError::Illegal(reason));
        }

        self.state = apply_move(&self.state, mv)?;

        let event = SyncEvent {
            session_id: self.id.clone(),
            version: self.state.version(),
            player,
            color: claimed,
            mv,
            outcome,
            state: self.state.clone(),
        };

        // No subscribers is not an error; the move is still committed.
        let receivers = self.events.send(event.clone()).unwrap_or(0);
        info!(name = %event.player.name, %mv, %outcome, receivers, "Move committed");
        Ok(event)
    }

    /// Subscribes to accepted moves from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Read-only projection of the session.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn snapshot(&self) -> SessionSnapshot {
        let movers: Vec<Color> = match self.state.turn() {
            Some(color) => vec![color],
            None => Color::iter().collect(),
        };
        let legal_moves = movers
            .into_iter()
            .flat_map(|color| {
                legal_moves(&self.state, color)
                    .into_iter()
                    .map(move |(mv, outcome)| LegalMove { color, mv, outcome })
            })
            .collect();

        SessionSnapshot {
            session_id: self.id.clone(),
            state: self.state.clone(),
            board: self.state.board().display(),
            participants: self.participants.iter().map(SeatHolder::from).collect(),
            legal_moves,
        }
    }
}

/// Manages all game sessions.
///
/// Cloning is cheap and every clone shares the same sessions. The session
/// map lock is only held to look up, insert, or remove a session; moves
/// lock the individual session.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
    next_id: Arc<AtomicU64>,
    rules: RulesConfig,
    event_buffer: usize,
    max_spectators: usize,
}

impl SessionManager {
    /// Creates a session manager whose sessions use the given rules.
    #[instrument]
    pub fn new(rules: RulesConfig, event_buffer: usize) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            rules,
            event_buffer,
            max_spectators: DEFAULT_MAX_SPECTATORS,
        }
    }

    /// Limits how many spectators may join each new session.
    pub fn with_max_spectators(mut self, max_spectators: usize) -> Self {
        self.max_spectators = max_spectators;
        self
    }

    /// Creates a new game session.
    ///
    /// Generates an ID when none is given.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: Option<SessionId>) -> Result<SessionId, SessionError> {
        let mut sessions = lock(&self.sessions);

        let id = match id {
            Some(id) => id,
            None => loop {
                let candidate = format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
                if !sessions.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }

        let session = GameSession::new(id.clone(), self.rules, self.event_buffer)
            .with_max_spectators(self.max_spectators);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    fn session(&self, id: &str) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        lock(&self.sessions).get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })
    }

    /// Ends a session, dropping its state.
    ///
    /// Subscribers see their stream close.
    #[instrument(skip(self))]
    pub fn end_session(&self, id: &str) -> Result<(), SessionError> {
        lock(&self.sessions)
            .remove(id)
            .map(|_| info!(session_id = id, "Session ended"))
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Lists session IDs in sorted order.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Seats a participant in a session.
    #[instrument(skip(self))]
    pub fn join(&self, session_id: &str, name: String) -> Result<Participant, SessionError> {
        let session = self.session(session_id)?;
        let participant = lock(&session).join(name)?;
        Ok(participant)
    }

    /// Authorizes, validates, commits, and broadcasts a move.
    #[instrument(skip(self, participant_id))]
    pub fn submit_move(
        &self,
        session_id: &str,
        participant_id: &str,
        claimed: Color,
        mv: Move,
    ) -> Result<SyncEvent, SessionError> {
        let session = self.session(session_id)?;
        let mut session = lock(&session);
        session.submit_move(participant_id, claimed, mv)
    }

    /// Returns a snapshot of a session.
    #[instrument(skip(self))]
    pub fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, SessionError> {
        let session = self.session(session_id)?;
        let snapshot = lock(&session).snapshot();
        Ok(snapshot)
    }

    /// Subscribes to a session's accepted moves.
    #[instrument(skip(self))]
    pub fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<broadcast::Receiver<SyncEvent>, SessionError> {
        let session = self.session(session_id)?;
        let receiver = lock(&session).subscribe();
        Ok(receiver)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(RulesConfig::default(), 64)
    }
}
