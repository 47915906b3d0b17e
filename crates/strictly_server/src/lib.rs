//! Strictly Server - session synchronization for strictly_checkers
//!
//! Participants join a session, propose moves, and receive every accepted
//! move. The server never relays a move the rules engine has not accepted.
//!
//! # Architecture
//!
//! - **Session**: per-session authoritative state and broadcast channel
//! - **Server**: JSON/SSE HTTP interface (axum)
//! - **Config**: TOML configuration with environment overrides
//!
//! # Example
//!
//! ```
//! use strictly_checkers::{Color, Move, Square};
//! use strictly_server::SessionManager;
//!
//! let sessions = SessionManager::default();
//! let id = sessions.create_session(None)?;
//! let alice = sessions.join(&id, "alice".to_string())?;
//!
//! let mv = Move::new(Square::new(5, 0), Square::new(4, 1));
//! let event = sessions.submit_move(&id, &alice.id, Color::White, mv)?;
//! assert_eq!(event.version, 1);
//! # Ok::<(), strictly_server::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod server;
pub mod session;

pub use config::{ConfigError, ServerConfig};
pub use server::{
    router, serve, ApiError, CreateSessionRequest, CreateSessionResponse, ErrorBody, JoinRequest,
    MoveRequest,
};
pub use session::{
    GameSession, LegalMove, Participant, ParticipantId, Seat, SeatHolder, SessionError, SessionId,
    SessionManager, SessionSnapshot, SyncEvent, DEFAULT_MAX_SPECTATORS,
};
