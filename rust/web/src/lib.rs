//! # liar_web
//!
//! Interactive Lying/Cheat sessions over JSON/HTTP: one human seat against
//! bots, with step, pause and resume. Sessions live in memory and expire
//! after a period of inactivity.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod session;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{LogEntry, TestLogSubscriber, init_logging, init_test_logging};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{GameStateResponse, SessionConfig, SessionError, SessionId, SessionManager};
