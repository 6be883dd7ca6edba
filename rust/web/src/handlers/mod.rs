pub mod game;
pub mod health;

pub use game::{
    ActionRequest, CreateSessionRequest, apply_action, create_session, delete_session,
    get_session, pause_session, resume_session, step_session,
};
pub use health::health;
