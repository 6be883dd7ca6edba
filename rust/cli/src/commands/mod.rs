//! Command handler modules for the liar CLI.
//!
//! Each command lives in its own module with the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in, never `println!`
//! - Errors propagated via the `CliError` enum; the message is also written
//!   to `err` where the user needs more context than the exit code

pub mod cfg;
pub mod deal;
pub mod replay;
pub mod sim;
pub mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use replay::handle_replay_command;
pub use sim::handle_sim_command;
pub use verify::handle_verify_command;
