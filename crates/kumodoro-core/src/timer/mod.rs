mod phase;
mod session;
mod ticker;

pub use phase::{Durations, Phase, LONG_BREAK_EVERY};
pub use session::Session;
pub use ticker::run_while_running;
