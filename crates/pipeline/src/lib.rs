//! The message pipeline at the center of bankbot.
//!
//! Each client turn follows a fixed sequence:
//!
//! 1. **Check** the workspace is configured (otherwise reply with setup instructions)
//! 2. **Merge** the client's session context with the user profile
//! 3. **Send** the turn to the assistant engine
//! 4. **Dispatch** at most one backend action named in the engine's output
//! 5. **Return** the (possibly enriched) reply
//!
//! There is no looping: an action's result is attached to the reply and
//! the dialog continues on the client's next turn.

pub mod context;
pub mod dispatch;
pub mod pipeline;

pub use context::merge;
pub use dispatch::ActionDispatcher;
pub use pipeline::{ClientMessage, MessagePipeline, PipelineError, UNCONFIGURED_MESSAGE};
