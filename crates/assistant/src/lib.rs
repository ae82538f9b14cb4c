//! Assistant engine client implementations for bankbot.
//!
//! - [`watson::WatsonAssistant`] — Watson Assistant v1 `message` API over HTTPS

pub mod watson;

pub use watson::{Auth, WatsonAssistant};
