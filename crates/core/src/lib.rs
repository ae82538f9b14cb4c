//! # bankbot core
//!
//! Domain types, traits, and error definitions for the bankbot assistant
//! bridge. This crate has **no framework dependencies**: it defines the
//! model that the gateway, pipeline, and action crates implement against.
//!
//! ## Layout
//!
//! - [`profile`]: the simulated user profile merged into every request
//! - [`assistant`]: the assistant engine contract and its wire types
//! - [`action`]: backend actions, their closed identifier set, and the registry
//! - [`error`]: error types for each bounded context

pub mod error;
pub mod profile;
pub mod assistant;
pub mod action;

// Re-export key types at crate root for ergonomics
pub use error::{ActionError, Error, GatewayError, Result};
pub use profile::{ProfileRecord, ProfileStore};
pub use assistant::{
    AssistantGateway, AssistantResponse, MergedContext, MessageInput, MessageRequest,
    SessionContext, WorkspaceId,
};
pub use action::{
    ActionHandler, ActionKind, ActionMarker, ActionRegistry, ActionRequest, ActionResult,
};
