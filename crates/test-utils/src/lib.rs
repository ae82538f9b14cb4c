//! Test helpers shared across bankbot crates.

pub mod gateway;

pub use gateway::ScriptedGateway;
