//! Shared fixtures for gateway tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;

use bankbot_actions::BankDirectory;
use bankbot_core::assistant::WorkspaceId;
use bankbot_core::profile::{ProfileRecord, ProfileStore};
use bankbot_pipeline::MessagePipeline;
pub use bankbot_test_utils::ScriptedGateway;

use crate::{GatewayState, SharedState};

pub fn test_state_with(
    gateway: Arc<ScriptedGateway>,
    workspace: Option<&str>,
    expose_engine_errors: bool,
) -> SharedState {
    let bank = Arc::new(BankDirectory::new([123, 456, 789]));
    let pipeline = MessagePipeline::new(
        gateway,
        Arc::new(ProfileStore::new(ProfileRecord::default()).unwrap()),
        Arc::new(bankbot_actions::default_registry(bank.clone())),
        WorkspaceId::parse(workspace),
    );
    Arc::new(GatewayState {
        pipeline: Arc::new(pipeline),
        bank,
        expose_engine_errors,
    })
}

pub fn test_state(gateway: Arc<ScriptedGateway>, workspace: Option<&str>) -> SharedState {
    test_state_with(gateway, workspace, true)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
