//! Direct banking endpoints used by the web client.
//!
//! - `GET /bank/validate?value=<number>` — account allow-list check
//! - `GET /bank/locate`                  — branch lookup stub

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::SharedState;

pub fn bank_router() -> Router<SharedState> {
    Router::new()
        .route("/bank/validate", get(validate_handler))
        .route("/bank/locate", get(locate_handler))
}

#[derive(Debug, Deserialize)]
struct ValidateQuery {
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct BankResponse {
    result: &'static str,
}

async fn validate_handler(
    State(state): State<SharedState>,
    Query(query): Query<ValidateQuery>,
) -> Json<BankResponse> {
    let result = state.bank.validate_raw(query.value.as_deref());
    info!(result, "Account validation");
    Json(BankResponse { result })
}

async fn locate_handler(State(state): State<SharedState>) -> Json<BankResponse> {
    Json(BankResponse {
        result: state.bank.locate(),
    })
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::test_support::{ScriptedGateway, body_json, get_request, test_state};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_result(uri: &str) -> serde_json::Value {
        let gateway = Arc::new(ScriptedGateway::reply(serde_json::json!({})));
        let app = build_router(test_state(gateway, None));
        let response = app.oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["result"].clone()
    }

    #[tokio::test]
    async fn listed_accounts_are_valid() {
        for value in ["123", "456", "789"] {
            let uri = format!("/bank/validate?value={value}");
            assert_eq!(get_result(&uri).await, "acc123valid");
        }
    }

    #[tokio::test]
    async fn unlisted_account_is_invalid() {
        assert_eq!(get_result("/bank/validate?value=999").await, "acc123invalid");
    }

    #[tokio::test]
    async fn non_numeric_or_missing_value_is_invalid() {
        assert_eq!(get_result("/bank/validate?value=abc").await, "acc123invalid");
        assert_eq!(get_result("/bank/validate?value=").await, "acc123invalid");
        assert_eq!(get_result("/bank/validate").await, "acc123invalid");
    }

    #[tokio::test]
    async fn locate_ignores_query() {
        assert_eq!(get_result("/bank/locate").await, "zip123retrieved");
        assert_eq!(get_result("/bank/locate?zip=75201").await, "zip123retrieved");
    }
}
