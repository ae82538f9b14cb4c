//! Account validation action.

use async_trait::async_trait;
use bankbot_core::action::{ActionHandler, ActionKind, ActionResult};
use bankbot_core::error::ActionError;
use std::sync::Arc;
use tracing::debug;

use crate::bank::{ACCOUNT_VALID, BankDirectory};

/// Checks the `value` parameter against the account allow-list.
pub struct ValidateAccountAction {
    bank: Arc<BankDirectory>,
}

impl ValidateAccountAction {
    pub fn new(bank: Arc<BankDirectory>) -> Self {
        Self { bank }
    }
}

#[async_trait]
impl ActionHandler for ValidateAccountAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ValidateAccount
    }

    fn description(&self) -> &str {
        "Validate an account number against the list of known accounts"
    }

    async fn execute(
        &self,
        parameters: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ActionResult, ActionError> {
        let value = parameters
            .get("value")
            .ok_or_else(|| ActionError::InvalidArguments {
                action: self.kind().to_string(),
                reason: "missing 'value' parameter".into(),
            })?;

        let tag = self.bank.validate_value(value);
        debug!(result = tag, "Account checked against allow-list");
        Ok(ActionResult::new(self.kind(), tag).with_data(serde_json::json!({
            "value": value,
            "valid": tag == ACCOUNT_VALID,
        })))
    }
}
