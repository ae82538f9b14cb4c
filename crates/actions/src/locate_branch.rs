//! Branch lookup action, a stub for a real branch directory.

use async_trait::async_trait;
use bankbot_core::action::{ActionHandler, ActionKind, ActionResult};
use bankbot_core::error::ActionError;
use std::sync::Arc;

use crate::bank::BankDirectory;

pub struct LocateBranchAction {
    bank: Arc<BankDirectory>,
}

impl LocateBranchAction {
    pub fn new(bank: Arc<BankDirectory>) -> Self {
        Self { bank }
    }
}

#[async_trait]
impl ActionHandler for LocateBranchAction {
    fn kind(&self) -> ActionKind {
        ActionKind::LocateBranch
    }

    fn description(&self) -> &str {
        "Locate the branch nearest to a zip code"
    }

    async fn execute(
        &self,
        parameters: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ActionResult, ActionError> {
        let result = ActionResult::new(self.kind(), self.bank.locate());
        Ok(match parameters.get("zip") {
            Some(zip) => result.with_data(serde_json::json!({ "zip": zip })),
            None => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_retrieves() {
        let action = LocateBranchAction::new(Arc::new(BankDirectory::new([])));
        let result = action.execute(&serde_json::Map::new()).await.unwrap();
        assert_eq!(result.result, "zip123retrieved");
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn zip_is_echoed() {
        let action = LocateBranchAction::new(Arc::new(BankDirectory::new([])));
        let mut params = serde_json::Map::new();
        params.insert("zip".into(), serde_json::json!("75201"));
        let result = action.execute(&params).await.unwrap();
        assert_eq!(result.result, "zip123retrieved");
        assert_eq!(result.data.unwrap()["zip"], "75201");
    }
}
