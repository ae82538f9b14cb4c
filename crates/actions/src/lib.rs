//! Built-in backend action handlers for bankbot.
//!
//! Actions run when the dialog asks for backend data before replying:
//! validate an account number and locate a branch. Both are backed by
//! [`bank::BankDirectory`], the same stand-in the `/bank/*` endpoints use.

pub mod bank;
pub mod locate_branch;
pub mod validate_account;

use std::sync::Arc;

use bankbot_core::action::ActionRegistry;

pub use bank::BankDirectory;

/// Create a registry with every built-in action.
pub fn default_registry(bank: Arc<BankDirectory>) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(validate_account::ValidateAccountAction::new(bank.clone())));
    registry.register(Box::new(locate_branch::LocateBranchAction::new(bank)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankbot_core::action::ActionKind;

    #[test]
    fn default_registry_covers_every_kind() {
        let registry = default_registry(Arc::new(BankDirectory::new([123])));
        assert_eq!(registry.kinds(), ActionKind::ALL.to_vec());
        for kind in ActionKind::ALL {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }
}
