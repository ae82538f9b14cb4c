//! Stand-in banking back end.
//!
//! Account validation is a membership check against a fixed allow-list;
//! branch lookup is a stub that always succeeds. Results are reported as
//! the tags the dialog skill is trained on.

use std::collections::HashSet;

/// The account number is on the allow-list.
pub const ACCOUNT_VALID: &str = "acc123valid";
/// The account number is missing, malformed, or unknown.
pub const ACCOUNT_INVALID: &str = "acc123invalid";
/// A branch was found.
pub const BRANCH_RETRIEVED: &str = "zip123retrieved";

#[derive(Debug, Clone)]
pub struct BankDirectory {
    valid_accounts: HashSet<i64>,
}

impl BankDirectory {
    pub fn new(valid_accounts: impl IntoIterator<Item = i64>) -> Self {
        Self {
            valid_accounts: valid_accounts.into_iter().collect(),
        }
    }

    pub fn is_valid_account(&self, number: i64) -> bool {
        self.valid_accounts.contains(&number)
    }

    /// Validate a raw query value. Anything that is not a whole number is invalid.
    pub fn validate_raw(&self, raw: Option<&str>) -> &'static str {
        self.tag(raw.and_then(parse_account_number))
    }

    /// Validate a JSON argument (number or numeric string).
    pub fn validate_value(&self, value: &serde_json::Value) -> &'static str {
        let number = match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_number)),
            serde_json::Value::String(s) => parse_account_number(s),
            _ => None,
        };
        self.tag(number)
    }

    /// Find the nearest branch. Always succeeds.
    pub fn locate(&self) -> &'static str {
        BRANCH_RETRIEVED
    }

    fn tag(&self, number: Option<i64>) -> &'static str {
        match number {
            Some(n) if self.is_valid_account(n) => ACCOUNT_VALID,
            _ => ACCOUNT_INVALID,
        }
    }
}

/// Parse a decimal account number: surrounding whitespace is ignored and
/// `"123.0"` equals `123`; blank, fractional, and non-finite input is rejected.
pub fn parse_account_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(whole_number))
}

fn whole_number(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> BankDirectory {
        BankDirectory::new([123, 456, 789])
    }

    #[test]
    fn allow_listed_account_is_valid() {
        assert_eq!(directory().validate_raw(Some("123")), ACCOUNT_VALID);
        assert_eq!(directory().validate_raw(Some(" 456 ")), ACCOUNT_VALID);
        assert_eq!(directory().validate_raw(Some("789.0")), ACCOUNT_VALID);
    }

    #[test]
    fn other_input_is_invalid() {
        let bank = directory();
        assert_eq!(bank.validate_raw(Some("124")), ACCOUNT_INVALID);
        assert_eq!(bank.validate_raw(Some("12.3")), ACCOUNT_INVALID);
        assert_eq!(bank.validate_raw(Some("abc")), ACCOUNT_INVALID);
        assert_eq!(bank.validate_raw(Some("")), ACCOUNT_INVALID);
        assert_eq!(bank.validate_raw(Some("NaN")), ACCOUNT_INVALID);
        assert_eq!(bank.validate_raw(None), ACCOUNT_INVALID);
    }

    #[test]
    fn json_values() {
        let bank = directory();
        assert_eq!(bank.validate_value(&serde_json::json!(123)), ACCOUNT_VALID);
        assert_eq!(bank.validate_value(&serde_json::json!(123.0)), ACCOUNT_VALID);
        assert_eq!(bank.validate_value(&serde_json::json!("456")), ACCOUNT_VALID);
        assert_eq!(bank.validate_value(&serde_json::json!(999)), ACCOUNT_INVALID);
        assert_eq!(bank.validate_value(&serde_json::json!(true)), ACCOUNT_INVALID);
        assert_eq!(bank.validate_value(&serde_json::json!(null)), ACCOUNT_INVALID);
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let bank = BankDirectory::new([]);
        assert_eq!(bank.validate_raw(Some("123")), ACCOUNT_INVALID);
    }

    #[test]
    fn locate_is_fixed() {
        assert_eq!(directory().locate(), "zip123retrieved");
    }
}
