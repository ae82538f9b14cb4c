//! Context merging: overlay the user profile onto the session context.

use bankbot_core::assistant::{MergedContext, SessionContext};
use bankbot_core::profile::ProfileStore;

/// Build the context for one engine call.
///
/// Starts from the client's session context (absent means empty) and
/// writes every profile field on top, so profile values win on key
/// collisions. The overlay is shallow: a colliding nested object is
/// replaced, not combined.
pub fn merge(session: Option<&SessionContext>, profile: &ProfileStore) -> MergedContext {
    let mut merged = session.cloned().unwrap_or_default();
    for (key, value) in profile.fields() {
        merged.insert(key.clone(), value.clone());
    }
    MergedContext::from_map(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankbot_core::profile::ProfileRecord;
    use serde_json::json;

    fn profile() -> ProfileStore {
        ProfileStore::new(ProfileRecord::default()).unwrap()
    }

    fn session(value: serde_json::Value) -> SessionContext {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn absent_context_equals_empty_context() {
        let profile = profile();
        assert_eq!(merge(None, &profile), merge(Some(&SessionContext::new()), &profile));
        assert_eq!(merge(None, &profile).as_map(), profile.fields());
    }

    #[test]
    fn session_keys_survive_and_profile_keys_win() {
        let profile = profile();
        let contexts = [
            json!({}),
            json!({"conversation_id": "c-1", "system": {"dialog_turn_counter": 3}}),
            json!({"firstName": "Mallory", "skip_user_input": true}),
            json!({"org": {"orgId": "EVIL", "extra": 1}, "acc_number": 123}),
        ];

        for raw in contexts {
            let session = session(raw);
            let merged = merge(Some(&session), &profile);

            for (key, value) in profile.fields() {
                assert_eq!(merged.get(key), Some(value), "profile key {key}");
            }
            for (key, value) in &session {
                if !profile.fields().contains_key(key) {
                    assert_eq!(merged.get(key), Some(value), "session key {key}");
                }
            }
            let expected_len = profile.fields().len()
                + session.keys().filter(|k| !profile.fields().contains_key(*k)).count();
            assert_eq!(merged.len(), expected_len);
        }
    }

    #[test]
    fn nested_objects_are_replaced_not_combined() {
        let profile = profile();
        let session = session(json!({"org": {"orgId": "EVIL", "extra": 1}}));
        let merged = merge(Some(&session), &profile);
        assert_eq!(merged.get("org"), Some(&json!({"groupId": 156, "orgId": "US-642"})));
    }

    #[test]
    fn session_is_not_modified() {
        let profile = profile();
        let session = session(json!({"firstName": "Mallory"}));
        let _ = merge(Some(&session), &profile);
        assert_eq!(session["firstName"], "Mallory");
    }

    #[test]
    fn alternate_profile_is_used() {
        let record = ProfileRecord {
            avatar_name: "Robin".into(),
            ..ProfileRecord::default()
        };
        let profile = ProfileStore::new(record).unwrap();
        let merged = merge(None, &profile);
        assert_eq!(merged.get("avatarName"), Some(&json!("Robin")));
    }
}
