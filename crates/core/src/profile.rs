//! Simulated user profile, the identity merged into every request.
//!
//! The profile stands in for an application-maintained user record. It is
//! built once at startup (from config) and shared read-only; every
//! conversational turn carries its fields to the assistant engine so the
//! dialog can greet the user, reference past interactions, and call backend
//! functions with the private credentials.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The static profile attributes sent as conversational context.
///
/// Keys serialize in camelCase because that is how the dialog skill
/// references them (`$firstName`, `$org.orgId`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub avatar_name: String,
    pub channel: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    /// Offset from GMT in hours, e.g. `"-6"`.
    pub timezone: String,
    pub home_city: String,
    pub home_state: String,
    pub office: String,
    /// Function service key the dialog passes to server-side actions.
    #[serde(
        rename = "ibm_function_credentials",
        default = "default_ibm_function_credentials"
    )]
    pub ibm_function_credentials: String,
    #[serde(default)]
    pub open_requests: u32,
    /// The dialog skill reads this key with its historical spelling.
    #[serde(rename = "enagagement_tone_array", default)]
    pub engagement_tone_array: Vec<String>,
    pub org: Organization,
    /// Most recent first.
    #[serde(default)]
    pub previous_interactions: Vec<Interaction>,
    #[serde(default)]
    pub private: PrivateData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub group_id: u32,
    pub org_id: String,
}

/// One past conversation and the intents detected in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub date_of_interaction: String,
    #[serde(default)]
    pub intents: Vec<String>,
}

/// Context the engine keeps out of dialog output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateData {
    #[serde(default)]
    pub function_creds: FunctionCredentials,
}

/// Credentials the engine uses to invoke backend functions.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for FunctionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCredentials")
            .field("user", &self.user)
            .field(
                "password",
                &self.password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn default_ibm_function_credentials() -> String {
    "{'api_key':'username:password'}".into()
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            avatar_name: "Sam".into(),
            channel: "web".into(),
            user_id: "swamchan".into(),
            first_name: "Swami".into(),
            last_name: "Chandrassekaran".into(),
            email: None,
            phone: "+1 972-123-4567".into(),
            timezone: "-6".into(),
            home_city: "Dallas".into(),
            home_state: "TX".into(),
            office: "123 Spooner Street".into(),
            ibm_function_credentials: default_ibm_function_credentials(),
            open_requests: 1,
            engagement_tone_array: vec![],
            org: Organization {
                group_id: 156,
                org_id: "US-642".into(),
            },
            previous_interactions: vec![
                Interaction {
                    date_of_interaction: "10/21/2018".into(),
                    intents: vec!["Submit_Service_Request".into(), "Handle_ChitChat".into()],
                },
                Interaction {
                    date_of_interaction: "10/15/2018".into(),
                    intents: vec!["Reset_Password".into(), "Handle_ChitChat".into()],
                },
            ],
            private: PrivateData::default(),
        }
    }
}

/// Read-only holder of the profile, injected into the message pipeline.
///
/// The record is flattened to a JSON object once, at construction, so each
/// request only clones the prepared fields.
#[derive(Clone)]
pub struct ProfileStore {
    record: ProfileRecord,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl ProfileStore {
    pub fn new(record: ProfileRecord) -> Result<Self> {
        let fields = match serde_json::to_value(&record)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Ok(Self { record, fields })
    }

    /// The profile as top-level context keys.
    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("record", &self.record)
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_fields_use_camel_case() {
        let store = ProfileStore::new(ProfileRecord::default()).unwrap();
        let fields = store.fields();
        assert_eq!(fields["avatarName"], "Sam");
        assert_eq!(fields["firstName"], "Swami");
        assert_eq!(fields["org"]["orgId"], "US-642");
        assert_eq!(fields["org"]["groupId"], 156);
        assert_eq!(
            fields["previousInteractions"][0]["intents"][0],
            "Submit_Service_Request"
        );
        assert!(!fields.contains_key("email"));
        assert_eq!(
            fields["ibm_function_credentials"],
            "{'api_key':'username:password'}"
        );
        assert_eq!(fields["enagagement_tone_array"], serde_json::json!([]));
        assert!(!fields.contains_key("engagementToneArray"));
    }

    #[test]
    fn unset_credentials_are_omitted() {
        let store = ProfileStore::new(ProfileRecord::default()).unwrap();
        let creds = &store.fields()["private"]["function_creds"];
        assert!(creds.as_object().unwrap().is_empty());
    }

    #[test]
    fn credentials_are_serialized_but_not_debug_printed() {
        let mut record = ProfileRecord::default();
        record.private.function_creds = FunctionCredentials {
            user: Some("fn-user".into()),
            password: Some("s3cret".into()),
        };
        let store = ProfileStore::new(record).unwrap();
        assert_eq!(store.fields()["private"]["function_creds"]["password"], "s3cret");

        let debug = format!("{store:?}");
        assert!(debug.contains("fn-user"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn profile_parses_from_json() {
        let record: ProfileRecord = serde_json::from_value(serde_json::json!({
            "avatarName": "Alex",
            "channel": "sms",
            "userId": "alex01",
            "firstName": "Alex",
            "lastName": "Doe",
            "phone": "+1 555-0100",
            "timezone": "0",
            "homeCity": "London",
            "homeState": "LDN",
            "office": "1 Main St",
            "org": {"groupId": 1, "orgId": "UK-1"}
        }))
        .unwrap();
        assert_eq!(record.avatar_name, "Alex");
        assert_eq!(record.open_requests, 0);
        assert_eq!(record.ibm_function_credentials, "{'api_key':'username:password'}");
        assert!(record.previous_interactions.is_empty());
        assert_eq!(record.private, PrivateData::default());
    }
}
