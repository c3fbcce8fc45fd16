//! Read-only access to marketplace processes through compute unit dry runs

use crate::constants::*;
use crate::error::ApiError;
use crate::types::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Remote reads used by the views
#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn get_activity(&self, query: &ActivityQuery) -> Result<ActivityResponse, ApiError>;
    async fn get_registry_profiles(&self, profile_ids: &[String]) -> Result<Vec<Profile>, ApiError>;
    async fn get_asset_ids_by_user(&self, profile_id: &str) -> Result<Vec<String>, ApiError>;
    async fn get_asset_state(&self, asset_id: &str) -> Result<AssetState, ApiError>;
}

/// Dry-run client for AO processes
pub struct AoClient {
    client: reqwest::Client,
    cu_url: String,
    ucm_process: String,
    registry_process: String,
}

impl AoClient {
    pub fn new(cu_url: &str, ucm_process: &str, registry_process: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            cu_url: cu_url.trim_end_matches('/').to_string(),
            ucm_process: ucm_process.to_string(),
            registry_process: registry_process.to_string(),
        }
    }

    /// Dry-run `action` against `process_id` and decode the first reply.
    async fn read<T: DeserializeOwned>(
        &self,
        process_id: &str,
        action: &str,
        data: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}/dry-run?process-id={}", self.cu_url, process_id);
        let body = dry_run_body(process_id, action, data.as_ref());

        debug!(process = process_id, action, "Dry run");
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                process: process_id.to_string(),
                status: response.status(),
            });
        }

        let result: DryRunResult = response.json().await?;
        decode_dry_run(process_id, action, result)
    }
}

#[async_trait]
impl MarketApi for AoClient {
    async fn get_activity(&self, query: &ActivityQuery) -> Result<ActivityResponse, ApiError> {
        let data = serde_json::to_value(query).map_err(|source| ApiError::Decode {
            action: ACTION_GET_ACTIVITY.to_string(),
            source,
        })?;
        self.read(&self.ucm_process, ACTION_GET_ACTIVITY, Some(data))
            .await
    }

    async fn get_registry_profiles(&self, profile_ids: &[String]) -> Result<Vec<Profile>, ApiError> {
        if profile_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.read(
            &self.registry_process,
            ACTION_GET_PROFILES,
            Some(json!({ "ProfileIds": profile_ids })),
        )
        .await
    }

    async fn get_asset_ids_by_user(&self, profile_id: &str) -> Result<Vec<String>, ApiError> {
        let info: ProfileInfo = self.read(profile_id, ACTION_INFO, None).await?;
        Ok(info.assets.into_iter().map(|a| a.id).collect())
    }

    async fn get_asset_state(&self, asset_id: &str) -> Result<AssetState, ApiError> {
        self.read(asset_id, ACTION_INFO, None).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DryRunResult {
    #[serde(default)]
    messages: Vec<DryRunMessage>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DryRunMessage {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
    value: String,
}

fn dry_run_body(process_id: &str, action: &str, data: Option<&Value>) -> Value {
    json!({
        "Id": "1234",
        "Target": process_id,
        "Owner": "1234",
        "Anchor": "0",
        "Data": data.map(|d| d.to_string()).unwrap_or_else(|| "1984".to_string()),
        "Tags": [
            { "name": "Action", "value": action },
            { "name": "Data-Protocol", "value": "ao" },
            { "name": "Type", "value": "Message" },
            { "name": "Variant", "value": "ao.TN.1" },
        ],
    })
}

/// First message's `Data` as JSON, falling back to its tags as an object.
fn decode_dry_run<T: DeserializeOwned>(
    process_id: &str,
    action: &str,
    result: DryRunResult,
) -> Result<T, ApiError> {
    if let Some(error) = result.error.filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(ApiError::Process {
            process: process_id.to_string(),
            message,
        });
    }

    let message = result
        .messages
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::EmptyResponse {
            process: process_id.to_string(),
            action: action.to_string(),
        })?;

    let payload = match message.data {
        Some(Value::String(s)) if !s.is_empty() => {
            serde_json::from_str(&s).map_err(|source| ApiError::Decode {
                action: action.to_string(),
                source,
            })?
        }
        Some(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::Object(
            message
                .tags
                .into_iter()
                .map(|t| (t.name, Value::String(t.value)))
                .collect(),
        ),
    };

    serde_json::from_value(payload).map_err(|source| ApiError::Decode {
        action: action.to_string(),
        source,
    })
}

#[cfg(test)]
pub mod mock {
    //! In-memory `MarketApi` for view tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockApi {
        pub activity: Mutex<Option<Value>>,
        pub profiles: Mutex<Vec<Profile>>,
        pub assets: Mutex<HashMap<String, Vec<String>>>,
        pub asset_states: Mutex<HashMap<String, AssetState>>,
        pub fail_activity: bool,
        pub fail_profiles: bool,
        pub fail_assets: bool,
        pub profile_calls: Mutex<Vec<Vec<String>>>,
        pub asset_calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        pub fn with_activity(activity: Value) -> Self {
            Self {
                activity: Mutex::new(Some(activity)),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MarketApi for MockApi {
        async fn get_activity(&self, _query: &ActivityQuery) -> Result<ActivityResponse, ApiError> {
            if self.fail_activity {
                return Err(ApiError::EmptyResponse {
                    process: "ucm".into(),
                    action: ACTION_GET_ACTIVITY.into(),
                });
            }
            let value = self.activity.lock().unwrap().clone().unwrap_or(json!({}));
            serde_json::from_value(value).map_err(|source| ApiError::Decode {
                action: ACTION_GET_ACTIVITY.into(),
                source,
            })
        }

        async fn get_registry_profiles(
            &self,
            profile_ids: &[String],
        ) -> Result<Vec<Profile>, ApiError> {
            self.profile_calls.lock().unwrap().push(profile_ids.to_vec());
            if self.fail_profiles {
                return Err(ApiError::Process {
                    process: "registry".into(),
                    message: "unavailable".into(),
                });
            }
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .filter(|p| profile_ids.contains(&p.id))
                .cloned()
                .collect())
        }

        async fn get_asset_ids_by_user(&self, profile_id: &str) -> Result<Vec<String>, ApiError> {
            self.asset_calls.lock().unwrap().push(profile_id.to_string());
            if self.fail_assets {
                return Err(ApiError::EmptyResponse {
                    process: profile_id.into(),
                    action: ACTION_INFO.into(),
                });
            }
            Ok(self
                .assets
                .lock()
                .unwrap()
                .get(profile_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn get_asset_state(&self, asset_id: &str) -> Result<AssetState, ApiError> {
            Ok(self
                .asset_states
                .lock()
                .unwrap()
                .get(asset_id)
                .cloned()
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(json: Value) -> DryRunResult {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn decodes_json_string_data() {
        let res = result(json!({
            "Messages": [{ "Data": "{\"ListedOrders\":[],\"ExecutedOrders\":[]}", "Tags": [] }]
        }));
        let activity: ActivityResponse = decode_dry_run("ucm", ACTION_GET_ACTIVITY, res).unwrap();
        assert_eq!(activity.listed_orders.map(|o| o.len()), Some(0));
    }

    #[test]
    fn falls_back_to_tags_without_data() {
        let res = result(json!({
            "Messages": [{ "Tags": [
                { "name": "Name", "value": "Token" },
                { "name": "Denomination", "value": "12" }
            ] }]
        }));
        let state: AssetState = decode_dry_run("asset", ACTION_INFO, res).unwrap();
        assert_eq!(state.name.as_deref(), Some("Token"));
        assert_eq!(state.denomination, Some(12));
    }

    #[test]
    fn reports_process_error() {
        let res = result(json!({ "Messages": [], "Error": "out of memory" }));
        let err = decode_dry_run::<AssetState>("asset", ACTION_INFO, res).unwrap_err();
        assert!(matches!(err, ApiError::Process { ref message, .. } if message == "out of memory"));
    }

    #[test]
    fn reports_empty_response() {
        let res = result(json!({ "Messages": [] }));
        let err = decode_dry_run::<AssetState>("asset", ACTION_INFO, res).unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse { .. }));
    }

    #[test]
    fn dry_run_body_carries_action_and_data() {
        let body = dry_run_body("pid", "Get-Activity", Some(&json!({ "Address": "a" })));
        assert_eq!(body["Target"], "pid");
        assert_eq!(body["Tags"][0]["value"], "Get-Activity");
        assert_eq!(body["Data"], "{\"Address\":\"a\"}");
    }

    #[test]
    fn profiles_decode_from_registry_shape() {
        let res = result(json!({
            "Messages": [{ "Data": "[{\"ProfileId\":\"p1\",\"Username\":\"alice\"}]" }]
        }));
        let profiles: Vec<Profile> = decode_dry_run("registry", ACTION_GET_PROFILES, res).unwrap();
        assert_eq!(profiles[0].id, "p1");
        assert_eq!(profiles[0].name(), Some("alice"));
    }
}
