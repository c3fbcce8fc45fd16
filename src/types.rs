//! Common types and data structures

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of an activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Listed,
    Sold,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Listed => "Listed",
            EventKind::Sold => "Sold",
        }
    }
}

/// Order event shown in the activity table
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub order_id: String,
    pub dominant_token: String,
    pub swap_token: String,
    pub price: String,
    pub quantity: String,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub timestamp: i64,
    pub kind: EventKind,
}

/// Order event with counterparty profiles merged on
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOrder {
    pub event: OrderEvent,
    pub sender_profile: Option<Profile>,
    pub receiver_profile: Option<Profile>,
}

/// Activity sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    NewToOld,
    OldToNew,
}

impl SortOption {
    pub const ALL: [SortOption; 2] = [SortOption::NewToOld, SortOption::OldToNew];

    pub fn label(self) -> &'static str {
        match self {
            SortOption::NewToOld => "Newest to oldest",
            SortOption::OldToNew => "Oldest to newest",
        }
    }
}

/// Scope of an activity request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityQuery {
    #[serde(rename = "AssetIds", skip_serializing_if = "Option::is_none")]
    pub asset_ids: Option<Vec<String>>,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ActivityQuery {
    pub fn for_asset(id: impl Into<String>) -> Self {
        Self {
            asset_ids: Some(vec![id.into()]),
            address: None,
        }
    }

    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            asset_ids: None,
            address: Some(address.into()),
        }
    }
}

/// Raw order record as returned by the order-book process
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawOrder {
    pub order_id: String,
    pub dominant_token: String,
    pub swap_token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    #[serde(deserialize_with = "string_or_number")]
    pub quantity: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    pub timestamp: i64,
}

/// `Get-Activity` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityResponse {
    #[serde(default)]
    pub listed_orders: Option<Vec<RawOrder>>,
    #[serde(default)]
    pub executed_orders: Option<Vec<RawOrder>>,
}

/// Registry display metadata for an address
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(rename = "ProfileId", alias = "id")]
    pub id: String,
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
    #[serde(rename = "DisplayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "ProfileImage", default)]
    pub avatar: Option<String>,
}

impl Profile {
    /// Best available human-readable name
    pub fn name(&self) -> Option<&str> {
        let display = self.display_name.as_deref().filter(|n| !n.is_empty());
        display.or_else(|| self.username.as_deref().filter(|n| !n.is_empty()))
    }
}

/// Asset info as reported by the asset process
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetState {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "optional_u32")]
    pub denomination: Option<u32>,
}

/// Owned asset entry in a profile's `Info`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileAsset {
    pub id: String,
}

/// Profile process `Info` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileInfo {
    #[serde(default)]
    pub assets: Vec<ProfileAsset>,
}

/// Page scroll state controlled by open panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Auto,
    Hidden,
}

/// Amounts arrive either as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_order_accepts_numeric_and_string_amounts() {
        let json = r#"{
            "OrderId": "o1",
            "DominantToken": "asset",
            "SwapToken": "token",
            "Price": 1500,
            "Quantity": "3",
            "Sender": "addr",
            "Timestamp": 1717000000000
        }"#;
        let order: RawOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.price, "1500");
        assert_eq!(order.quantity, "3");
        assert_eq!(order.sender.as_deref(), Some("addr"));
        assert!(order.receiver.is_none());
    }

    #[test]
    fn activity_response_tolerates_missing_classes() {
        let response: ActivityResponse = serde_json::from_str("{}").unwrap();
        assert!(response.listed_orders.is_none());
        assert!(response.executed_orders.is_none());
    }

    #[test]
    fn asset_state_parses_string_denomination() {
        let state: AssetState =
            serde_json::from_str(r#"{"Name":"Art","Ticker":"ART","Denomination":"3"}"#).unwrap();
        assert_eq!(state.denomination, Some(3));
        let state: AssetState = serde_json::from_str(r#"{"Denomination":12}"#).unwrap();
        assert_eq!(state.denomination, Some(12));
        let state: AssetState = serde_json::from_str(r#"{"Denomination":"n/a"}"#).unwrap();
        assert_eq!(state.denomination, None);
    }

    #[test]
    fn activity_query_serializes_only_present_scope() {
        let json = serde_json::to_value(ActivityQuery::for_address("abc")).unwrap();
        assert_eq!(json, serde_json::json!({ "Address": "abc" }));
        let json = serde_json::to_value(ActivityQuery::for_asset("id")).unwrap();
        assert_eq!(json, serde_json::json!({ "AssetIds": ["id"] }));
    }

    #[test]
    fn profile_name_prefers_display_name() {
        let profile = Profile {
            id: "a".into(),
            username: Some("user".into()),
            display_name: Some("Display".into()),
            avatar: None,
        };
        assert_eq!(profile.name(), Some("Display"));
        let profile = Profile {
            display_name: Some(String::new()),
            username: None,
            ..profile
        };
        assert_eq!(profile.name(), None);
    }

    #[test]
    fn profile_name_skips_empty_display_name() {
        let profile: Profile =
            serde_json::from_value(serde_json::json!({
                "ProfileId": "a", "Username": "bob", "DisplayName": ""
            }))
            .unwrap();
        assert_eq!(profile.name(), Some("bob"));
    }
}
