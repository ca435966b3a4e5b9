// State/commission descriptors and the commission address record.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient_string;

/// A state or a commission within a state.
///
/// The backend models states as commission-like entities, so the same
/// shape serves both tiers of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(deserialize_with = "lenient_id")]
    pub commission_id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commission_name_en: Option<String>,
}

impl Descriptor {
    pub fn new(commission_id: i64, name: impl Into<String>) -> Self {
        Descriptor {
            commission_id,
            commission_name_en: Some(name.into()),
        }
    }

    /// Display name, falling back to the numeric id when the name is missing.
    pub fn label(&self) -> String {
        match &self.commission_name_en {
            Some(name) => name.clone(),
            None => format!("#{}", self.commission_id),
        }
    }
}

/// Contact details for one commission. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionAddress {
    #[serde(default, deserialize_with = "lenient_string")]
    pub state_name_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commission_name_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commission_type_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postal_pin_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub web_site_address: Option<String>,
}

/// Commission ids arrive as JSON numbers, occasionally as numeric strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("commissionId out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid commissionId: {s:?}"))),
        other => Err(D::Error::custom(format!("invalid commissionId: {other}"))),
    }
}
