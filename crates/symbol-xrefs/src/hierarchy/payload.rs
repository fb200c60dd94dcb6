//! Resumable state attached to hierarchy items.
//!
//! Items leave the engine and come back in follow-up requests, so the state
//! must stand on its own: a type item carries its symbol id and the chain of
//! parents it was reached through as JSON, a call item just the hex id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::PayloadError, index::SymbolId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHierarchyPayload {
    #[serde(rename = "symbolID")]
    pub symbol_id: SymbolId,
    /// Payloads of the direct parents. `None` when they were never computed,
    /// as for items that came from the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<TypeHierarchyPayload>>,
}

impl TypeHierarchyPayload {
    pub fn new(symbol_id: SymbolId) -> Self {
        Self {
            symbol_id,
            parents: None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        if value.is_null() {
            return Err(PayloadError::Missing);
        }
        Self::deserialize(value).map_err(|err| PayloadError::Malformed(err.to_string()))
    }
}

/// The call hierarchy payload: the item's symbol id in hex.
pub fn encode_call_payload(id: SymbolId) -> String {
    id.to_hex()
}

pub fn decode_call_payload(data: &str) -> Result<SymbolId, PayloadError> {
    if data.is_empty() {
        return Err(PayloadError::Missing);
    }
    SymbolId::from_hex(data)
}

#[cfg(test)]
#[path = "../../tests/src/hierarchy/payload_tests.rs"]
mod tests;
