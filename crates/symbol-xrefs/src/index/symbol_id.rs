use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::PayloadError;

/// Stable identity of a logical symbol, derived from its USR.
///
/// Two parses of the same entity produce the same id, which makes it the join
/// key between a parsed unit and the persistent index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolId([u8; 8]);

impl SymbolId {
    pub fn from_usr(usr: &str) -> Self {
        Self(xxh3_64(usr.as_bytes()).to_be_bytes())
    }

    pub const fn from_raw(raw: [u8; 8]) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> [u8; 8] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02X}")).collect()
    }

    pub fn from_hex(hex: &str) -> Result<Self, PayloadError> {
        let invalid = || PayloadError::InvalidSymbolId(hex.to_string());
        if hex.len() != 16 || !hex.is_ascii() {
            return Err(invalid());
        }
        let mut raw = [0u8; 8];
        for (idx, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for SymbolId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "SymbolId({})", self.to_hex())
    }
}

impl FromStr for SymbolId {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for SymbolId {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SymbolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
