//! Query settings, one file per category. [`XrefSettings`] aggregates the
//! categories and merges JSON payloads or TOML files on top of the defaults.

pub(crate) mod hierarchy;
pub(crate) mod logging;
pub(crate) mod navigation;
pub(crate) mod references;

use std::{collections::HashMap, path::Path};

use hierarchy::HierarchySettingsPatch;
pub use hierarchy::{HierarchySettings, MAX_RESOLVE_LEVELS, MIN_RESOLVE_LEVELS};
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings, MAX_PERF_SUMMARY_INTERVAL, MIN_PERF_SUMMARY_INTERVAL};
use navigation::NavigationSettingsPatch;
pub use navigation::{
    MAX_TEXTUAL_CANDIDATES, MAX_TEXTUAL_QUERY_LIMIT, MIN_TEXTUAL_CANDIDATES, MIN_TEXTUAL_QUERY_LIMIT,
    NavigationSettings,
};
use references::ReferenceSettingsPatch;
pub use references::{MAX_REFERENCE_LIMIT, MIN_REFERENCE_LIMIT, ReferenceSettings};
use serde::Deserialize;
use serde_json::Value;

use crate::error::XrefError;

pub const SETTINGS_SECTION_KEY: &str = "symbol-xrefs";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XrefSettings {
    pub navigation: NavigationSettings,
    pub references: ReferenceSettings,
    pub hierarchy: HierarchySettings,
    pub logging: LoggingSettings,
}

impl XrefSettings {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<XrefSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Parses a TOML document with the same shape as the JSON payload.
    pub fn from_toml_str(text: &str) -> Result<Self, XrefError> {
        let document: toml::Table = toml::from_str(text)?;
        let payload = serde_json::to_value(document)?;
        Ok(Self::default().merged_with_payload(&payload))
    }

    pub fn load(path: &Path) -> Result<Self, XrefError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn apply_patch(
        &mut self,
        patch: XrefSettingsPatch,
    ) {
        if let Some(p) = patch.navigation {
            self.navigation.apply_patch(p);
        }
        if let Some(p) = patch.references {
            self.references.apply_patch(p);
        }
        if let Some(p) = patch.hierarchy {
            self.hierarchy.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.navigation.normalize();
        self.references.normalize();
        self.hierarchy.normalize();
        self.logging.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct XrefSettingsPatch {
    navigation: Option<NavigationSettingsPatch>,
    references: Option<ReferenceSettingsPatch>,
    hierarchy: Option<HierarchySettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
