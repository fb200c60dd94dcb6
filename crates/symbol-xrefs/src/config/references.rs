use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_REFERENCE_LIMIT: usize = 1;
pub const MAX_REFERENCE_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSettings {
    /// Cap on references returned when the caller does not pass one.
    pub limit: usize,
    /// Attach "scope::name" of the enclosing symbol to each reference.
    pub container_names: bool,
    /// Highlight related control flow when the cursor names no declaration.
    pub control_flow_highlights: bool,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            limit: 1000,
            container_names: true,
            control_flow_highlights: true,
        }
    }
}

impl ReferenceSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ReferenceSettingsPatch,
    ) {
        if let Some(v) = patch.limit {
            self.limit = v;
        }
        if let Some(v) = patch.container_names {
            self.container_names = v;
        }
        if let Some(v) = patch.control_flow_highlights {
            self.control_flow_highlights = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.limit = self.limit.clamp(MIN_REFERENCE_LIMIT, MAX_REFERENCE_LIMIT);
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ReferenceSettingsPatch {
    pub(crate) limit: Option<usize>,
    pub(crate) container_names: Option<bool>,
    pub(crate) control_flow_highlights: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
