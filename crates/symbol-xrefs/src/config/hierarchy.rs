use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_RESOLVE_LEVELS: usize = 0;
pub const MAX_RESOLVE_LEVELS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchySettings {
    /// Levels of parents/children resolved when a request does not say.
    pub resolve_levels: usize,
}

impl Default for HierarchySettings {
    fn default() -> Self {
        Self {
            resolve_levels: 1,
        }
    }
}

impl HierarchySettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: HierarchySettingsPatch,
    ) {
        if let Some(v) = patch.resolve_levels {
            self.resolve_levels = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.resolve_levels = self.resolve_levels.clamp(MIN_RESOLVE_LEVELS, MAX_RESOLVE_LEVELS);
    }

    /// Clamps a caller-supplied depth to the supported range.
    pub fn clamp_levels(
        &self,
        levels: usize,
    ) -> usize {
        levels.min(MAX_RESOLVE_LEVELS)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct HierarchySettingsPatch {
    pub(crate) resolve_levels: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
