use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

pub const MIN_TEXTUAL_CANDIDATES: usize = 1;
pub const MAX_TEXTUAL_CANDIDATES: usize = 50;
pub const MIN_TEXTUAL_QUERY_LIMIT: usize = 1;
pub const MAX_TEXTUAL_QUERY_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSettings {
    /// Retry resolution at a nearby spelling of the word under the cursor.
    pub nearby_identifier: bool,
    /// Fall back to a by-name index search when nothing else resolved.
    pub textual_fallback: bool,
    /// More exact-name candidates than this and the textual fallback gives up.
    pub textual_max_candidates: usize,
    /// How many symbols the textual fallback asks the index for.
    pub textual_query_limit: usize,
    /// Qualified names of class templates that behave like pointers to their
    /// first template argument.
    pub smart_pointers: Vec<String>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            nearby_identifier: true,
            textual_fallback: true,
            textual_max_candidates: 5,
            textual_query_limit: 10,
            smart_pointers: ["std::unique_ptr", "std::shared_ptr", "std::weak_ptr", "std::auto_ptr"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl NavigationSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: NavigationSettingsPatch,
    ) {
        if let Some(v) = patch.nearby_identifier {
            self.nearby_identifier = v;
        }
        if let Some(v) = patch.textual_fallback {
            self.textual_fallback = v;
        }
        if let Some(v) = patch.textual_max_candidates {
            self.textual_max_candidates = v;
        }
        if let Some(v) = patch.textual_query_limit {
            self.textual_query_limit = v;
        }
        if let Some(v) = patch.smart_pointers {
            self.smart_pointers = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.textual_max_candidates = self.textual_max_candidates.clamp(MIN_TEXTUAL_CANDIDATES, MAX_TEXTUAL_CANDIDATES);
        self.textual_query_limit = self.textual_query_limit.clamp(MIN_TEXTUAL_QUERY_LIMIT, MAX_TEXTUAL_QUERY_LIMIT);
        let mut seen = HashSet::new();
        self.smart_pointers = self
            .smart_pointers
            .iter()
            .map(|name| name.trim().trim_start_matches("::").to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
    }

    pub fn is_smart_pointer(
        &self,
        qualified_name: &str,
    ) -> bool {
        self.smart_pointers.iter().any(|name| name == qualified_name)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct NavigationSettingsPatch {
    pub(crate) nearby_identifier: Option<bool>,
    pub(crate) textual_fallback: Option<bool>,
    pub(crate) textual_max_candidates: Option<usize>,
    pub(crate) textual_query_limit: Option<usize>,
    pub(crate) smart_pointers: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
