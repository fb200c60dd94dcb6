use std::path::Path;

use once_cell::sync::Lazy;

use crate::{
    ast::ParsedUnit,
    config::XrefSettings,
    index::{DefaultScorer, RelevanceScorer, SymbolIndex},
    perf::{NoopMetrics, XrefMetrics},
};

static DEFAULT_SETTINGS: Lazy<XrefSettings> = Lazy::new(XrefSettings::default);

/// Everything one query reads: the unit, the optional index and the knobs.
/// All of it is borrowed and read-only for the duration of the query.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub unit: &'a ParsedUnit,
    /// Path of the translation unit; relative index paths resolve against it.
    pub tu_path: &'a Path,
    pub index: Option<&'a dyn SymbolIndex>,
    pub settings: &'a XrefSettings,
    pub scorer: &'a dyn RelevanceScorer,
    pub metrics: &'a dyn XrefMetrics,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        unit: &'a ParsedUnit,
        tu_path: &'a Path,
    ) -> Self {
        Self {
            unit,
            tu_path,
            index: None,
            settings: &DEFAULT_SETTINGS,
            scorer: &DefaultScorer,
            metrics: &NoopMetrics,
        }
    }

    pub fn with_index(
        mut self,
        index: Option<&'a dyn SymbolIndex>,
    ) -> Self {
        self.index = index;
        self
    }

    pub fn with_settings(
        mut self,
        settings: &'a XrefSettings,
    ) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_scorer(
        mut self,
        scorer: &'a dyn RelevanceScorer,
    ) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_metrics(
        mut self,
        metrics: &'a dyn XrefMetrics,
    ) -> Self {
        self.metrics = metrics;
        self
    }
}
