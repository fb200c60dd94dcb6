//! The query facade handed to a language server.
//!
//! [`XrefProvider`] owns everything a query needs besides the parsed unit:
//! settings, the optional project index, the ranking and the counters. Each
//! operation takes LSP positions and returns LSP values.

use std::{path::Path, sync::Arc, time::Instant};

use serde::Serialize;
use serde_json::Value;
use tower_lsp::lsp_types::{
    CallHierarchyIncomingCall, CallHierarchyItem as LspCallHierarchyItem, CallHierarchyOutgoingCall,
    DocumentHighlight as LspDocumentHighlight, DocumentLink as LspDocumentLink, GotoDefinitionResponse, Location,
    Position, TypeHierarchyItem as LspTypeHierarchyItem,
};
use tracing::{debug, info, warn};

use crate::{
    ast::ParsedUnit,
    config::XrefSettings,
    context::QueryContext,
    definition::{document_links, find_implementations, find_type, locate_symbol_at},
    hierarchy::{self, TypeHierarchyDirection},
    ide::lsp::{
        call_hierarchy_item_from_lsp, call_hierarchy_item_to_lsp, declarations_to_lsp, document_link_to_lsp,
        highlight_to_lsp, incoming_call_to_lsp, located_symbols_to_lsp, lsp_position_to_ide, outgoing_call_to_lsp,
        reference_to_json, symbol_details_to_json, type_hierarchy_item_from_lsp, type_hierarchy_item_to_lsp,
        type_hierarchy_tree_to_json,
    },
    index::{DefaultScorer, RelevanceScorer, SymbolIndex},
    perf::{QueryKind, QueryPerf, XrefMetrics},
    references::{find_document_highlights, find_references, get_symbol_info},
};

/// References as returned to the client, with the attributes and container
/// names the plain LSP `Location` has no room for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencesResponse {
    pub references: Vec<Value>,
    pub has_more: bool,
}

pub struct XrefProvider {
    settings: XrefSettings,
    index: Option<Arc<dyn SymbolIndex + Send + Sync>>,
    scorer: Arc<dyn RelevanceScorer + Send + Sync>,
    metrics: Arc<dyn XrefMetrics>,
}

impl Default for XrefProvider {
    fn default() -> Self {
        Self::new(XrefSettings::default())
    }
}

impl XrefProvider {
    pub fn new(settings: XrefSettings) -> Self {
        let metrics = Arc::new(QueryPerf::new(settings.logging.perf_summary_interval));
        Self {
            settings,
            index: None,
            scorer: Arc::new(DefaultScorer),
            metrics,
        }
    }

    pub fn with_index(
        mut self,
        index: Arc<dyn SymbolIndex + Send + Sync>,
    ) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_scorer(
        mut self,
        scorer: Arc<dyn RelevanceScorer + Send + Sync>,
    ) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_metrics(
        mut self,
        metrics: Arc<dyn XrefMetrics>,
    ) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn settings(&self) -> &XrefSettings {
        &self.settings
    }

    /// Merges a client settings payload on top of the current settings.
    pub fn apply_settings_payload(
        &mut self,
        payload: &Value,
    ) {
        self.settings = self.settings.merged_with_payload(payload);
        info!("[xrefs] settings updated: {:?}", self.settings);
    }

    fn index(&self) -> Option<&dyn SymbolIndex> {
        self.index.as_deref().map(|index| index as &dyn SymbolIndex)
    }

    fn context<'a>(
        &'a self,
        unit: &'a ParsedUnit,
        tu_path: &'a Path,
    ) -> QueryContext<'a> {
        QueryContext::new(unit, tu_path)
            .with_index(self.index())
            .with_settings(&self.settings)
            .with_scorer(&*self.scorer)
            .with_metrics(&*self.metrics)
    }

    fn finish(
        &self,
        kind: QueryKind,
        started: Instant,
        results: usize,
    ) {
        let elapsed = started.elapsed();
        self.metrics.record_query(kind, elapsed, results);
        debug!("[perf][xrefs] {} finished in {:.2}ms with {results} result(s)", kind.name(), elapsed.as_secs_f64() * 1000.0);
    }

    fn resolve_levels(
        &self,
        levels: Option<usize>,
    ) -> u32 {
        let levels = self.settings.hierarchy.clamp_levels(levels.unwrap_or(self.settings.hierarchy.resolve_levels));
        u32::try_from(levels).unwrap_or(u32::MAX)
    }

    pub fn definition(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Option<GotoDefinitionResponse> {
        let started = Instant::now();
        let symbols = locate_symbol_at(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[goto-def] {}:{} -> {} symbol(s)", position.line, position.character, symbols.len());
        self.finish(QueryKind::Definition, started, symbols.len());
        located_symbols_to_lsp(&symbols)
    }

    pub fn declaration(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Vec<Location> {
        let started = Instant::now();
        let symbols = locate_symbol_at(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[goto-def] declaration at {}:{} -> {} symbol(s)", position.line, position.character, symbols.len());
        self.finish(QueryKind::Definition, started, symbols.len());
        declarations_to_lsp(&symbols)
    }

    pub fn type_definition(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Option<GotoDefinitionResponse> {
        let started = Instant::now();
        let symbols = find_type(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[type-def] {}:{} -> {} symbol(s)", position.line, position.character, symbols.len());
        self.finish(QueryKind::TypeDefinition, started, symbols.len());
        located_symbols_to_lsp(&symbols)
    }

    pub fn implementations(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Option<GotoDefinitionResponse> {
        let started = Instant::now();
        let symbols = find_implementations(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[implementations] {}:{} -> {} symbol(s)", position.line, position.character, symbols.len());
        self.finish(QueryKind::Implementations, started, symbols.len());
        located_symbols_to_lsp(&symbols)
    }

    /// References to the symbol at `position`. `limit` falls back to the
    /// configured default.
    pub fn references(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
        limit: Option<usize>,
    ) -> ReferencesResponse {
        let started = Instant::now();
        let limit = limit.unwrap_or(self.settings.references.limit);
        let result = find_references(&self.context(unit, tu_path), lsp_position_to_ide(position), Some(limit));
        debug!(
            "[refs] {}:{} -> {} reference(s), has_more={}",
            position.line,
            position.character,
            result.references.len(),
            result.has_more
        );
        self.finish(QueryKind::References, started, result.references.len());
        ReferencesResponse {
            references: result.references.iter().filter_map(reference_to_json).collect(),
            has_more: result.has_more,
        }
    }

    pub fn document_highlights(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Vec<LspDocumentHighlight> {
        let started = Instant::now();
        let highlights = find_document_highlights(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[highlight] {}:{} -> {} highlight(s)", position.line, position.character, highlights.len());
        self.finish(QueryKind::Highlights, started, highlights.len());
        highlights.iter().map(highlight_to_lsp).collect()
    }

    pub fn symbol_info(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Vec<Value> {
        let started = Instant::now();
        let details = get_symbol_info(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[symbol-info] {}:{} -> {} symbol(s)", position.line, position.character, details.len());
        self.finish(QueryKind::SymbolInfo, started, details.len());
        details.iter().map(symbol_details_to_json).collect()
    }

    pub fn document_links(
        &self,
        unit: &ParsedUnit,
    ) -> Vec<LspDocumentLink> {
        let started = Instant::now();
        let links = document_links(unit);
        self.finish(QueryKind::DocumentLinks, started, links.len());
        links.iter().map(document_link_to_lsp).collect()
    }

    /// Type hierarchy at `position` in nested form, parents and children
    /// inlined.
    pub fn type_hierarchy(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
        levels: Option<usize>,
        direction: TypeHierarchyDirection,
    ) -> Vec<Value> {
        let started = Instant::now();
        let levels = self.resolve_levels(levels);
        let items =
            hierarchy::get_type_hierarchy(&self.context(unit, tu_path), lsp_position_to_ide(position), levels, direction);
        debug!(
            "[hierarchy] type hierarchy at {}:{} ({direction:?}, {levels} level(s)) -> {} item(s)",
            position.line,
            position.character,
            items.len()
        );
        self.finish(QueryKind::TypeHierarchy, started, items.len());
        items.iter().filter_map(type_hierarchy_tree_to_json).collect()
    }

    /// Items for the type hierarchy at `position`, without children.
    pub fn prepare_type_hierarchy(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Vec<LspTypeHierarchyItem> {
        let started = Instant::now();
        let items = hierarchy::get_type_hierarchy(
            &self.context(unit, tu_path),
            lsp_position_to_ide(position),
            0,
            TypeHierarchyDirection::Parents,
        );
        self.finish(QueryKind::TypeHierarchy, started, items.len());
        items.iter().filter_map(type_hierarchy_item_to_lsp).collect()
    }

    pub fn supertypes(
        &self,
        item: &LspTypeHierarchyItem,
    ) -> Option<Vec<LspTypeHierarchyItem>> {
        let started = Instant::now();
        let item = match type_hierarchy_item_from_lsp(item) {
            Ok(item) => item,
            Err(err) => {
                warn!("[hierarchy] supertypes of `{}`: {err}", item.name);
                return None;
            },
        };
        let parents = hierarchy::super_types(&item, self.index()?)?;
        self.finish(QueryKind::TypeHierarchy, started, parents.len());
        Some(parents.iter().filter_map(type_hierarchy_item_to_lsp).collect())
    }

    pub fn subtypes(
        &self,
        item: &LspTypeHierarchyItem,
    ) -> Vec<LspTypeHierarchyItem> {
        let started = Instant::now();
        let item = match type_hierarchy_item_from_lsp(item) {
            Ok(item) => item,
            Err(err) => {
                warn!("[hierarchy] subtypes of `{}`: {err}", item.name);
                return Vec::new();
            },
        };
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let children = hierarchy::sub_types(&item, index);
        self.finish(QueryKind::TypeHierarchy, started, children.len());
        children.iter().filter_map(type_hierarchy_item_to_lsp).collect()
    }

    /// Expands an item the client holds, in nested form.
    pub fn resolve_type_hierarchy(
        &self,
        item: &LspTypeHierarchyItem,
        levels: Option<usize>,
        direction: TypeHierarchyDirection,
    ) -> Option<Value> {
        let started = Instant::now();
        let mut item = match type_hierarchy_item_from_lsp(item) {
            Ok(item) => item,
            Err(err) => {
                warn!("[hierarchy] resolve of `{}`: {err}", item.name);
                return None;
            },
        };
        let levels = self.resolve_levels(levels);
        hierarchy::resolve_type_hierarchy(&mut item, levels, direction, self.index());
        self.finish(QueryKind::TypeHierarchy, started, item.children.as_ref().map_or(0, Vec::len));
        type_hierarchy_tree_to_json(&item)
    }

    pub fn prepare_call_hierarchy(
        &self,
        unit: &ParsedUnit,
        tu_path: &Path,
        position: Position,
    ) -> Vec<LspCallHierarchyItem> {
        let started = Instant::now();
        let items = hierarchy::prepare_call_hierarchy(&self.context(unit, tu_path), lsp_position_to_ide(position));
        debug!("[hierarchy] call hierarchy at {}:{} -> {} item(s)", position.line, position.character, items.len());
        self.finish(QueryKind::CallHierarchy, started, items.len());
        items.iter().filter_map(call_hierarchy_item_to_lsp).collect()
    }

    pub fn incoming_calls(
        &self,
        item: &LspCallHierarchyItem,
    ) -> Vec<CallHierarchyIncomingCall> {
        let started = Instant::now();
        let item = match call_hierarchy_item_from_lsp(item) {
            Ok(item) => item,
            Err(err) => {
                warn!("[hierarchy] incoming calls of `{}`: {err}", item.name);
                return Vec::new();
            },
        };
        let calls = hierarchy::incoming_calls(&item, self.index());
        self.finish(QueryKind::CallHierarchy, started, calls.len());
        calls.iter().filter_map(incoming_call_to_lsp).collect()
    }

    pub fn outgoing_calls(
        &self,
        item: &LspCallHierarchyItem,
    ) -> Vec<CallHierarchyOutgoingCall> {
        let started = Instant::now();
        let item = match call_hierarchy_item_from_lsp(item) {
            Ok(item) => item,
            Err(err) => {
                warn!("[hierarchy] outgoing calls of `{}`: {err}", item.name);
                return Vec::new();
            },
        };
        let calls = hierarchy::outgoing_calls(&item, self.index());
        self.finish(QueryKind::CallHierarchy, started, calls.len());
        calls.iter().filter_map(outgoing_call_to_lsp).collect()
    }
}
