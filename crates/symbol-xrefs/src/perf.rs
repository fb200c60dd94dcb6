use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use dashmap::DashMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Definition,
    TypeDefinition,
    Implementations,
    References,
    Highlights,
    SymbolInfo,
    TypeHierarchy,
    CallHierarchy,
    DocumentLinks,
}

impl QueryKind {
    const ALL: [QueryKind; 9] = [
        QueryKind::Definition,
        QueryKind::TypeDefinition,
        QueryKind::Implementations,
        QueryKind::References,
        QueryKind::Highlights,
        QueryKind::SymbolInfo,
        QueryKind::TypeHierarchy,
        QueryKind::CallHierarchy,
        QueryKind::DocumentLinks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueryKind::Definition => "definition",
            QueryKind::TypeDefinition => "type-definition",
            QueryKind::Implementations => "implementations",
            QueryKind::References => "references",
            QueryKind::Highlights => "highlights",
            QueryKind::SymbolInfo => "symbol-info",
            QueryKind::TypeHierarchy => "type-hierarchy",
            QueryKind::CallHierarchy => "call-hierarchy",
            QueryKind::DocumentLinks => "document-links",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Counters injected into the query engine.
pub trait XrefMetrics: Send + Sync {
    /// One finished query and how many results it produced.
    fn record_query(
        &self,
        kind: QueryKind,
        elapsed: Duration,
        results: usize,
    );

    /// Which resolution path produced a result, e.g. `"nearby-identifier"`.
    fn record_case(
        &self,
        case: &'static str,
    );
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl XrefMetrics for NoopMetrics {
    fn record_query(
        &self,
        _kind: QueryKind,
        _elapsed: Duration,
        _results: usize,
    ) {
    }

    fn record_case(
        &self,
        _case: &'static str,
    ) {
    }
}

#[derive(Default)]
struct QueryCounters {
    requests: AtomicU64,
    hits: AtomicU64,
    total_elapsed_ns: AtomicU64,
}

/// Lightweight runtime counters for query behavior, summarized to the log
/// every `summary_interval` queries.
pub struct QueryPerf {
    queries: [QueryCounters; QueryKind::ALL.len()],
    cases: DashMap<&'static str, u64>,
    total: AtomicU64,
    summary_interval: u64,
}

impl Default for QueryPerf {
    fn default() -> Self {
        Self::new(200)
    }
}

impl QueryPerf {
    pub fn new(summary_interval: u64) -> Self {
        Self {
            queries: Default::default(),
            cases: DashMap::new(),
            total: AtomicU64::new(0),
            summary_interval: summary_interval.max(1),
        }
    }

    pub fn requests(
        &self,
        kind: QueryKind,
    ) -> u64 {
        self.queries[kind.slot()].requests.load(Ordering::Relaxed)
    }

    pub fn hits(
        &self,
        kind: QueryKind,
    ) -> u64 {
        self.queries[kind.slot()].hits.load(Ordering::Relaxed)
    }

    pub fn case_count(
        &self,
        case: &str,
    ) -> u64 {
        self.cases.get(case).map(|count| *count).unwrap_or_default()
    }

    pub fn log_summary(&self) {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            info!("[perf][xrefs] no queries recorded yet");
            return;
        }

        let per_query: Vec<String> = QueryKind::ALL
            .iter()
            .filter_map(|kind| {
                let counters = &self.queries[kind.slot()];
                let requests = counters.requests.load(Ordering::Relaxed);
                if requests == 0 {
                    return None;
                }
                let hits = counters.hits.load(Ordering::Relaxed);
                let avg_ms = counters.total_elapsed_ns.load(Ordering::Relaxed) as f64 / requests as f64 / 1_000_000.0;
                Some(format!("{}(requests={requests}, hits={hits}, avg_ms={avg_ms:.2})", kind.name()))
            })
            .collect();
        let mut cases: Vec<(&'static str, u64)> = self.cases.iter().map(|entry| (*entry.key(), *entry.value())).collect();
        cases.sort();
        let cases: Vec<String> = cases.into_iter().map(|(case, count)| format!("{case}={count}")).collect();

        info!("[perf][xrefs] queries={total}, {}, cases({})", per_query.join(", "), cases.join(", "));
    }
}

impl XrefMetrics for QueryPerf {
    fn record_query(
        &self,
        kind: QueryKind,
        elapsed: Duration,
        results: usize,
    ) {
        let counters = &self.queries[kind.slot()];
        counters.requests.fetch_add(1, Ordering::Relaxed);
        if results > 0 {
            counters.hits.fetch_add(1, Ordering::Relaxed);
        }
        let elapsed_ns = elapsed.as_nanos().min(u64::MAX as u128) as u64;
        counters.total_elapsed_ns.fetch_add(elapsed_ns, Ordering::Relaxed);

        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        if total % self.summary_interval == 0 {
            self.log_summary();
        }
    }

    fn record_case(
        &self,
        case: &'static str,
    ) {
        *self.cases.entry(case).or_default() += 1;
    }
}
