use crate::index::{Symbol, SymbolKind};

/// Ranks symbols that only matched by name. Higher is better.
pub trait RelevanceScorer {
    fn score(
        &self,
        symbol: &Symbol,
    ) -> f32;
}

/// Popularity-based ranking: widely referenced symbols first, deprecated ones
/// and easily confused kinds pushed down.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScorer;

impl RelevanceScorer for DefaultScorer {
    fn score(
        &self,
        symbol: &Symbol,
    ) -> f32 {
        let mut score = 1.0 + (1.0 + symbol.references as f32).ln();
        if symbol.deprecated {
            score *= 0.1;
        }
        score *= match symbol.kind {
            SymbolKind::Macro => 0.2,
            SymbolKind::Parameter | SymbolKind::TemplateTypeParam | SymbolKind::NonTypeTemplateParam => 0.5,
            SymbolKind::Class | SymbolKind::Struct | SymbolKind::Enum | SymbolKind::Function => 1.1,
            _ => 1.0,
        };
        score
    }
}
