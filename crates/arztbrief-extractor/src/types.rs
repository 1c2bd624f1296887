//! Result types for extraction

use crate::grammar::MatchStage;
use crate::name::NameStrategy;
use arztbrief_domain::PatientRecord;

/// A record together with how it was obtained
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The extracted record
    pub record: PatientRecord,

    /// Which grammars matched, and at which stage
    pub trace: ExtractionTrace,
}

/// Per-document account of the grammars that matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionTrace {
    /// Strategy that resolved the patient name, if any did
    pub name_strategy: Option<NameStrategy>,

    /// Pattern grammars that matched, in evaluation order
    pub hits: Vec<GrammarHit>,
}

impl ExtractionTrace {
    /// Record a grammar hit
    pub fn hit(&mut self, grammar: &'static str, stage: MatchStage) {
        self.hits.push(GrammarHit { grammar, stage });
    }

    /// Stage at which a grammar matched
    pub fn stage_of(&self, grammar: &str) -> Option<MatchStage> {
        self.hits
            .iter()
            .find(|hit| hit.grammar == grammar)
            .map(|hit| hit.stage)
    }

    /// Number of hits that needed a fallback pattern
    pub fn fallback_count(&self) -> usize {
        self.hits
            .iter()
            .filter(|hit| matches!(hit.stage, MatchStage::Fallback(_)))
            .count()
    }
}

/// One matched grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarHit {
    /// Field (or field group) of the grammar
    pub grammar: &'static str,

    /// Pattern that matched
    pub stage: MatchStage,
}
