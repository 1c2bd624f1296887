//! Field Grammar Library
//!
//! One grammar per field: a primary pattern with named capture groups and
//! zero or more fallback patterns tried in declared order. All constant
//! patterns are compiled once per process and never mutated, so a library can
//! be shared freely between workers.
//!
//! Labelled patterns come first because explicit labels are unambiguous.
//! Patterns are case-insensitive where German capitalisation could cause
//! false negatives (ECOG, TNM) and case-sensitive where capitalisation is what
//! separates a proper name from a common noun.

use crate::config::{ExtractorConfig, TumorGrammar};
use crate::error::ExtractorError;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Name and birth date

/// Two or more capitalised tokens, then `, geb. am DD.MM.YYYY`
static NAME_BIRTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<name>[A-ZÄÖÜ][a-zäöüß]+(?:\s+[A-ZÄÖÜ][a-zäöüß]+)+),\s*geb\.\s*am\s*(?P<birth_date>\d{2}\.\d{2}\.\d{4})",
    )
    .expect("valid regex")
});

/// `Frau Anna Müller,` inside the introductory sentence
pub(crate) static TITLE_FIRST_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<title>Frau|Herrn?)\s+(?P<first>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?)\s+(?P<last>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?),",
    )
    .expect("valid regex")
});

/// `Frau Müller, Anna` inside the introductory sentence
pub(crate) static TITLE_LAST_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<title>Frau|Herrn?)\s+(?P<last>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?),\s*(?P<first>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?)",
    )
    .expect("valid regex")
});

/// Birth date anywhere inside an already located sentence
pub(crate) static SENTENCE_BIRTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"geb(?:\.|oren)\s*(?:am\s*)?(?P<birth_date>\d{2}\.\d{2}\.\d{4})")
        .expect("valid regex")
});

/// `Frau Müller, Anna ... geb. am DD.MM.YYYY` anywhere in the document
pub(crate) static DOCUMENT_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<title>Frau|Herrn?)\s+(?P<last>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?),\s*(?P<first>[A-ZÄÖÜ][a-zäöüß]+(?:-[A-ZÄÖÜ][a-zäöüß]+)?)(?s:.{0,120}?)geb\.\s*am\s*(?P<birth_date>\d{2}\.\d{2}\.\d{4})",
    )
    .expect("valid regex")
});

/// A standalone salutation token
pub(crate) static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<title>Frau|Herrn?)\b").expect("valid regex")
});

// Tumor stage

static TUMOR_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:Tumorstadium|Stadium):[ \t]*(?P<tumor_status>[^\n]+?)[ \t]*(?:,\s*UICC:|\r?\n|$)",
    )
    .expect("valid regex")
});

static TNM_COMPOSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<tumor_status>[cpr]T(?:is|\d+[a-z]?)[\s,;]+[cpr]N(?:[0-3][a-z]?|x)[\s,;]+[cpr]M(?:0|1|x)(?:\s*\([^)]*\))?)",
    )
    .expect("valid regex")
});

// Performance status

static ECOG_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ECOG:[ \t]*(?P<ecog>[0-5])(?:[ \t]*-[ \t]*(?P<ecog_to>[0-5]))?")
        .expect("valid regex")
});

static ECOG_FREE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?\s*ECOG[\s:\-]*(?P<ecog>\d)(?:[ \t]*-[ \t]*(?P<ecog_to>\d))?\s*\)?")
        .expect("valid regex")
});

// Vitals, history and findings

static VITALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Alter:\s*(?P<age>\d+).*?Größe:\s*(?P<height>\d+(?:[.,]\d+)?)\s*cm.*?Gewicht:\s*(?P<weight>\d+(?:[.,]\d+)?)\s*kg.*?BMI:\s*(?P<bmi>\d+(?:[.,]\d+)?)",
    )
    .expect("valid regex")
});

static ALLERGIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Allergien?:[ \t]*(?P<allergies>[^\n]*)").expect("valid regex")
});

static SMOKING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Ex-Nikotinabusus\s+bis\s+(?P<quit_date>\d{1,2}/\d{4}).*?\(ca\.\s*(?P<pack_years>\d+\s*py)\)",
    )
    .expect("valid regex")
});

static PD_L1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PD-L1\s*\((?P<pd_l1>[^)]+)\)").expect("valid regex")
});

static TUMOR_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<tumor_size>\d+(?:[.,]\d+)?\s*x\s*\d+(?:[.,]\d+)?\s*x\s*\d+(?:[.,]\d+)?\s*cm)",
    )
    .expect("valid regex")
});

// Free-text blocks

static DIAGNOSES_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Diagnosen:").expect("valid regex"));

/// `Verlauf:` closes the diagnoses block only at the start of a line; an
/// inline `Verlauf:` is part of the diagnosis text
static DIAGNOSES_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*Verlauf:").expect("valid regex"));

static MEDICATIONS_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Aktuelle\s+Medikation:").expect("valid regex"));

/// Which pattern of a grammar produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    /// The primary pattern
    Primary,
    /// The fallback at this position in declared order
    Fallback(usize),
}

/// A successful grammar match
#[derive(Debug)]
pub struct GrammarMatch<'t> {
    captures: Captures<'t>,
    stage: MatchStage,
}

impl<'t> GrammarMatch<'t> {
    /// Text of a named capture group, if it participated in the match
    pub fn group(&self, name: &str) -> Option<&'t str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Stage that matched
    pub fn stage(&self) -> MatchStage {
        self.stage
    }
}

/// Extraction rule for one field: primary pattern plus ordered fallbacks
#[derive(Debug, Clone)]
pub struct Grammar {
    field: &'static str,
    primary: Regex,
    fallbacks: Vec<Regex>,
}

impl Grammar {
    /// Create a grammar with only a primary pattern
    pub fn new(field: &'static str, primary: Regex) -> Self {
        Self {
            field,
            primary,
            fallbacks: Vec::new(),
        }
    }

    /// Append a fallback pattern
    pub fn with_fallback(mut self, fallback: Regex) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// Field (or field group) this grammar extracts
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Number of fallback patterns
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.len()
    }

    /// Find the first match, trying the primary pattern before each fallback
    ///
    /// Every pattern is searched over the whole text (leftmost match), never
    /// anchored. Fallbacks are not consulted once the primary has matched.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<GrammarMatch<'t>> {
        if let Some(captures) = self.primary.captures(text) {
            return Some(GrammarMatch {
                captures,
                stage: MatchStage::Primary,
            });
        }
        self.fallbacks
            .iter()
            .enumerate()
            .find_map(|(index, fallback)| {
                fallback.captures(text).map(|captures| GrammarMatch {
                    captures,
                    stage: MatchStage::Fallback(index),
                })
            })
    }
}

/// Extraction rule for a free-text block delimited by a start and end label
#[derive(Debug, Clone)]
pub struct BlockGrammar {
    field: &'static str,
    start: Regex,
    end: Regex,
}

impl BlockGrammar {
    /// Create a block grammar
    pub fn new(field: &'static str, start: Regex, end: Regex) -> Self {
        Self { field, start, end }
    }

    /// Field this grammar extracts
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Text after the first start label, up to the next end label or the end
    /// of the text, trimmed; `None` when the label is missing or the block is
    /// empty
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let start = self.start.find(text)?;
        let rest = &text[start.end()..];
        let body = match self.end.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        };
        let body = body.trim();
        (!body.is_empty()).then_some(body)
    }
}

/// The complete catalog of field grammars for one configuration
#[derive(Debug, Clone)]
pub struct GrammarLibrary {
    pub(crate) name_birth_date: Grammar,
    pub(crate) tumor_status: Grammar,
    pub(crate) ecog: Grammar,
    pub(crate) vitals: Grammar,
    pub(crate) allergies: Grammar,
    pub(crate) smoking: Grammar,
    pub(crate) pd_l1: Grammar,
    pub(crate) tumor_size: Grammar,
    pub(crate) diagnoses: BlockGrammar,
    pub(crate) medications: BlockGrammar,
    pub(crate) intro_phrase: Regex,
}

impl GrammarLibrary {
    /// Build the library for a configuration
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid or a
    /// configured phrase yields an uncompilable pattern.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let tumor_status = match config.tumor_grammar {
            TumorGrammar::Labelled => Grammar::new("tumor_status", TUMOR_LABELLED.clone())
                .with_fallback(TNM_COMPOSITE.clone()),
            TumorGrammar::Unlabelled => Grammar::new("tumor_status", TNM_COMPOSITE.clone()),
        };

        let closing = Regex::new(&format!(
            r"(?im)^[ \t]*(?:{})",
            phrase_alternation(&config.closing_phrases)
        ))?;

        Ok(Self {
            name_birth_date: Grammar::new("name", NAME_BIRTH_DATE.clone()),
            tumor_status,
            ecog: Grammar::new("ecog", ECOG_LABELLED.clone())
                .with_fallback(ECOG_FREE_FORM.clone()),
            vitals: Grammar::new("vitals", VITALS.clone()),
            allergies: Grammar::new("allergies", ALLERGIES.clone()),
            smoking: Grammar::new("smoking", SMOKING.clone()),
            pd_l1: Grammar::new("pd_l1", PD_L1.clone()),
            tumor_size: Grammar::new("tumor_size", TUMOR_SIZE.clone()),
            diagnoses: BlockGrammar::new(
                "diagnoses",
                DIAGNOSES_START.clone(),
                DIAGNOSES_END.clone(),
            ),
            medications: BlockGrammar::new("medications", MEDICATIONS_START.clone(), closing),
            intro_phrase: Regex::new(&phrase_alternation(&config.intro_phrases))?,
        })
    }

    /// Library for the default configuration
    pub fn standard() -> Result<Self, ExtractorError> {
        Self::new(&ExtractorConfig::default())
    }

    /// Pattern-based grammars in evaluation order
    pub fn grammars(&self) -> [&Grammar; 8] {
        [
            &self.name_birth_date,
            &self.tumor_status,
            &self.ecog,
            &self.vitals,
            &self.allergies,
            &self.smoking,
            &self.pd_l1,
            &self.tumor_size,
        ]
    }

    /// Whether a sentence contains one of the introductory phrases
    pub fn is_intro_sentence(&self, sentence: &str) -> bool {
        self.intro_phrase.is_match(sentence)
    }
}

/// Escape phrases and join them into one alternation; internal whitespace
/// matches any run of whitespace so line-wrapped phrases still match
fn phrase_alternation(phrases: &[String]) -> String {
    phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> GrammarLibrary {
        GrammarLibrary::standard().unwrap()
    }

    #[test]
    fn test_primary_name_pattern() {
        let m = library()
            .name_birth_date
            .first_match("Patientin Frau Anna Müller, geb. am 01.02.1960, wurde")
            .unwrap();
        // Leading words are kept in the raw capture and removed by the name chain
        assert_eq!(m.group("name"), Some("Patientin Frau Anna Müller"));
        assert_eq!(
            crate::normalize::split_honorific(m.group("name").unwrap()).1,
            "Anna Müller"
        );
        assert_eq!(m.group("birth_date"), Some("01.02.1960"));
    }

    #[test]
    fn test_primary_name_requires_two_tokens() {
        assert!(library()
            .name_birth_date
            .first_match("Müller, geb. am 01.02.1960")
            .is_none());
    }

    #[test]
    fn test_labelled_tumor_status_stops_at_uicc() {
        let m = library()
            .tumor_status
            .first_match("Tumorstadium: pT2 pN1 R0, UICC: IIB\n")
            .unwrap();
        assert_eq!(m.group("tumor_status"), Some("pT2 pN1 R0"));
        assert_eq!(m.stage(), MatchStage::Primary);
    }

    #[test]
    fn test_labelled_tumor_status_stops_at_line_end() {
        let m = library()
            .tumor_status
            .first_match("Stadium: cT3 cN2 cM1\nECOG: 1")
            .unwrap();
        assert_eq!(m.group("tumor_status"), Some("cT3 cN2 cM1"));
    }

    #[test]
    fn test_composite_tnm_fallback() {
        let m = library()
            .tumor_status
            .first_match("Befund: cT2b cN1a cM0 (Staging-CT) ohne Label")
            .unwrap();
        assert_eq!(m.group("tumor_status"), Some("cT2b cN1a cM0 (Staging-CT)"));
        assert_eq!(m.stage(), MatchStage::Fallback(0));
    }

    #[test]
    fn test_unlabelled_variant_ignores_label() {
        let config = ExtractorConfig::patterns_only();
        let library = GrammarLibrary::new(&config).unwrap();
        assert_eq!(library.tumor_status.fallback_count(), 0);
        assert!(library.tumor_status.first_match("Stadium: IV").is_none());
    }

    #[test]
    fn test_ecog_label_and_free_form() {
        let library = library();
        let m = library.ecog.first_match("ECOG: 3").unwrap();
        assert_eq!(m.group("ecog"), Some("3"));
        assert_eq!(m.stage(), MatchStage::Primary);

        let m = library.ecog.first_match("AZ reduziert (ECOG 2-3)").unwrap();
        assert_eq!(m.group("ecog"), Some("2"));
        assert_eq!(m.group("ecog_to"), Some("3"));
        assert_eq!(m.stage(), MatchStage::Fallback(0));
    }

    #[test]
    fn test_ecog_range_does_not_cross_lines() {
        let m = library().ecog.first_match("ECOG: 1\n- 2 Zyklen").unwrap();
        assert_eq!(m.group("ecog"), Some("1"));
        assert_eq!(m.group("ecog_to"), None);
    }

    #[test]
    fn test_vitals_in_order() {
        let text = "Alter: 64 Jahre, Größe: 172 cm, Gewicht: 81,5 kg, BMI: 27.5";
        let m = library().vitals.first_match(text).unwrap();
        assert_eq!(m.group("age"), Some("64"));
        assert_eq!(m.group("height"), Some("172"));
        assert_eq!(m.group("weight"), Some("81,5"));
        assert_eq!(m.group("bmi"), Some("27.5"));
    }

    #[test]
    fn test_vitals_out_of_order_do_not_match() {
        let text = "Gewicht: 81 kg, Alter: 64, Größe: 172 cm";
        assert!(library().vitals.first_match(text).is_none());
    }

    #[test]
    fn test_smoking_history() {
        let text = "Ex-Nikotinabusus bis 3/2015 (ca. 40py)";
        let m = library().smoking.first_match(text).unwrap();
        assert_eq!(m.group("quit_date"), Some("3/2015"));
        assert_eq!(m.group("pack_years"), Some("40py"));
    }

    #[test]
    fn test_pd_l1_and_tumor_size() {
        let library = library();
        let m = library.pd_l1.first_match("PD-L1 (TPS 80%, IC 2)").unwrap();
        assert_eq!(m.group("pd_l1"), Some("TPS 80%, IC 2"));

        let m = library
            .tumor_size
            .first_match("Raumforderung von 3,1 x 2 x 1.5 cm im Oberlappen")
            .unwrap();
        assert_eq!(m.group("tumor_size"), Some("3,1 x 2 x 1.5 cm"));
    }

    #[test]
    fn test_diagnoses_block() {
        let text = "Diagnosen:\nNSCLC\nCOPD\n\nVerlauf: stabil";
        assert_eq!(library().diagnoses.capture(text), Some("NSCLC\nCOPD"));
    }

    #[test]
    fn test_diagnoses_block_runs_to_end_of_text() {
        assert_eq!(
            library().diagnoses.capture("Diagnosen: NSCLC"),
            Some("NSCLC")
        );
        assert_eq!(library().diagnoses.capture("Diagnosen:\n\nVerlauf: x"), None);
    }

    #[test]
    fn test_inline_verlauf_does_not_close_diagnoses() {
        assert_eq!(
            library().diagnoses.capture("Diagnosen: NSCLC. Verlauf: stabil"),
            Some("NSCLC. Verlauf: stabil")
        );
        assert_eq!(
            library().diagnoses.capture("Diagnosen: NSCLC
  Verlauf: stabil"),
            Some("NSCLC")
        );
    }

    #[test]
    fn test_medications_block_ends_at_closing_phrase() {
        let text = "Aktuelle Medikation:\nASS 100 1-0-0\n\nMit freundlichen Grüßen\nDr. X";
        assert_eq!(
            library().medications.capture(text),
            Some("ASS 100 1-0-0")
        );
    }

    #[test]
    fn test_intro_phrase_tolerates_line_breaks() {
        let library = library();
        assert!(library.is_intro_sentence("Wir berichten\nüber Frau Müller"));
        assert!(!library.is_intro_sentence("Wir danken für die Zuweisung"));
    }

    #[test]
    fn test_grammar_order() {
        let library = library();
        let fields: Vec<_> = library.grammars().iter().map(|g| g.field()).collect();
        assert_eq!(fields[0], "name");
        assert_eq!(fields[1], "tumor_status");
        assert_eq!(fields[2], "ecog");
    }
}
