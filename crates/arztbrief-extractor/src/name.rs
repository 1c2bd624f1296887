//! Name and birth-date fallback chain
//!
//! Strategies run in declared order and the first one that yields a name
//! wins. Each strategy returns an explicit `Option<NameCandidate>`; the
//! candidate records which strategy produced it.

use crate::grammar::{
    GrammarLibrary, DOCUMENT_SCAN, HONORIFIC, SENTENCE_BIRTH_DATE, TITLE_FIRST_LAST,
    TITLE_LAST_FIRST,
};
use crate::normalize::{collapse_whitespace, normalize_person_name, split_honorific};
use crate::sentence;
use arztbrief_domain::traits::EntityRecognizer;
use arztbrief_domain::Honorific;
use regex::Captures;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, warn};

/// Strategy that produced a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStrategy {
    /// `Anna Müller, geb. am DD.MM.YYYY`
    Primary,
    /// Salutation pattern inside the introductory sentence
    IntroSentence,
    /// First PERSON entity inside the introductory sentence
    IntroEntity,
    /// Last `Title Last, First ... geb. am DATE` in the whole document
    DocumentScan,
}

/// A resolved patient name with whatever came along with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    /// `"FirstName LastName"`
    pub name: String,
    /// Birth date as DD.MM.YYYY, when the strategy found one
    pub birth_date: Option<String>,
    /// Salutation found alongside the name
    pub honorific: Option<Honorific>,
    /// Strategy that produced the candidate
    pub strategy: NameStrategy,
}

/// Run the chain over one document
///
/// `recognizer` is `None` when the entity fallback is disabled. Recognizer
/// failures are logged against `source_id` and treated as "no entity".
pub(crate) fn resolve<R>(
    library: &GrammarLibrary,
    recognizer: Option<&R>,
    text: &str,
    source_id: &str,
) -> Option<NameCandidate>
where
    R: EntityRecognizer,
    R::Error: Display,
{
    if let Some(candidate) = primary(library, text) {
        return Some(candidate);
    }

    match sentence::find_sentence(text, |s| library.is_intro_sentence(s)) {
        Some(intro) => {
            debug!("{}: name fallback on introductory sentence", source_id);
            intro_sentence(intro)
                .or_else(|| recognizer.and_then(|r| intro_entity(r, intro, source_id)))
        }
        None => document_scan(text),
    }
}

fn primary(library: &GrammarLibrary, text: &str) -> Option<NameCandidate> {
    let found = library.name_birth_date.first_match(text)?;
    let (honorific, name) = split_honorific(found.group("name")?);

    // "Frau Müller, geb. am" leaves only the surname, which still counts
    if name.is_empty() {
        return None;
    }

    Some(NameCandidate {
        name,
        birth_date: found.group("birth_date").map(str::to_string),
        honorific,
        strategy: NameStrategy::Primary,
    })
}

fn intro_sentence(sentence: &str) -> Option<NameCandidate> {
    let captures = TITLE_FIRST_LAST
        .captures(sentence)
        .or_else(|| TITLE_LAST_FIRST.captures(sentence))?;

    Some(NameCandidate {
        name: first_last(&captures)?,
        birth_date: sentence_birth_date(sentence),
        honorific: captures.name("title").and_then(|t| Honorific::parse(t.as_str())),
        strategy: NameStrategy::IntroSentence,
    })
}

fn intro_entity<R>(recognizer: &R, sentence: &str, source_id: &str) -> Option<NameCandidate>
where
    R: EntityRecognizer,
    R::Error: Display,
{
    let entities = match recognizer.recognize(sentence) {
        Ok(entities) => entities,
        Err(e) => {
            warn!("{}: entity recognition failed: {}", source_id, e);
            return None;
        }
    };

    let person = entities.into_iter().find(|entity| entity.is_person())?;
    let (embedded, raw_name) = split_honorific(&person.text);
    let name = normalize_person_name(&raw_name);
    if name.is_empty() {
        return None;
    }

    let honorific = embedded.or_else(|| {
        HONORIFIC
            .captures(sentence)
            .and_then(|c| c.name("title"))
            .and_then(|t| Honorific::parse(t.as_str()))
    });

    Some(NameCandidate {
        name,
        birth_date: sentence_birth_date(sentence),
        honorific,
        strategy: NameStrategy::IntroEntity,
    })
}

fn document_scan(text: &str) -> Option<NameCandidate> {
    // Letters often list other patients first; the last mention is the
    // definitive one
    let captures = DOCUMENT_SCAN.captures_iter(text).last()?;

    Some(NameCandidate {
        name: first_last(&captures)?,
        birth_date: captures.name("birth_date").map(|m| m.as_str().to_string()),
        honorific: captures.name("title").and_then(|t| Honorific::parse(t.as_str())),
        strategy: NameStrategy::DocumentScan,
    })
}

fn first_last(captures: &Captures<'_>) -> Option<String> {
    let first = captures.name("first")?.as_str();
    let last = captures.name("last")?.as_str();
    Some(collapse_whitespace(&format!("{} {}", first, last)))
}

fn sentence_birth_date(sentence: &str) -> Option<String> {
    SENTENCE_BIRTH_DATE
        .captures(sentence)
        .and_then(|c| c.name("birth_date"))
        .map(|m| m.as_str().to_string())
}
