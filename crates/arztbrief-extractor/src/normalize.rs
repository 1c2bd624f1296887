//! Value Normalizer
//!
//! Cleans individual field values after a grammar matched. Values stay text:
//! numbers are never stored pre-converted, so the original wording survives
//! for auditing.

use arztbrief_domain::Honorific;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RESIDUAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\d+").expect("valid regex"));

static T_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[cpr]?T(?:is|\d+[a-z]?)").expect("valid regex"));

static N_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[cpr]?N(?:[0-3][a-z]?|x)").expect("valid regex"));

static M_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[cpr]?M(?:[01][a-z]?|x)").expect("valid regex"));

/// Collapse every whitespace run into a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a raw TNM composite
///
/// Residual-tumor markers (`R0`, `R1`, ...) are removed when requested; the
/// match is case-sensitive so lower-case prefixes such as `rT2` survive.
pub fn clean_tumor_status(raw: &str, strip_residual_markers: bool) -> String {
    if strip_residual_markers {
        collapse_whitespace(&RESIDUAL_MARKER.replace_all(raw, " "))
    } else {
        collapse_whitespace(raw)
    }
}

/// One component of a TNM stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TnmComponent {
    /// Primary tumor
    T,
    /// Regional lymph nodes
    N,
    /// Distant metastasis
    M,
}

impl TnmComponent {
    /// All components in staging order
    pub const ALL: [TnmComponent; 3] = [TnmComponent::T, TnmComponent::N, TnmComponent::M];

    /// Component letter
    pub fn letter(&self) -> char {
        match self {
            TnmComponent::T => 'T',
            TnmComponent::N => 'N',
            TnmComponent::M => 'M',
        }
    }

    fn grammar(&self) -> &'static Regex {
        match self {
            TnmComponent::T => &*T_COMPONENT,
            TnmComponent::N => &*N_COMPONENT,
            TnmComponent::M => &*M_COMPONENT,
        }
    }
}

impl fmt::Display for TnmComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The T, N and M components found in a TNM composite, upper-cased
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TnmComponents {
    /// Primary tumor, e.g. `CT2B`
    pub t: Option<String>,
    /// Lymph nodes, e.g. `CN1A`
    pub n: Option<String>,
    /// Metastasis, e.g. `CM0`
    pub m: Option<String>,
}

impl TnmComponents {
    /// Decompose a TNM composite
    ///
    /// The text is scanned token by token (whitespace and commas separate
    /// tokens); for each component the first token containing a match wins.
    pub fn parse(status: &str) -> Self {
        let tokens: Vec<&str> = status
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .collect();

        let find = |component: TnmComponent| {
            tokens.iter().find_map(|token| {
                component
                    .grammar()
                    .find(token)
                    .map(|m| m.as_str().to_uppercase())
            })
        };

        Self {
            t: find(TnmComponent::T),
            n: find(TnmComponent::N),
            m: find(TnmComponent::M),
        }
    }

    /// Get one component
    pub fn get(&self, component: TnmComponent) -> Option<&str> {
        match component {
            TnmComponent::T => self.t.as_deref(),
            TnmComponent::N => self.n.as_deref(),
            TnmComponent::M => self.m.as_deref(),
        }
    }

    /// Components with no match, in staging order
    pub fn missing(&self) -> Vec<TnmComponent> {
        TnmComponent::ALL
            .into_iter()
            .filter(|component| self.get(*component).is_none())
            .collect()
    }

    /// Whether all three components were found
    pub fn is_complete(&self) -> bool {
        self.t.is_some() && self.n.is_some() && self.m.is_some()
    }
}

/// Format an ECOG capture: `"d1-d2"` when a second digit was captured
///
/// The range is not validated; `"3-1"` is stored as written.
pub fn normalize_ecog(first: &str, second: Option<&str>) -> String {
    match second {
        Some(second) => format!("{}-{}", first.trim(), second.trim()),
        None => first.trim().to_string(),
    }
}

/// Split an allergy line on `;`, keeping trimmed, non-empty items in order
///
/// An empty result means "allergy line present but empty", which is
/// different from no allergy line at all.
pub fn split_allergies(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pack years without internal whitespace (`"40 py"` becomes `"40py"`)
pub fn normalize_pack_years(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Coerce a stored numeric string for validity checks (`,` is a decimal
/// separator)
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a salutation off a captured name
///
/// `"Frau Anna Müller"` becomes `(Some(Frau), "Anna Müller")`. The salutation
/// may sit anywhere in the capture; it is dropped together with every token
/// in front of it (`"Patientin Frau Anna Müller"` also yields `"Anna Müller"`).
pub fn split_honorific(raw: &str) -> (Option<Honorific>, String) {
    let name = collapse_whitespace(raw);
    let tokens: Vec<&str> = name.split(' ').collect();
    let found = tokens
        .iter()
        .enumerate()
        .find_map(|(index, token)| Honorific::parse(token).map(|h| (index, h)));

    match found {
        Some((index, honorific)) => (Some(honorific), tokens[index + 1..].join(" ")),
        None => (None, name),
    }
}

/// Bring a person name into `"FirstName LastName"` order
///
/// `"Müller, Anna"` becomes `"Anna Müller"`; anything else is only
/// whitespace-collapsed.
pub fn normalize_person_name(raw: &str) -> String {
    match raw.split_once(',') {
        Some((last, first)) if !last.trim().is_empty() && !first.trim().is_empty() => {
            collapse_whitespace(&format!("{} {}", first, last))
        }
        _ => collapse_whitespace(raw),
    }
}
