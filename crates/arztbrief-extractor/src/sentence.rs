//! Sentence segmentation for the introductory-phrase fallback
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace and an upper-case
//! letter, or at a blank line. Periods after common German abbreviations and
//! single-letter initials never end a sentence, so `geb. am` and `Dr. med.`
//! stay inside the sentence that names the patient.

/// Abbreviations whose trailing period is not a sentence boundary
const ABBREVIATIONS: &[&str] = &[
    "geb", "Dr", "Prof", "med", "ca", "Fr", "Hr", "Nr", "bzw", "Pat", "Str", "Tel", "vs",
];

/// Split text into trimmed, non-empty sentences in document order
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        let is_boundary = match ch {
            '.' | '!' | '?' => closes_sentence(text, start, idx, end),
            '\n' => text[end..]
                .trim_start_matches([' ', '\t', '\r'])
                .starts_with('\n'),
            _ => false,
        };

        if is_boundary {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// First sentence for which `predicate` holds
pub fn find_sentence<'t>(text: &'t str, predicate: impl Fn(&str) -> bool) -> Option<&'t str> {
    split_sentences(text).into_iter().find(|s| predicate(s))
}

fn closes_sentence(text: &str, start: usize, punct: usize, end: usize) -> bool {
    let rest = &text[end..];
    let next = rest.trim_start();
    if next.len() == rest.len() && !rest.is_empty() {
        // "01.02.1960", "z.B."
        return false;
    }
    match next.chars().next() {
        None => true,
        Some(c) if !c.is_uppercase() => false,
        Some(_) => {
            let word = text[start..punct]
                .rsplit(|c: char| !c.is_alphanumeric())
                .next()
                .unwrap_or("");
            !is_abbreviation(word)
        }
    }
}

fn is_abbreviation(word: &str) -> bool {
    let mut chars = word.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    single_letter || ABBREVIATIONS.contains(&word)
}

fn push_trimmed<'t>(sentences: &mut Vec<&'t str>, candidate: &'t str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
