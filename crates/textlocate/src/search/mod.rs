//! Query tokenization and the backtracking match engine.
//!
//! The engine works right to left: the rightmost tokens of a free-text
//! query are the coarsest ("... Cardiff, UK"), so matching them first pins
//! down a country scope that makes the remaining lookups cheap and
//! unambiguous. Each recognized entity proposes a resume position; the
//! [`matcher`] recurses from there until the whole query is consumed or
//! every alternative is exhausted.

pub mod matcher;
pub mod place;
pub mod postcode;

use textlocate_gazetteer::CountryId;

use crate::access::GazetteerAccess;
use crate::config::QueryOptions;
use crate::hierarchy::HierarchyPrinter;
use crate::results::QueryMatch;

/// One unit of the query text. `raw` keeps the user's casing for dangling
/// reporting; `norm` is what every lookup uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub norm: String,
}

/// Split query text into tokens on whitespace and the separator
/// punctuation common in addresses. Hyphens and apostrophes stay inside
/// tokens; names like "Esch-sur-Alzette" match as stored.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '/'))
        .filter(|part| !part.is_empty())
        .map(|part| Token {
            raw: part.to_string(),
            norm: part.to_lowercase(),
        })
        .collect()
}

/// Everything a recognizer needs to evaluate candidates for one query.
#[derive(Debug)]
pub struct MatchContext<'a, S> {
    pub access: &'a GazetteerAccess<S>,
    pub printer: &'a HierarchyPrinter,
    pub options: &'a QueryOptions,
}

/// A recognized entity covering `span.0..span.1` of the token sequence.
/// `country` is what the remaining tokens get scoped to when the engine
/// recurses past this candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub matched: QueryMatch,
    pub country: CountryId,
    pub span: (usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_separators() {
        let tokens = tokenize("Cardiff, Wales;UK");
        let norms: Vec<_> = tokens.iter().map(|t| t.norm.as_str()).collect();
        assert_eq!(norms, vec!["cardiff", "wales", "uk"]);
    }

    #[test]
    fn test_tokenize_preserves_raw_casing() {
        let tokens = tokenize("Esch-sur-Alzette LU");
        assert_eq!(tokens[0].raw, "Esch-sur-Alzette");
        assert_eq!(tokens[0].norm, "esch-sur-alzette");
        assert_eq!(tokens[1].raw, "LU");
    }

    #[test]
    fn test_tokenize_collapses_empty_parts() {
        assert!(tokenize("  ,; /  ").is_empty());
        assert_eq!(tokenize(" a ,, b ").len(), 2);
    }
}
