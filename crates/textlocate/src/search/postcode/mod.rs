//! Per-country postcode recognition.
//!
//! Postcode syntax is national, so each format lives behind one
//! [`PostcodeRecognizer`] implementation declaring the ISO country codes it
//! understands. The [`RecognizerRegistry`] picks which recognizers to run
//! for the current country scope; supporting a new country means
//! registering a new entry, the match engine itself never changes.

pub mod uk;
pub mod us;

use std::fmt;

use textlocate_gazetteer::{CountryId, GazetteerStore, PostcodeRow};

use crate::access::Result;
use crate::results::PostcodeMatch;
use crate::search::{MatchContext, Token};

/// A postcode row recognized at some token position.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeCandidate {
    pub row: PostcodeRow,
    /// Matched text in canonical stored casing, which may be coarser than
    /// the input (a sector row for full-postcode input, say).
    pub text: String,
    pub pretty_path: String,
    /// Token position matching resumes from; everything from here to the
    /// candidate's end position was consumed.
    pub resume: usize,
}

impl PostcodeCandidate {
    #[must_use]
    pub fn into_match(self) -> PostcodeMatch {
        PostcodeMatch {
            id: self.row.id,
            name: self.text,
            location: self.row.location,
            country_id: self.row.country_id,
            parent_id: self.row.parent_id,
            pretty_path: self.pretty_path,
        }
    }
}

/// One national postcode format.
///
/// `match_at` inspects the token at `end - 1` (and possibly its left
/// neighbour) and returns every candidate it stands behind, most specific
/// first. An empty vector is the normal "nothing here" answer; errors are
/// reserved for store failures and integrity violations.
pub trait PostcodeRecognizer<S: GazetteerStore>: Send + Sync + fmt::Debug {
    /// ISO 3166-1 alpha-2 codes whose postcodes this recognizer reads.
    /// Several codes may share one format, as with the UK-administered
    /// territories.
    fn country_codes(&self) -> &[&'static str];

    /// Propose candidates for the span ending at `end` (exclusive).
    /// `countries` is the already-intersected id scope; every store query
    /// must be bound to it.
    fn match_at(
        &self,
        ctx: &MatchContext<'_, S>,
        tokens: &[Token],
        end: usize,
        countries: &[CountryId],
    ) -> Result<Vec<PostcodeCandidate>>;
}

/// Holds the registered recognizers and dispatches on country scope.
#[derive(Debug)]
pub struct RecognizerRegistry<S> {
    recognizers: Vec<Box<dyn PostcodeRecognizer<S>>>,
}

impl<S: GazetteerStore> Default for RecognizerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GazetteerStore> RecognizerRegistry<S> {
    /// An empty registry. Queries through it never produce postcode
    /// candidates until something is registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recognizers: Vec::new(),
        }
    }

    /// A registry with the built-in recognizers: UK-style (GB and the
    /// UK-administered territories) and US zip codes.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(uk::UkPostcodes::new()));
        registry.register(Box::new(us::UsPostcodes::new()));
        registry
    }

    pub fn register(&mut self, recognizer: Box<dyn PostcodeRecognizer<S>>) {
        self.recognizers.push(recognizer);
    }

    /// Run every recognizer whose countries intersect `scope` (all of
    /// them when `scope` is empty), in registration order.
    ///
    /// Reference data must carry a row for every registered code; a code
    /// without one surfaces as an integrity error. A recognizer whose
    /// countries all fall outside `scope` is skipped rather than queried
    /// against nothing.
    pub fn match_at(
        &self,
        ctx: &MatchContext<'_, S>,
        tokens: &[Token],
        end: usize,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeCandidate>> {
        let mut candidates = Vec::new();
        for recognizer in &self.recognizers {
            let mut ids = Vec::new();
            for code in recognizer.country_codes() {
                ids.extend(ctx.access.country_id_for_iso2(code)?);
            }
            if !scope.is_empty() {
                ids.retain(|id| scope.contains(id));
            }
            if ids.is_empty() {
                continue;
            }
            candidates.extend(recognizer.match_at(ctx, tokens, end, &ids)?);
        }
        Ok(candidates)
    }
}
