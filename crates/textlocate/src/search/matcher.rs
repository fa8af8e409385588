//! Backtracking engine over the token sequence.
//!
//! Matching runs right to left: the engine tries every gazetteer
//! interpretation of a token run ending at the rightmost unconsumed
//! position, then recurses on what is left with the search scoped to the
//! matched entity's country. An interpretation completes when every token
//! is consumed, or, with dangling text allowed, when the unmatched prefix
//! is surrendered after at least one match.

use ahash::{HashSet, HashSetExt};
use itertools::Itertools;
use textlocate_gazetteer::{CountryId, GazetteerStore, PlaceId, PostcodeId};
use tracing::{debug, instrument};

use crate::access::Result;
use crate::results::{QueryMatch, QueryResult};
use crate::search::postcode::RecognizerRegistry;
use crate::search::{Candidate, MatchContext, Token, place};

/// Resolve the whole token sequence against the gazetteer.
///
/// Each completed interpretation contributes its final (leftmost) match;
/// with `show_area` on, the broader matches that scoped it follow, nearest
/// first. With `find_all` off the first completed interpretation is the
/// only one kept.
#[instrument(name = "match_tokens", level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn run<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    registry: &RecognizerRegistry<S>,
    tokens: &[Token],
) -> Result<Vec<QueryResult>> {
    let mut engine = Engine {
        ctx,
        registry,
        tokens,
        results: Vec::new(),
        seen: HashSet::new(),
        done: false,
    };
    let mut chain = Vec::new();
    engine.explore(tokens.len(), &[], &mut chain)?;
    debug!(results = engine.results.len(), "matching finished");
    Ok(engine.results)
}

struct Engine<'a, 'g, S> {
    ctx: &'a MatchContext<'g, S>,
    registry: &'a RecognizerRegistry<S>,
    tokens: &'a [Token],
    results: Vec<QueryResult>,
    seen: HashSet<(EntityKey, (usize, usize))>,
    done: bool,
}

impl<S: GazetteerStore> Engine<'_, '_, S> {
    /// Consume tokens leftward from `end`. `chain` holds the matches made
    /// so far, rightmost first; `scope` is the countries the previous
    /// match narrowed the search to.
    fn explore(
        &mut self,
        end: usize,
        scope: &[CountryId],
        chain: &mut Vec<Candidate>,
    ) -> Result<()> {
        if self.done {
            return Ok(());
        }
        if end == 0 {
            self.emit(chain, None);
            return Ok(());
        }

        let candidates = self.candidates_at(end, scope)?;
        if candidates.is_empty() {
            if self.ctx.options.allow_dangling && !chain.is_empty() {
                let dangling = self.tokens[..end].iter().map(|t| t.raw.as_str()).join(" ");
                self.emit(chain, Some(dangling));
            }
            return Ok(());
        }

        for candidate in candidates {
            if self.done {
                break;
            }
            let resume = candidate.span.0;
            let narrowed = [candidate.country];
            chain.push(candidate);
            self.explore(resume, &narrowed, chain)?;
            chain.pop();
        }
        Ok(())
    }

    /// Place candidates for every run ending at `end`, widest first, then
    /// postcode candidates in recognizer registration order.
    fn candidates_at(&self, end: usize, scope: &[CountryId]) -> Result<Vec<Candidate>> {
        let mut candidates = place::place_candidates(self.ctx, self.tokens, end, scope)?;
        for pc in self.registry.match_at(self.ctx, self.tokens, end, scope)? {
            let country = pc.row.country_id;
            let span = (pc.resume, end);
            candidates.push(Candidate {
                matched: QueryMatch::Postcode(pc.into_match()),
                country,
                span,
            });
        }
        Ok(candidates)
    }

    fn emit(&mut self, chain: &[Candidate], dangling: Option<String>) {
        let Some(specific) = chain.last() else {
            return;
        };
        self.push_result(specific, dangling);
        if self.ctx.options.show_area {
            for area in chain[..chain.len() - 1].iter().rev() {
                self.push_result(area, None);
            }
        }
        if !self.ctx.options.find_all {
            self.done = true;
        }
    }

    /// Append unless the same entity over the same span was already
    /// reported by an earlier interpretation.
    fn push_result(&mut self, candidate: &Candidate, dangling: Option<String>) {
        if !self.seen.insert((entity_key(&candidate.matched), candidate.span)) {
            return;
        }
        let result = match dangling {
            Some(text) => QueryResult::with_dangling(candidate.matched.clone(), text),
            None => QueryResult::new(candidate.matched.clone()),
        };
        self.results.push(result);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityKey {
    Country(CountryId),
    Place(PlaceId),
    Postcode(PostcodeId),
}

fn entity_key(matched: &QueryMatch) -> EntityKey {
    match matched {
        QueryMatch::Country(m) => EntityKey::Country(m.id),
        QueryMatch::Place(m) => EntityKey::Place(m.id),
        QueryMatch::Postcode(m) => EntityKey::Postcode(m.id),
    }
}
