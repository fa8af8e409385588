//! Place and country candidates for a token suffix.
//!
//! Every contiguous token run ending at `end` is tried as one gazetteer
//! name, widest run first. A hit on a place that carries the "country"
//! semantic type is promoted to a [`QueryMatch::Country`] so a bare
//! country mention scopes the rest of the query instead of resolving to
//! the country's own tree node.

use itertools::Itertools;
use textlocate_gazetteer::{CountryId, GazetteerStore, PlaceRow};

use crate::access::Result;
use crate::results::{CountryMatch, PlaceMatch, QueryMatch};
use crate::search::{Candidate, MatchContext, Token};

/// All place and country interpretations of token runs ending at `end`.
///
/// Candidates are ordered widest span first; rows inside one span keep
/// the store's ascending id order. `span.0` of each candidate is where
/// the engine resumes matching.
pub fn place_candidates<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    tokens: &[Token],
    end: usize,
    scope: &[CountryId],
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for start in 0..end {
        let name = tokens[start..end].iter().map(|t| t.norm.as_str()).join(" ");
        for row in ctx.access.places_named(&name, scope)? {
            candidates.push(candidate_for_row(ctx, &row, (start, end))?);
        }
    }
    Ok(candidates)
}

fn candidate_for_row<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    row: &PlaceRow,
    span: (usize, usize),
) -> Result<Candidate> {
    let langs = &ctx.options.languages;
    let country_type = ctx.access.type_id("country")?;
    let matched = if country_type.is_some_and(|t| row.is_type(t)) {
        let name = ctx.access.country_display_name(row.country_id, langs)?;
        QueryMatch::Country(CountryMatch {
            id: row.country_id,
            name: name.clone(),
            pretty_path: name,
        })
    } else {
        QueryMatch::Place(PlaceMatch {
            id: row.id,
            name: ctx.access.place_name(row.id, langs)?,
            location: row.location,
            country_id: row.country_id,
            parent_id: row.parent_id,
            population: row.population,
            pretty_path: ctx.printer.pretty_path(ctx.access, row.id, langs)?,
        })
    };
    Ok(Candidate {
        matched,
        country: row.country_id,
        span,
    })
}
