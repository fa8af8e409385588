//! UK-style postcode recognition.
//!
//! Gazetteer coverage of UK postcodes is partial: many areas only carry
//! outward codes ("SW1A"), some carry sector rows ("SW1A 2"), fewer carry
//! full unit rows ("SW1A 2AA"). Matching therefore cascades from the most
//! specific reading of the input down to the coarsest row that exists,
//! reporting the text of the row actually matched.

use once_cell::sync::Lazy;
use regex::Regex;
use textlocate_gazetteer::{CountryId, GazetteerStore, PostcodeRow};

use crate::access::{IntegrityError, Result};
use crate::search::postcode::{PostcodeCandidate, PostcodeRecognizer};
use crate::search::{MatchContext, Token};

/// Outward-code shapes: A9, A99, A9A, AA9, AA99, AA9A.
static RE_OUTWARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "^(?:[a-z][0-9]|[a-z][0-9][0-9]|[a-z][0-9][a-z]|[a-z][a-z][0-9]|[a-z][a-z][0-9][0-9]|[a-z][a-z][0-9][a-z])$",
    )
    .expect("outward postcode pattern")
});

/// An outward code optionally followed by an inward "9AA" part.
static RE_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "^(?:[a-z][0-9]|[a-z][0-9][0-9]|[a-z][0-9][a-z]|[a-z][a-z][0-9]|[a-z][a-z][0-9][0-9]|[a-z][a-z][0-9][a-z]) *(?:[0-9][a-z][a-z])?$",
    )
    .expect("full postcode pattern")
});

/// Not every postcode in the UK system belongs to GB; the crown
/// dependencies and overseas territories share the format.
const UK_COUNTRY_CODES: &[&str] = &[
    "GB", "IM", "GY", "JE", "AI", "IO", "FK", "GI", "PN", "GS", "SH", "TC",
];

/// Recognizer for the UK postcode system.
#[derive(Debug, Default)]
pub struct UkPostcodes;

impl UkPostcodes {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S: GazetteerStore> PostcodeRecognizer<S> for UkPostcodes {
    fn country_codes(&self) -> &[&'static str] {
        UK_COUNTRY_CODES
    }

    fn match_at(
        &self,
        ctx: &MatchContext<'_, S>,
        tokens: &[Token],
        end: usize,
        countries: &[CountryId],
    ) -> Result<Vec<PostcodeCandidate>> {
        let mut candidates = Vec::new();

        // Longest span first: a validated two-token full postcode beats
        // the solitary outward reading of the rightmost token, which is
        // only offered when the full attempt finds nothing.
        if end >= 2 {
            let main = &tokens[end - 2].norm;
            let sup = &tokens[end - 1].norm;
            if RE_FULL.is_match(&format!("{main} {sup}"))
                && let Some(candidate) = full_postcode(ctx, main, sup, end, countries)?
            {
                candidates.push(candidate);
            }
        }

        if candidates.is_empty() {
            let token = &tokens[end - 1].norm;
            if RE_OUTWARD.is_match(token)
                && let Some(candidate) = solitary_outward(ctx, token, end, countries)?
            {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }
}

/// The token on its own as an outward code. Rows without a supplementary
/// are the exact reading; failing that, any row under the outward code
/// stands in, first row wins.
fn solitary_outward<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    token: &str,
    end: usize,
    countries: &[CountryId],
) -> Result<Option<PostcodeCandidate>> {
    let mut rows = ctx.access.postcodes_by_main_no_sup(token, countries)?;
    if rows.is_empty() {
        rows = ctx.access.postcodes_by_main(token, countries)?;
    }
    match rows.into_iter().next() {
        Some(row) => {
            // Only the outward text is reported, whatever the row carries.
            let text = row.main.clone();
            candidate(ctx, row, text, end - 1).map(Some)
        }
        None => Ok(None),
    }
}

/// Two tokens as "outward inward", cascading from the most specific row:
/// exact inward, then the sector (first inward character), then the
/// outward code alone. The first tier to produce a row wins.
fn full_postcode<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    main: &str,
    sup: &str,
    end: usize,
    countries: &[CountryId],
) -> Result<Option<PostcodeCandidate>> {
    let rows = ctx.access.postcodes_by_main_sup(main, sup, countries)?;
    if let Some(row) = single(rows, main, sup)? {
        let text = row.text();
        return candidate(ctx, row, text, end - 2).map(Some);
    }

    let sector = &sup[..1];
    let rows = ctx.access.postcodes_by_main_sup(main, sector, countries)?;
    if let Some(row) = single(rows, main, sector)? {
        let text = row.text();
        return candidate(ctx, row, text, end - 2).map(Some);
    }

    // Several rows are expected here; the first is taken.
    let rows = ctx.access.postcodes_by_main(main, countries)?;
    match rows.into_iter().next() {
        Some(row) => {
            let text = row.main.clone();
            candidate(ctx, row, text, end - 2).map(Some)
        }
        None => Ok(None),
    }
}

/// Exact-tier lookups may match at most one row; more is corrupt data.
fn single(mut rows: Vec<PostcodeRow>, main: &str, sup: &str) -> Result<Option<PostcodeRow>> {
    if rows.len() > 1 {
        return Err(IntegrityError::PostcodeRowCount {
            main: main.to_string(),
            sup: Some(sup.to_string()),
            found: rows.len(),
        }
        .into());
    }
    Ok(rows.pop())
}

fn candidate<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    row: PostcodeRow,
    text: String,
    resume: usize,
) -> Result<PostcodeCandidate> {
    let pretty_path =
        ctx.printer
            .postcode_pretty_path(ctx.access, &row, &text, &ctx.options.languages)?;
    Ok(PostcodeCandidate {
        row,
        text,
        pretty_path,
        resume,
    })
}
