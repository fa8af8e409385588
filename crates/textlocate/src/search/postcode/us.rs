//! US zip code recognition.

use once_cell::sync::Lazy;
use regex::Regex;
use textlocate_gazetteer::{CountryId, GazetteerStore};

use crate::access::Result;
use crate::search::postcode::{PostcodeCandidate, PostcodeRecognizer};
use crate::search::{MatchContext, Token};

/// A "+4" extension is exactly four digits; anything longer is a zip in
/// its own right.
static RE_ZIP_PLUS4: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9]{4}$").expect("zip+4 pattern"));

/// Recognizer for US zip codes.
#[derive(Debug, Default)]
pub struct UsPostcodes;

impl UsPostcodes {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S: GazetteerStore> PostcodeRecognizer<S> for UsPostcodes {
    fn country_codes(&self) -> &[&'static str] {
        &["US"]
    }

    fn match_at(
        &self,
        ctx: &MatchContext<'_, S>,
        tokens: &[Token],
        end: usize,
        countries: &[CountryId],
    ) -> Result<Vec<PostcodeCandidate>> {
        let mut candidates = zip_candidates(ctx, tokens, end, countries)?;

        // "12345 6789" carries the zip left of its +4 extension: when the
        // rightmost token is a pure four-digit group, the token to its
        // left is also read as the zip and the pair consumed together.
        if end >= 2 && RE_ZIP_PLUS4.is_match(&tokens[end - 1].norm) {
            candidates.extend(zip_candidates(ctx, tokens, end - 1, countries)?);
        }

        Ok(candidates)
    }
}

/// Every row whose zip equals the token at `end - 1`, in id order. Unlike
/// the UK cascade there is no backing off; zips either match exactly or
/// not at all.
fn zip_candidates<S: GazetteerStore>(
    ctx: &MatchContext<'_, S>,
    tokens: &[Token],
    end: usize,
    countries: &[CountryId],
) -> Result<Vec<PostcodeCandidate>> {
    let token = &tokens[end - 1].norm;
    let rows = ctx.access.postcodes_by_main(token, countries)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let us_id = ctx.access.country_id_for_iso2("US")?;
    let langs = &ctx.options.languages;
    let mut candidates = Vec::with_capacity(rows.len());
    for row in rows {
        let text = row.main.clone();
        let mut pretty_path = ctx
            .printer
            .postcode_pretty_path(ctx.access, &row, &text, langs)?;
        // Seen from abroad, a bare zip is ambiguous; anchor it with the
        // country name.
        if ctx.options.host_country != us_id {
            pretty_path = format!(
                "{pretty_path}, {}",
                ctx.access.country_display_name(row.country_id, langs)?
            );
        }
        candidates.push(PostcodeCandidate {
            row,
            text,
            pretty_path,
            resume: end - 1,
        });
    }
    Ok(candidates)
}
