//! Administrative-hierarchy pretty printing.
//!
//! A matched entity is rendered as its own name followed by the names of
//! selected ancestors, nearest first: `"Swansea, Wales, United Kingdom"`.
//! Not every ancestor is worth printing; each country decides which admin
//! levels carry meaning for an address, so the walk filters ancestors
//! against a per-country allow-set keyed by ISO code. OSM boundary tagging
//! conventions are the reference for choosing the levels.

use ahash::{HashSet, HashSetExt};
use textlocate_gazetteer::{GazetteerStore, LangId, PlaceId, PostcodeRow};

use crate::access::{GazetteerAccess, IntegrityError, Result};
use crate::cache::{BoundedCache, LARGE_CACHE_CAPACITY};

const DEFAULT_ADMIN_LEVELS: &[u8] = &[2, 4, 6, 8];

/// Admin levels worth printing for a country, by ISO 3166-1 alpha-2 code.
fn admin_levels(iso2: &str) -> &'static [u8] {
    match iso2.to_ascii_uppercase().as_str() {
        "LU" => &[2, 6, 8],
        "GB" => &[2, 4, 6, 8],
        _ => DEFAULT_ADMIN_LEVELS,
    }
}

/// Renders ancestor-chain paths, memoizing per place and language
/// preference.
#[derive(Debug)]
pub struct HierarchyPrinter {
    paths: BoundedCache<(PlaceId, Vec<LangId>), String>,
}

impl Default for HierarchyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: BoundedCache::new(LARGE_CACHE_CAPACITY),
        }
    }

    /// Render the pretty path of a place.
    ///
    /// The place's own name is always included. Ancestors are appended in
    /// walk order when their admin level is in the country's allow-set. A
    /// parent chain that revisits an id is reported as corruption rather
    /// than walked forever.
    pub fn pretty_path<S: GazetteerStore>(
        &self,
        access: &GazetteerAccess<S>,
        place: PlaceId,
        langs: &[LangId],
    ) -> Result<String> {
        let key = (place, langs.to_vec());
        if let Some(path) = self.paths.get(&key) {
            return Ok(path);
        }

        let row = access.place(place)?;
        let mut path = access.place_name(place, langs)?;
        let iso2 = access.country(row.country_id)?.iso2;
        let levels = admin_levels(&iso2);

        let mut seen = HashSet::new();
        seen.insert(place);
        let mut next = row.parent_id;
        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                return Err(IntegrityError::ParentCycle(parent_id).into());
            }
            let parent = access.place(parent_id)?;
            if parent.admin_level.is_some_and(|level| levels.contains(&level)) {
                path.push_str(", ");
                path.push_str(&access.place_name(parent_id, langs)?);
            }
            next = parent.parent_id;
        }

        self.paths.insert(key, path.clone());
        Ok(path)
    }

    /// Render the pretty path of a postcode: the matched text, then the
    /// path of the place the postcode hangs off, when it is linked to one.
    pub fn postcode_pretty_path<S: GazetteerStore>(
        &self,
        access: &GazetteerAccess<S>,
        row: &PostcodeRow,
        text: &str,
        langs: &[LangId],
    ) -> Result<String> {
        match row.parent_id {
            Some(parent) => Ok(format!(
                "{text}, {}",
                self.pretty_path(access, parent, langs)?
            )),
            None => Ok(text.to_string()),
        }
    }

    pub fn flush(&self) {
        self.paths.clear();
    }
}
