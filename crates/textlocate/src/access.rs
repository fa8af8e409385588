//! Cached, typed access to a [`GazetteerStore`].
//!
//! The matcher backtracks heavily, re-asking for the same countries, places
//! and names many times per query. [`GazetteerAccess`] sits between the
//! matcher and the backend, memoizing each lookup in a [`BoundedCache`] and
//! turning raw row answers into typed results with integrity checking: a
//! dangling id or a bad ISO code row count is a data problem and comes back
//! as an [`IntegrityError`] rather than a silent miss.
//!
//! Normalization happens here too. Every textual argument is lowercased
//! before it reaches the store, so callers can pass user text as-is.

use textlocate_gazetteer::{
    CountryId, CountryRow, GazetteerStore, LangId, NameRow, PlaceId, PlaceRow, PostcodeId,
    PostcodeRow, StoreError, TypeId,
};
use thiserror::Error;
use tracing::debug;

use crate::cache::{BoundedCache, CacheStats, LARGE_CACHE_CAPACITY, SMALL_CACHE_CAPACITY};

/// Reference-data problems that make a correct answer impossible.
///
/// These indicate a broken gazetteer load, not a bad query, and are never
/// produced for ordinary "nothing found" situations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("expected exactly one country for ISO code {iso2:?}, found {found}")]
    CountryIso2RowCount { iso2: String, found: usize },
    #[error("unknown country id {0}")]
    UnknownCountry(CountryId),
    #[error("unknown place id {0}")]
    UnknownPlace(PlaceId),
    #[error("unknown postcode id {0}")]
    UnknownPostcode(PostcodeId),
    #[error("place {0} has no name in any language")]
    MissingName(PlaceId),
    #[error("ancestor cycle detected at place {0}")]
    ParentCycle(PlaceId),
    #[error("expected at most one postcode row for {main:?}/{sup:?}, found {found}")]
    PostcodeRowCount {
        main: String,
        sup: Option<String>,
        found: usize,
    },
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("data integrity violation: {0}")]
    Integrity(#[from] IntegrityError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AccessError>;

/// Pick the first name matching the caller's language preference, walking
/// the preference list in order.
fn pick_name(names: &[NameRow], langs: &[LangId]) -> Option<String> {
    langs.iter().find_map(|lang| {
        names
            .iter()
            .find(|row| row.lang_id == *lang)
            .map(|row| row.name.clone())
    })
}

/// Memoizing front-end over a gazetteer backend.
///
/// All methods take `&self`; the caches lock internally, so one instance
/// serves any number of threads.
#[derive(Debug)]
pub struct GazetteerAccess<S> {
    store: S,
    countries: BoundedCache<CountryId, CountryRow>,
    country_ids: BoundedCache<String, CountryId>,
    country_names: BoundedCache<(CountryId, Vec<LangId>), String>,
    places: BoundedCache<PlaceId, PlaceRow>,
    place_names: BoundedCache<(PlaceId, Vec<LangId>), String>,
    place_lookups: BoundedCache<(String, Vec<CountryId>), Vec<PlaceRow>>,
    postcodes: BoundedCache<PostcodeId, PostcodeRow>,
    type_ids: BoundedCache<String, Option<TypeId>>,
}

impl<S: GazetteerStore> GazetteerAccess<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            countries: BoundedCache::new(LARGE_CACHE_CAPACITY),
            country_ids: BoundedCache::new(LARGE_CACHE_CAPACITY),
            country_names: BoundedCache::new(LARGE_CACHE_CAPACITY),
            places: BoundedCache::new(LARGE_CACHE_CAPACITY),
            place_names: BoundedCache::new(LARGE_CACHE_CAPACITY),
            place_lookups: BoundedCache::new(LARGE_CACHE_CAPACITY),
            postcodes: BoundedCache::new(LARGE_CACHE_CAPACITY),
            type_ids: BoundedCache::new(SMALL_CACHE_CAPACITY),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an ISO 3166-1 alpha-2 code to a country id.
    ///
    /// `Ok(None)` is only for empty input. Reference data must carry every
    /// code that is asked for; any row count other than exactly one, zero
    /// included, is reported as corruption.
    pub fn country_id_for_iso2(&self, iso2: &str) -> Result<Option<CountryId>> {
        if iso2.is_empty() {
            return Ok(None);
        }
        let key = iso2.to_lowercase();
        if let Some(hit) = self.country_ids.get(&key) {
            return Ok(Some(hit));
        }
        let mut rows = self.store.countries_by_iso2(&key)?;
        if rows.len() == 1
            && let Some(row) = rows.pop()
        {
            let id = row.id;
            self.countries.insert(id, row);
            self.country_ids.insert(key, id);
            return Ok(Some(id));
        }
        Err(IntegrityError::CountryIso2RowCount {
            iso2: key,
            found: rows.len(),
        }
        .into())
    }

    /// Fetch a country row that is referenced by id. A missing row is an
    /// integrity error: ids only come from other gazetteer rows.
    pub fn country(&self, id: CountryId) -> Result<CountryRow> {
        if let Some(row) = self.countries.get(&id) {
            return Ok(row);
        }
        let row = self
            .store
            .country_by_id(id)?
            .ok_or(IntegrityError::UnknownCountry(id))?;
        self.countries.insert(id, row.clone());
        Ok(row)
    }

    /// The display name of a country in the caller's preferred language.
    ///
    /// Prefers the localized names of the place row of type `"country"`
    /// inside that country, walking the language preference in order, and
    /// falls back to the reference name on the country row itself.
    pub fn country_display_name(&self, country: CountryId, langs: &[LangId]) -> Result<String> {
        let key = (country, langs.to_vec());
        if let Some(name) = self.country_names.get(&key) {
            return Ok(name);
        }
        let name = self.localized_country_name(country, langs)?;
        self.country_names.insert(key, name.clone());
        Ok(name)
    }

    fn localized_country_name(&self, country: CountryId, langs: &[LangId]) -> Result<String> {
        if let Some(type_id) = self.type_id("country")? {
            let names = self.store.country_place_names(country, type_id)?;
            if let Some(name) = pick_name(&names, langs) {
                return Ok(name);
            }
        }
        Ok(self.country(country)?.name)
    }

    pub fn place(&self, id: PlaceId) -> Result<PlaceRow> {
        if let Some(row) = self.places.get(&id) {
            return Ok(row);
        }
        let row = self
            .store
            .place_by_id(id)?
            .ok_or(IntegrityError::UnknownPlace(id))?;
        self.places.insert(id, row.clone());
        Ok(row)
    }

    /// The display name of a place in the caller's preferred language,
    /// falling back to the first name in any language. A place with no
    /// names at all is reported as corruption.
    pub fn place_name(&self, place: PlaceId, langs: &[LangId]) -> Result<String> {
        let key = (place, langs.to_vec());
        if let Some(name) = self.place_names.get(&key) {
            return Ok(name);
        }
        let names = self.store.names_for_place(place)?;
        let name = pick_name(&names, langs)
            .or_else(|| names.first().map(|row| row.name.clone()))
            .ok_or(IntegrityError::MissingName(place))?;
        self.place_names.insert(key, name.clone());
        Ok(name)
    }

    pub fn postcode(&self, id: PostcodeId) -> Result<PostcodeRow> {
        if let Some(row) = self.postcodes.get(&id) {
            return Ok(row);
        }
        let row = self
            .store
            .postcode_by_id(id)?
            .ok_or(IntegrityError::UnknownPostcode(id))?;
        self.postcodes.insert(id, row.clone());
        Ok(row)
    }

    /// Resolve a semantic type label such as `"country"`. Misses are
    /// cached too; most deployments only carry a handful of types.
    pub fn type_id(&self, name: &str) -> Result<Option<TypeId>> {
        let key = name.to_lowercase();
        if let Some(hit) = self.type_ids.get(&key) {
            return Ok(hit);
        }
        let id = self.store.type_id_by_name(&key)?;
        self.type_ids.insert(key, id);
        Ok(id)
    }

    /// Places whose name matches `name` within `scope` (empty scope means
    /// everywhere), in ascending id order. Fetched rows also warm the
    /// by-id cache, since hierarchy walks will ask for them next.
    pub fn places_named(&self, name: &str, scope: &[CountryId]) -> Result<Vec<PlaceRow>> {
        let key = (name.to_lowercase(), scope.to_vec());
        if let Some(rows) = self.place_lookups.get(&key) {
            return Ok(rows);
        }
        let rows = self.store.places_named(&key.0, scope)?;
        for row in &rows {
            self.places.insert(row.id, row.clone());
        }
        self.place_lookups.insert(key, rows.clone());
        Ok(rows)
    }

    // Postcode lookups are uncached; repeats across queries land in the
    // whole-result memo instead.

    pub fn postcodes_by_main(&self, main: &str, scope: &[CountryId]) -> Result<Vec<PostcodeRow>> {
        Ok(self.store.postcodes_by_main(&main.to_lowercase(), scope)?)
    }

    pub fn postcodes_by_main_sup(
        &self,
        main: &str,
        sup: &str,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeRow>> {
        Ok(self
            .store
            .postcodes_by_main_sup(&main.to_lowercase(), &sup.to_lowercase(), scope)?)
    }

    pub fn postcodes_by_main_no_sup(
        &self,
        main: &str,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeRow>> {
        Ok(self.store.postcodes_by_main_no_sup(&main.to_lowercase(), scope)?)
    }

    /// Drop every cached entry, forcing the next lookups back to the
    /// store. Needed after reloading reference data underneath a running
    /// resolver.
    pub fn flush(&self) {
        self.countries.clear();
        self.country_ids.clear();
        self.country_names.clear();
        self.places.clear();
        self.place_names.clear();
        self.place_lookups.clear();
        self.postcodes.clear();
        self.type_ids.clear();
        debug!("gazetteer caches flushed");
    }

    /// Per-cache counters, mostly for logging and diagnostics.
    pub fn cache_stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            ("countries", self.countries.stats()),
            ("country_ids", self.country_ids.stats()),
            ("country_names", self.country_names.stats()),
            ("places", self.places.stats()),
            ("place_names", self.place_names.stats()),
            ("place_lookups", self.place_lookups.stats()),
            ("postcodes", self.postcodes.stats()),
            ("type_ids", self.type_ids.stats()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use textlocate_gazetteer::MemoryGazetteer;

    use super::*;

    fn fixture() -> GazetteerAccess<MemoryGazetteer> {
        let mut builder = MemoryGazetteer::builder();
        builder
            .semantic_type("country", TypeId::new(1))
            .country(CountryRow {
                id: CountryId::new(1),
                iso2: "GB".into(),
                name: "United Kingdom".into(),
            })
            .place(PlaceRow {
                id: PlaceId::new(10),
                country_id: CountryId::new(1),
                parent_id: None,
                type_id: Some(TypeId::new(1)),
                admin_level: None,
                population: None,
                location: None,
            })
            .place(PlaceRow {
                id: PlaceId::new(11),
                country_id: CountryId::new(1),
                parent_id: Some(PlaceId::new(10)),
                type_id: None,
                admin_level: Some(4),
                population: None,
                location: None,
            })
            .place(PlaceRow {
                id: PlaceId::new(12),
                country_id: CountryId::new(1),
                parent_id: Some(PlaceId::new(10)),
                type_id: None,
                admin_level: Some(4),
                population: None,
                location: None,
            })
            .name(PlaceId::new(10), LangId::new(1), "United Kingdom")
            .name(PlaceId::new(10), LangId::new(2), "Y Deyrnas Unedig")
            .name(PlaceId::new(11), LangId::new(1), "Swansea")
            .name(PlaceId::new(11), LangId::new(2), "Abertawe");
        GazetteerAccess::new(builder.build())
    }

    #[test]
    fn test_iso2_round_trip() {
        let access = fixture();
        let id = access.country_id_for_iso2("Gb").unwrap();
        assert_eq!(id, Some(CountryId::new(1)));
        assert_eq!(access.country_id_for_iso2("").unwrap(), None);
    }

    #[test]
    fn test_absent_iso2_is_an_integrity_error() {
        let access = fixture();
        let err = access.country_id_for_iso2("im").unwrap_err();
        assert!(matches!(
            err,
            AccessError::Integrity(IntegrityError::CountryIso2RowCount { found: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_iso2_is_an_integrity_error() {
        let mut builder = MemoryGazetteer::builder();
        builder
            .country(CountryRow {
                id: CountryId::new(1),
                iso2: "XX".into(),
                name: "First".into(),
            })
            .country(CountryRow {
                id: CountryId::new(2),
                iso2: "XX".into(),
                name: "Second".into(),
            });
        let access = GazetteerAccess::new(builder.build());

        let err = access.country_id_for_iso2("xx").unwrap_err();
        assert!(matches!(
            err,
            AccessError::Integrity(IntegrityError::CountryIso2RowCount { found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_place_is_an_integrity_error() {
        let access = fixture();
        let err = access.place(PlaceId::new(999)).unwrap_err();
        assert!(matches!(
            err,
            AccessError::Integrity(IntegrityError::UnknownPlace(_))
        ));
    }

    #[test]
    fn test_place_name_prefers_language_order() {
        let access = fixture();
        let welsh_first = [LangId::new(2), LangId::new(1)];
        let english_first = [LangId::new(1), LangId::new(2)];

        let name = access.place_name(PlaceId::new(11), &welsh_first).unwrap();
        assert_eq!(name, "Abertawe");
        let name = access.place_name(PlaceId::new(11), &english_first).unwrap();
        assert_eq!(name, "Swansea");
    }

    #[test]
    fn test_place_name_falls_back_to_any_language() {
        let access = fixture();
        // No name in language 9; the first stored name (ordered by
        // language id) stands in.
        let name = access.place_name(PlaceId::new(11), &[LangId::new(9)]).unwrap();
        assert_eq!(name, "Swansea");
    }

    #[test]
    fn test_place_without_names_is_an_integrity_error() {
        let access = fixture();
        let err = access
            .place_name(PlaceId::new(12), &[LangId::new(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::Integrity(IntegrityError::MissingName(_))
        ));
    }

    #[test]
    fn test_country_display_name_localizes_and_falls_back() {
        let access = fixture();
        let name = access
            .country_display_name(CountryId::new(1), &[LangId::new(2)])
            .unwrap();
        assert_eq!(name, "Y Deyrnas Unedig");

        // No names for an unknown language, so the country row's own
        // reference name wins.
        let name = access
            .country_display_name(CountryId::new(1), &[LangId::new(9)])
            .unwrap();
        assert_eq!(name, "United Kingdom");
    }

    #[test]
    fn test_flush_keeps_answers_stable() {
        let access = fixture();
        let before = access.places_named("swansea", &[]).unwrap();
        access.flush();
        let after = access.places_named("swansea", &[]).unwrap();
        assert_eq!(before, after);
    }
}
