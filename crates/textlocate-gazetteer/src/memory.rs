//! In-memory gazetteer backend.
//!
//! Holds the whole reference set in hash maps with lowercased lookup keys,
//! built once through [`MemoryGazetteerBuilder`] and immutable afterwards.
//! Suitable for embedded data sets and tests; larger deployments put a
//! database behind [`GazetteerStore`] instead.

use ahash::{HashMap, HashMapExt};
use tracing::debug;

use crate::error::Result;
use crate::rows::{
    CountryId, CountryRow, LangId, NameRow, PlaceId, PlaceRow, PostcodeId, PostcodeRow, TypeId,
};
use crate::store::GazetteerStore;

/// Accumulates rows, then freezes them into a [`MemoryGazetteer`].
///
/// Rows may be added in any order. Referential integrity is not checked
/// here; dangling references surface later as integrity errors from the
/// query layer, which also means tests can build broken fixtures.
#[derive(Debug, Default)]
pub struct MemoryGazetteerBuilder {
    countries: Vec<CountryRow>,
    places: Vec<PlaceRow>,
    postcodes: Vec<PostcodeRow>,
    names: Vec<NameRow>,
    types: Vec<(String, TypeId)>,
}

impl MemoryGazetteerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(&mut self, row: CountryRow) -> &mut Self {
        self.countries.push(row);
        self
    }

    pub fn place(&mut self, row: PlaceRow) -> &mut Self {
        self.places.push(row);
        self
    }

    pub fn postcode(&mut self, row: PostcodeRow) -> &mut Self {
        self.postcodes.push(row);
        self
    }

    /// Attach a localized name to a place. The canonical casing is kept for
    /// display; lookups go through a lowercased index.
    pub fn name(&mut self, place: PlaceId, lang: LangId, name: impl Into<String>) -> &mut Self {
        self.names.push(NameRow {
            place_id: place,
            lang_id: lang,
            name: name.into(),
        });
        self
    }

    /// Register a semantic place type such as `"country"`.
    pub fn semantic_type(&mut self, name: impl Into<String>, id: TypeId) -> &mut Self {
        self.types.push((name.into().to_lowercase(), id));
        self
    }

    /// Freeze the accumulated rows into lookup indexes.
    #[must_use]
    pub fn build(&mut self) -> MemoryGazetteer {
        let mut countries = HashMap::with_capacity(self.countries.len());
        let mut iso2_index: HashMap<String, Vec<CountryId>> = HashMap::new();
        for row in self.countries.drain(..) {
            iso2_index
                .entry(row.iso2.to_lowercase())
                .or_default()
                .push(row.id);
            countries.insert(row.id, row);
        }

        let mut places = HashMap::with_capacity(self.places.len());
        let mut country_type_places: HashMap<(CountryId, TypeId), Vec<PlaceId>> = HashMap::new();
        for row in self.places.drain(..) {
            if let Some(type_id) = row.type_id {
                country_type_places
                    .entry((row.country_id, type_id))
                    .or_default()
                    .push(row.id);
            }
            places.insert(row.id, row);
        }

        let mut names_by_place: HashMap<PlaceId, Vec<NameRow>> = HashMap::new();
        let mut places_by_name: HashMap<String, Vec<PlaceId>> = HashMap::new();
        for row in self.names.drain(..) {
            places_by_name
                .entry(row.name.to_lowercase())
                .or_default()
                .push(row.place_id);
            names_by_place.entry(row.place_id).or_default().push(row);
        }

        let mut postcodes = HashMap::with_capacity(self.postcodes.len());
        let mut postcodes_by_main: HashMap<String, Vec<PostcodeId>> = HashMap::new();
        for row in self.postcodes.drain(..) {
            postcodes_by_main
                .entry(row.main.to_lowercase())
                .or_default()
                .push(row.id);
            postcodes.insert(row.id, row);
        }

        let types: HashMap<String, TypeId> = self.types.drain(..).collect();

        // Postings come back to callers as rows in ascending id order, so
        // sort once here instead of on every query.
        for ids in iso2_index.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for ids in country_type_places.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for ids in places_by_name.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for ids in postcodes_by_main.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for rows in names_by_place.values_mut() {
            rows.sort_by(|a, b| (a.lang_id, &a.name).cmp(&(b.lang_id, &b.name)));
        }

        debug!(
            countries = countries.len(),
            places = places.len(),
            postcodes = postcodes.len(),
            "memory gazetteer built"
        );

        MemoryGazetteer {
            countries,
            iso2_index,
            places,
            postcodes,
            names_by_place,
            places_by_name,
            country_type_places,
            postcodes_by_main,
            types,
        }
    }
}

fn in_scope(scope: &[CountryId], country: CountryId) -> bool {
    scope.is_empty() || scope.contains(&country)
}

/// Immutable in-memory [`GazetteerStore`] implementation.
#[derive(Debug)]
pub struct MemoryGazetteer {
    countries: HashMap<CountryId, CountryRow>,
    iso2_index: HashMap<String, Vec<CountryId>>,
    places: HashMap<PlaceId, PlaceRow>,
    postcodes: HashMap<PostcodeId, PostcodeRow>,
    names_by_place: HashMap<PlaceId, Vec<NameRow>>,
    places_by_name: HashMap<String, Vec<PlaceId>>,
    country_type_places: HashMap<(CountryId, TypeId), Vec<PlaceId>>,
    postcodes_by_main: HashMap<String, Vec<PostcodeId>>,
    types: HashMap<String, TypeId>,
}

impl MemoryGazetteer {
    #[must_use]
    pub fn builder() -> MemoryGazetteerBuilder {
        MemoryGazetteerBuilder::new()
    }

    fn postcode_rows(
        &self,
        main: &str,
        scope: &[CountryId],
        keep: impl Fn(&PostcodeRow) -> bool,
    ) -> Vec<PostcodeRow> {
        self.postcodes_by_main
            .get(main)
            .into_iter()
            .flatten()
            .filter_map(|id| self.postcodes.get(id))
            .filter(|row| in_scope(scope, row.country_id) && keep(row))
            .cloned()
            .collect()
    }
}

impl GazetteerStore for MemoryGazetteer {
    fn countries_by_iso2(&self, iso2: &str) -> Result<Vec<CountryRow>> {
        Ok(self
            .iso2_index
            .get(iso2)
            .into_iter()
            .flatten()
            .filter_map(|id| self.countries.get(id))
            .cloned()
            .collect())
    }

    fn country_by_id(&self, id: CountryId) -> Result<Option<CountryRow>> {
        Ok(self.countries.get(&id).cloned())
    }

    fn place_by_id(&self, id: PlaceId) -> Result<Option<PlaceRow>> {
        Ok(self.places.get(&id).cloned())
    }

    fn postcode_by_id(&self, id: PostcodeId) -> Result<Option<PostcodeRow>> {
        Ok(self.postcodes.get(&id).cloned())
    }

    fn names_for_place(&self, place: PlaceId) -> Result<Vec<NameRow>> {
        Ok(self.names_by_place.get(&place).cloned().unwrap_or_default())
    }

    fn country_place_names(&self, country: CountryId, place_type: TypeId) -> Result<Vec<NameRow>> {
        Ok(self
            .country_type_places
            .get(&(country, place_type))
            .into_iter()
            .flatten()
            .filter_map(|id| self.names_by_place.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    fn type_id_by_name(&self, name: &str) -> Result<Option<TypeId>> {
        Ok(self.types.get(name).copied())
    }

    fn places_named(&self, name: &str, scope: &[CountryId]) -> Result<Vec<PlaceRow>> {
        Ok(self
            .places_by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.places.get(id))
            .filter(|row| in_scope(scope, row.country_id))
            .cloned()
            .collect())
    }

    fn postcodes_by_main(&self, main: &str, scope: &[CountryId]) -> Result<Vec<PostcodeRow>> {
        Ok(self.postcode_rows(main, scope, |_| true))
    }

    fn postcodes_by_main_sup(
        &self,
        main: &str,
        sup: &str,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeRow>> {
        Ok(self.postcode_rows(main, scope, |row| {
            row.sup.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(sup))
        }))
    }

    fn postcodes_by_main_no_sup(
        &self,
        main: &str,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeRow>> {
        Ok(self.postcode_rows(main, scope, |row| row.sup.is_none()))
    }
}
