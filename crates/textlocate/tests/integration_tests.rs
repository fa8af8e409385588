//! Integration tests for textlocate query resolution
//!
//! These tests run against the full public API with an in-memory gazetteer
//! covering three countries with different administrative conventions,
//! UK-style postcodes and US ZIP codes.

use std::sync::atomic::{AtomicUsize, Ordering};

use textlocate::gazetteer::error::Result as StoreResult;
use textlocate::gazetteer::{
    CountryRow, GazetteerStore, MemoryGazetteer, NameRow, PlaceRow, PostcodeRow,
};
use textlocate::{
    AccessError, CountryId, GazetteerAccess, IntegrityError, LangId, Location, MalformedInput,
    PlaceId, PostcodeId, QueryOptions, QueryOptionsBuilder, QueryResolver, TextLocateError, TypeId,
};

const LU: CountryId = CountryId::new(1);
const GB: CountryId = CountryId::new(2);
const US: CountryId = CountryId::new(3);
const EN: LangId = LangId::new(1);
const FR: LangId = LangId::new(2);
const COUNTRY_TYPE: TypeId = TypeId::new(1);

fn setup_test_env() {
    let _ = textlocate::init_logging(tracing::Level::WARN);
}

fn place(
    id: u64,
    country: CountryId,
    parent: Option<u64>,
    level: Option<u8>,
    type_id: Option<TypeId>,
) -> PlaceRow {
    PlaceRow {
        id: PlaceId::new(id),
        country_id: country,
        parent_id: parent.map(PlaceId::new),
        type_id,
        admin_level: level,
        population: None,
        location: None,
    }
}

fn postcode(
    id: u64,
    country: CountryId,
    main: &str,
    sup: Option<&str>,
    parent: u64,
) -> PostcodeRow {
    PostcodeRow {
        id: PostcodeId::new(id),
        country_id: country,
        parent_id: Some(PlaceId::new(parent)),
        main: main.into(),
        sup: sup.map(Into::into),
        location: None,
    }
}

/// Three countries with contrasting conventions: Luxembourg renders
/// cantons but skips districts, the UK renders every tier, the US side
/// exists for ZIP codes and ambiguity.
fn test_store() -> MemoryGazetteer {
    let mut builder = MemoryGazetteer::builder();
    builder.semantic_type("country", COUNTRY_TYPE);

    builder
        .country(CountryRow {
            id: LU,
            iso2: "LU".into(),
            name: "Luxembourg".into(),
        })
        .place(place(100, LU, None, Some(2), Some(COUNTRY_TYPE)))
        .name(PlaceId::new(100), EN, "Luxembourg")
        .place(place(101, LU, Some(100), Some(4), None))
        .name(PlaceId::new(101), EN, "District Luxembourg")
        .place(place(102, LU, Some(101), Some(6), None))
        .name(PlaceId::new(102), EN, "Canton Esch")
        .name(PlaceId::new(102), FR, "Canton d'Esch")
        .place(PlaceRow {
            population: Some(36_228),
            ..place(103, LU, Some(102), Some(8), None)
        })
        .name(PlaceId::new(103), EN, "Esch-sur-Alzette")
        .place(place(104, LU, Some(103), None, None))
        .name(PlaceId::new(104), EN, "Belval");

    builder
        .country(CountryRow {
            id: GB,
            iso2: "GB".into(),
            name: "United Kingdom".into(),
        })
        .place(place(200, GB, None, Some(2), Some(COUNTRY_TYPE)))
        .name(PlaceId::new(200), EN, "United Kingdom")
        .place(place(201, GB, Some(200), Some(4), None))
        .name(PlaceId::new(201), EN, "Wales")
        .place(PlaceRow {
            population: Some(362_000),
            location: Some(Location::new(51.4816, -3.1791)),
            ..place(202, GB, Some(201), Some(8), None)
        })
        .name(PlaceId::new(202), EN, "Cardiff")
        .place(place(203, GB, Some(200), Some(6), None))
        .name(PlaceId::new(203), EN, "London")
        .place(place(204, GB, Some(203), Some(8), None))
        .name(PlaceId::new(204), EN, "Westminster")
        .place(place(205, GB, Some(201), Some(8), None))
        .name(PlaceId::new(205), EN, "Springfield")
        .postcode(postcode(1, GB, "SW1A", None, 203))
        .postcode(postcode(2, GB, "SW1A", Some("2AA"), 204))
        .postcode(postcode(3, GB, "SW1A", Some("2"), 203))
        .postcode(postcode(4, GB, "CF10", Some("1AA"), 202));

    builder
        .country(CountryRow {
            id: US,
            iso2: "US".into(),
            name: "United States".into(),
        })
        .place(place(300, US, None, Some(2), Some(COUNTRY_TYPE)))
        .name(PlaceId::new(300), EN, "United States")
        .place(place(301, US, Some(300), Some(4), None))
        .name(PlaceId::new(301), EN, "California")
        .place(PlaceRow {
            population: Some(873_965),
            location: Some(Location::new(37.7749, -122.4194)),
            ..place(302, US, Some(301), Some(8), None)
        })
        .name(PlaceId::new(302), EN, "San Francisco")
        .place(place(303, US, Some(300), Some(8), None))
        .name(PlaceId::new(303), EN, "Springfield")
        .place(place(304, US, None, Some(8), None))
        .name(PlaceId::new(304), EN, "Beverly Hills")
        .postcode(postcode(10, US, "90210", None, 304))
        .postcode(postcode(11, US, "94103", None, 302));

    // The built-in recognizers resolve every code they administer
    let territories = ["IM", "GY", "JE", "AI", "IO", "FK", "GI", "PN", "GS", "SH", "TC"];
    for (id, iso2) in (900..).zip(territories) {
        builder.country(CountryRow {
            id: CountryId::new(id),
            iso2: iso2.into(),
            name: iso2.into(),
        });
    }

    builder.build()
}

fn english() -> QueryOptions {
    QueryOptions::builder().language(EN).build()
}

fn resolver() -> QueryResolver<MemoryGazetteer> {
    QueryResolver::builder(test_store()).options(english()).build()
}

#[test]
fn test_full_workflow() {
    setup_test_env();

    let resolver = resolver();

    // 1. Simple place query
    let results = resolver.resolve("Cardiff").expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].matched.pretty_path(),
        "Cardiff, Wales, United Kingdom"
    );

    // 2. Multi-term query, smallest to largest
    let results = resolver
        .resolve("San Francisco, California, United States")
        .expect("Multi-term resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched.name(), "San Francisco");
    assert_eq!(results[0].matched.country_id(), US);

    // 3. Exhaustive options list the scoping matches too
    let exhaustive = QueryOptionsBuilder::exhaustive().language(EN).build();
    let results = resolver
        .resolve_with_options("San Francisco, California, United States", &exhaustive)
        .expect("Exhaustive resolve should work");
    assert_eq!(results.len(), 3, "Specific match plus two areas");
    assert!(results[0].matched.is_place());
    assert!(results[1].matched.is_place());
    assert!(results[2].matched.is_country());

    // 4. A bare country mention resolves to the country itself
    let results = resolver
        .resolve("United Kingdom")
        .expect("Country resolve should work");
    assert_eq!(results.len(), 1);
    assert!(results[0].matched.is_country());
    assert_eq!(results[0].matched.name(), "United Kingdom");
}

#[test]
fn test_admin_level_conventions_differ_by_country() {
    setup_test_env();

    let resolver = resolver();

    // Luxembourg renders cantons (level 6) but not districts (level 4)
    let results = resolver.resolve("Belval").expect("Resolve should work");
    assert_eq!(
        results[0].matched.pretty_path(),
        "Belval, Esch-sur-Alzette, Canton Esch, Luxembourg"
    );

    // The UK renders the level-4 tier that Luxembourg skips
    let results = resolver.resolve("Cardiff").expect("Resolve should work");
    assert_eq!(
        results[0].matched.pretty_path(),
        "Cardiff, Wales, United Kingdom"
    );
}

#[test]
fn test_language_preference_with_fallback() {
    setup_test_env();

    let resolver = resolver();
    let french = QueryOptions::builder().language(FR).build();

    let results = resolver
        .resolve_with_options("Esch-sur-Alzette", &french)
        .expect("Resolve should work");
    // The canton has a French name; everything else falls back to the
    // only name on record.
    assert_eq!(
        results[0].matched.pretty_path(),
        "Esch-sur-Alzette, Canton d'Esch, Luxembourg"
    );
}

#[test]
fn test_uk_postcode_cascade() {
    setup_test_env();

    let resolver = resolver();

    // Exact outward + inward pair
    let results = resolver.resolve("SW1A 2AA").expect("Resolve should work");
    assert!(results[0].matched.is_postcode());
    assert_eq!(results[0].matched.name(), "SW1A 2AA");
    assert_eq!(
        results[0].matched.pretty_path(),
        "SW1A 2AA, Westminster, London, United Kingdom"
    );

    // Unknown inward falls back to the stored sector row
    let results = resolver.resolve("SW1A 2ZZ").expect("Resolve should work");
    assert_eq!(results[0].matched.name(), "SW1A 2");

    // Unknown sector falls back to the outward area
    let results = resolver.resolve("SW1A 9ZZ").expect("Resolve should work");
    assert_eq!(results[0].matched.name(), "SW1A");

    // A solitary outward code prefers the outward-only row
    let results = resolver.resolve("SW1A").expect("Resolve should work");
    assert_eq!(results[0].matched.name(), "SW1A");
    assert_eq!(
        results[0].matched.pretty_path(),
        "SW1A, London, United Kingdom"
    );
}

#[test]
fn test_postcode_scopes_remaining_tokens() {
    setup_test_env();

    let resolver = resolver();
    let exhaustive = QueryOptionsBuilder::exhaustive().language(EN).build();

    let results = resolver
        .resolve_with_options("Westminster SW1A 2AA", &exhaustive)
        .expect("Resolve should work");
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].matched.pretty_path(),
        "Westminster, London, United Kingdom"
    );
    assert!(results[1].matched.is_postcode());
}

#[test]
fn test_us_zip_host_country_suffix() {
    setup_test_env();

    let resolver = resolver();

    // No host country set: the ZIP is annotated with its country
    let results = resolver.resolve("90210").expect("Resolve should work");
    assert_eq!(
        results[0].matched.pretty_path(),
        "90210, Beverly Hills, United States"
    );

    // A foreign host keeps the annotation
    let foreign = QueryOptions::builder().language(EN).host_country(GB).build();
    let results = resolver
        .resolve_with_options("90210", &foreign)
        .expect("Resolve should work");
    assert_eq!(
        results[0].matched.pretty_path(),
        "90210, Beverly Hills, United States"
    );

    // Host country US: the annotation would be redundant
    let domestic = QueryOptions::builder().language(EN).host_country(US).build();
    let results = resolver
        .resolve_with_options("90210", &domestic)
        .expect("Resolve should work");
    assert_eq!(results[0].matched.pretty_path(), "90210, Beverly Hills");
}

#[test]
fn test_us_zip_plus_four_consumed() {
    setup_test_env();

    let resolver = resolver();

    let results = resolver.resolve("90210 1234").expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched.name(), "90210");
    assert_eq!(results[0].dangling, None, "The +4 token is consumed");
}

#[test]
fn test_dangling_prefix_preserved() {
    setup_test_env();

    let resolver = resolver();
    let options = QueryOptions::builder()
        .language(EN)
        .allow_dangling(true)
        .build();

    let results = resolver
        .resolve_with_options("Rue de la Gare Esch-sur-Alzette Luxembourg", &options)
        .expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched.name(), "Esch-sur-Alzette");
    assert_eq!(results[0].dangling.as_deref(), Some("Rue de la Gare"));

    // Without the flag the same query yields nothing
    let results = resolver
        .resolve("Rue de la Gare Esch-sur-Alzette Luxembourg")
        .expect("Resolve should work");
    assert!(results.is_empty());
}

#[test]
fn test_dangling_with_postcode_tail() {
    setup_test_env();

    let resolver = resolver();
    let options = QueryOptions::builder()
        .language(EN)
        .allow_dangling(true)
        .build();

    // Only the trailing token pair is a known entity
    let results = resolver
        .resolve_with_options("Foo Bar SW1A 2AA", &options)
        .expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert!(results[0].matched.is_postcode());
    assert_eq!(results[0].matched.name(), "SW1A 2AA");
    assert_eq!(results[0].dangling.as_deref(), Some("Foo Bar"));
}

#[test]
fn test_find_all_enumerates_ambiguity() {
    setup_test_env();

    let resolver = resolver();

    // Default: first interpretation only
    let results = resolver.resolve("Springfield").expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched.country_id(), GB);

    // find_all: one result per gazetteer row, store order
    let all = QueryOptions::builder().language(EN).find_all(true).build();
    let results = resolver
        .resolve_with_options("Springfield", &all)
        .expect("Resolve should work");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].matched.country_id(), GB);
    assert_eq!(results[1].matched.country_id(), US);

    // A country mention disambiguates
    let results = resolver
        .resolve_with_options("Springfield United States", &all)
        .expect("Resolve should work");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched.country_id(), US);
}

/// Wraps the bundled store and counts every query that reaches it, to make
/// the cache layers observable.
struct CountingStore {
    inner: MemoryGazetteer,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(inner: MemoryGazetteer) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl GazetteerStore for CountingStore {
    fn countries_by_iso2(&self, iso2: &str) -> StoreResult<Vec<CountryRow>> {
        self.bump();
        self.inner.countries_by_iso2(iso2)
    }

    fn country_by_id(&self, id: CountryId) -> StoreResult<Option<CountryRow>> {
        self.bump();
        self.inner.country_by_id(id)
    }

    fn place_by_id(&self, id: PlaceId) -> StoreResult<Option<PlaceRow>> {
        self.bump();
        self.inner.place_by_id(id)
    }

    fn postcode_by_id(&self, id: PostcodeId) -> StoreResult<Option<PostcodeRow>> {
        self.bump();
        self.inner.postcode_by_id(id)
    }

    fn names_for_place(&self, place: PlaceId) -> StoreResult<Vec<NameRow>> {
        self.bump();
        self.inner.names_for_place(place)
    }

    fn country_place_names(
        &self,
        country: CountryId,
        place_type: TypeId,
    ) -> StoreResult<Vec<NameRow>> {
        self.bump();
        self.inner.country_place_names(country, place_type)
    }

    fn type_id_by_name(&self, name: &str) -> StoreResult<Option<TypeId>> {
        self.bump();
        self.inner.type_id_by_name(name)
    }

    fn places_named(&self, name: &str, scope: &[CountryId]) -> StoreResult<Vec<PlaceRow>> {
        self.bump();
        self.inner.places_named(name, scope)
    }

    fn postcodes_by_main(&self, main: &str, scope: &[CountryId]) -> StoreResult<Vec<PostcodeRow>> {
        self.bump();
        self.inner.postcodes_by_main(main, scope)
    }

    fn postcodes_by_main_sup(
        &self,
        main: &str,
        sup: &str,
        scope: &[CountryId],
    ) -> StoreResult<Vec<PostcodeRow>> {
        self.bump();
        self.inner.postcodes_by_main_sup(main, sup, scope)
    }

    fn postcodes_by_main_no_sup(
        &self,
        main: &str,
        scope: &[CountryId],
    ) -> StoreResult<Vec<PostcodeRow>> {
        self.bump();
        self.inner.postcodes_by_main_no_sup(main, scope)
    }
}

#[test]
fn test_repeated_queries_never_reach_the_store() {
    setup_test_env();

    let resolver = QueryResolver::builder(CountingStore::new(test_store()))
        .options(english())
        .build();

    let first = resolver.resolve("Cardiff").expect("Resolve should work");
    let after_first = resolver.access().store().calls();
    assert!(after_first > 0, "A cold query hits the store");

    let second = resolver.resolve("Cardiff").expect("Resolve should work");
    assert_eq!(first, second);
    assert_eq!(
        resolver.access().store().calls(),
        after_first,
        "A repeated query is served from the result memo"
    );

    resolver.flush_caches();
    let third = resolver.resolve("Cardiff").expect("Resolve should work");
    assert_eq!(first, third);
    assert!(
        resolver.access().store().calls() > after_first,
        "Flushing drops the memo and the lookups repeat"
    );
}

#[test]
fn test_lookup_idempotence_hits_the_store_once() {
    setup_test_env();

    let access = GazetteerAccess::new(CountingStore::new(test_store()));

    let first = access
        .place_name(PlaceId::new(202), &[EN])
        .expect("Lookup should work");
    assert_eq!(first, "Cardiff");
    let after_first = access.store().calls();
    assert_eq!(after_first, 1);

    let second = access
        .place_name(PlaceId::new(202), &[EN])
        .expect("Lookup should work");
    assert_eq!(first, second);
    assert_eq!(
        access.store().calls(),
        after_first,
        "An identical lookup is served from cache"
    );

    // A different preference list is a different key
    let third = access
        .place_name(PlaceId::new(202), &[FR, EN])
        .expect("Lookup should work");
    assert_eq!(third, "Cardiff");
    assert_eq!(access.store().calls(), after_first + 1);
}

#[test]
fn test_error_handling() {
    setup_test_env();

    let resolver = resolver();

    // Blank and token-free queries are rejected up front
    for query in ["", "   ", " ,; / "] {
        assert!(
            matches!(
                resolver.resolve(query),
                Err(TextLocateError::Malformed(MalformedInput::EmptyQuery))
            ),
            "Query {query:?} should be rejected as empty"
        );
    }

    // Options without languages are rejected before anything runs
    let no_langs = QueryOptions::builder().build();
    assert!(matches!(
        resolver.resolve_with_options("Cardiff", &no_langs),
        Err(TextLocateError::Malformed(MalformedInput::NoLanguages))
    ));

    // Unknown text is an empty result, not an error
    let long_string = "a".repeat(1000);
    for query in ["XYZ123NONEXISTENT", long_string.as_str()] {
        let results = resolver.resolve(query).expect("Unknown text should not error");
        assert!(results.is_empty());
    }
}

#[test]
fn test_resolver_shared_across_threads() {
    setup_test_env();

    let resolver = resolver();
    let resolver = &resolver;
    std::thread::scope(|scope| {
        for query in ["Cardiff", "San Francisco", "Belval", "SW1A 2AA"] {
            scope.spawn(move || {
                for _ in 0..2 {
                    let results = resolver.resolve(query).expect("Resolve should work");
                    assert!(!results.is_empty(), "Should resolve {query}");
                }
            });
        }
        // Flushing while resolutions are in flight must not disturb them
        scope.spawn(move || resolver.flush_caches());
    });
}

#[test]
fn test_corrupt_hierarchy_is_reported() {
    setup_test_env();

    // Two places that claim each other as parent
    let mut builder = MemoryGazetteer::builder();
    builder
        .country(CountryRow {
            id: CountryId::new(1),
            iso2: "XX".into(),
            name: "Testland".into(),
        })
        .place(place(900, CountryId::new(1), Some(901), Some(8), None))
        .name(PlaceId::new(900), EN, "Loopville")
        .place(place(901, CountryId::new(1), Some(900), Some(6), None))
        .name(PlaceId::new(901), EN, "Loopshire");
    let codes = ["GB", "IM", "GY", "JE", "AI", "IO", "FK", "GI", "PN", "GS", "SH", "TC", "US"];
    for (id, iso2) in (2..).zip(codes) {
        builder.country(CountryRow {
            id: CountryId::new(id),
            iso2: iso2.into(),
            name: iso2.into(),
        });
    }
    let resolver = QueryResolver::builder(builder.build())
        .options(english())
        .build();

    assert!(matches!(
        resolver.resolve("Loopville"),
        Err(TextLocateError::Access(AccessError::Integrity(
            IntegrityError::ParentCycle(_)
        )))
    ));
}

#[test]
fn test_missing_reference_country_aborts_resolution() {
    setup_test_env();

    // GB alone is not complete reference data: the UK recognizer also
    // administers the crown dependencies and overseas territories
    let mut builder = MemoryGazetteer::builder();
    builder.country(CountryRow {
        id: GB,
        iso2: "GB".into(),
        name: "United Kingdom".into(),
    });
    let resolver = QueryResolver::builder(builder.build())
        .options(english())
        .build();

    assert!(matches!(
        resolver.resolve("SW1A 2AA"),
        Err(TextLocateError::Access(AccessError::Integrity(
            IntegrityError::CountryIso2RowCount { found: 0, .. }
        )))
    ));
}

#[test]
fn test_repetitive_input_terminates() {
    setup_test_env();

    let resolver = resolver();
    let all = QueryOptions::builder().language(EN).find_all(true).build();

    let results = resolver
        .resolve_with_options("Springfield Springfield Springfield Springfield", &all)
        .expect("Resolve should work");
    assert!(!results.is_empty());
}
