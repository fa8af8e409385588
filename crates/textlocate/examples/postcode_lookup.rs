//! Postcode recognition across national formats
//!
//! This example demonstrates the built-in postcode recognizers:
//! - UK outward codes, full codes and the fallback cascade
//! - US ZIP codes, ZIP+4 and host-country annotation
//! - Postcodes scoping the rest of the query

use textlocate::gazetteer::{CountryRow, PlaceRow, PostcodeRow};
use textlocate::{
    CountryId, LangId, MemoryGazetteer, PlaceId, PostcodeId, QueryOptions, QueryResolver,
};

const GB: CountryId = CountryId::new(1);
const US: CountryId = CountryId::new(2);
const EN: LangId = LangId::new(1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = QueryResolver::builder(build_gazetteer())
        .options(QueryOptions::builder().language(EN).build())
        .build();

    // Full UK postcode, then queries that fall back to coarser rows
    println!("UK postcode cascade:");
    for query in ["SW1A 2AA", "SW1A 2ZZ", "SW1A 9XX", "SW1A"] {
        let results = resolver.resolve(query)?;
        match results.first() {
            Some(result) => println!("  {query:>9} -> {}", result.matched.pretty_path()),
            None => println!("  {query:>9} -> no match"),
        }
    }

    // US ZIP codes; the +4 extension is consumed but not stored
    println!("\nUS ZIP codes:");
    for query in ["90210", "90210 1234"] {
        let results = resolver.resolve(query)?;
        if let Some(result) = results.first() {
            println!("  {query:>10} -> {}", result.matched.pretty_path());
        }
    }

    // With the host country set to the US the annotation disappears
    let domestic = QueryOptions::builder().language(EN).host_country(US).build();
    let results = resolver.resolve_with_options("90210", &domestic)?;
    if let Some(result) = results.first() {
        println!("  from the US -> {}", result.matched.pretty_path());
    }

    // A postcode narrows the countries considered for the other tokens
    println!("\nPostcode as context:");
    let results = resolver.resolve("Westminster SW1A 2AA")?;
    if let Some(result) = results.first() {
        println!("  matched {}", result.matched.pretty_path());
    }

    Ok(())
}

fn build_gazetteer() -> MemoryGazetteer {
    let mut builder = MemoryGazetteer::builder();
    builder
        .country(CountryRow {
            id: GB,
            iso2: "GB".into(),
            name: "United Kingdom".into(),
        })
        .place(PlaceRow {
            id: PlaceId::new(1),
            country_id: GB,
            parent_id: None,
            type_id: None,
            admin_level: Some(6),
            population: None,
            location: None,
        })
        .name(PlaceId::new(1), EN, "London")
        .place(PlaceRow {
            id: PlaceId::new(2),
            country_id: GB,
            parent_id: Some(PlaceId::new(1)),
            type_id: None,
            admin_level: Some(8),
            population: None,
            location: None,
        })
        .name(PlaceId::new(2), EN, "Westminster")
        .postcode(PostcodeRow {
            id: PostcodeId::new(1),
            country_id: GB,
            parent_id: Some(PlaceId::new(1)),
            main: "SW1A".into(),
            sup: None,
            location: None,
        })
        .postcode(PostcodeRow {
            id: PostcodeId::new(2),
            country_id: GB,
            parent_id: Some(PlaceId::new(2)),
            main: "SW1A".into(),
            sup: Some("2AA".into()),
            location: None,
        })
        .postcode(PostcodeRow {
            id: PostcodeId::new(3),
            country_id: GB,
            parent_id: Some(PlaceId::new(1)),
            main: "SW1A".into(),
            sup: Some("2".into()),
            location: None,
        });

    builder
        .country(CountryRow {
            id: US,
            iso2: "US".into(),
            name: "United States".into(),
        })
        .place(PlaceRow {
            id: PlaceId::new(10),
            country_id: US,
            parent_id: None,
            type_id: None,
            admin_level: Some(8),
            population: None,
            location: None,
        })
        .name(PlaceId::new(10), EN, "Beverly Hills")
        .postcode(PostcodeRow {
            id: PostcodeId::new(10),
            country_id: US,
            parent_id: Some(PlaceId::new(10)),
            main: "90210".into(),
            sup: None,
            location: None,
        });

    // Reference data carries a row for every code the built-in
    // recognizers administer
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
