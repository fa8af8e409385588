//! Query options and customization
//!
//! This example demonstrates how query options change what a resolution
//! reports: preset option sets, ambiguity enumeration, dangling text and
//! area context.

use textlocate::gazetteer::{CountryRow, PlaceRow};
use textlocate::{
    CountryId, LangId, MemoryGazetteer, PlaceId, QueryOptions, QueryOptionsBuilder, QueryResolver,
    TypeId,
};

const GB: CountryId = CountryId::new(1);
const US: CountryId = CountryId::new(2);
const EN: LangId = LangId::new(1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = QueryResolver::builder(build_gazetteer())
        .options(QueryOptions::builder().language(EN).build())
        .build();

    // Preset option sets
    println!("Preset comparison for 'Springfield':");

    // first_match stops at the first complete interpretation
    let first = QueryOptions::builder().language(EN).build();
    let results = resolver.resolve_with_options("Springfield", &first)?;
    println!("  first_match: {} result(s)", results.len());

    // exhaustive enumerates every interpretation and its context
    let exhaustive = QueryOptionsBuilder::exhaustive().language(EN).build();
    let results = resolver.resolve_with_options("Springfield", &exhaustive)?;
    println!("  exhaustive:  {} result(s)", results.len());
    for result in &results {
        println!("    - {}", result.matched.pretty_path());
    }

    // Scoping with a country mention picks one of the two
    println!("\nDisambiguating with a country mention:");
    let results = resolver.resolve_with_options("Springfield United States", &exhaustive)?;
    for result in &results {
        println!("  - {}", result.matched.pretty_path());
    }

    // Dangling text: tolerate an unmatched street-level prefix
    println!("\nTolerating unmatched prefixes:");
    let dangling = QueryOptions::builder()
        .language(EN)
        .allow_dangling(true)
        .build();
    let results = resolver.resolve_with_options("14 High Street Springfield", &dangling)?;
    for result in &results {
        println!(
            "  matched {} with prefix {:?}",
            result.matched.pretty_path(),
            result.dangling.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

fn build_gazetteer() -> MemoryGazetteer {
    let country_type = TypeId::new(1);
    let mut builder = MemoryGazetteer::builder();
    builder.semantic_type("country", country_type);

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
            type_id: Some(country_type),
            admin_level: Some(2),
            population: None,
            location: None,
        })
        .name(PlaceId::new(1), EN, "United Kingdom")
        .place(PlaceRow {
            id: PlaceId::new(2),
            country_id: GB,
            parent_id: Some(PlaceId::new(1)),
            type_id: None,
            admin_level: Some(8),
            population: None,
            location: None,
        })
        .name(PlaceId::new(2), EN, "Springfield");

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
            type_id: Some(country_type),
            admin_level: Some(2),
            population: None,
            location: None,
        })
        .name(PlaceId::new(10), EN, "United States")
        .place(PlaceRow {
            id: PlaceId::new(11),
            country_id: US,
            parent_id: Some(PlaceId::new(10)),
            type_id: None,
            admin_level: Some(8),
            population: Some(42_000),
            location: None,
        })
        .name(PlaceId::new(11), EN, "Springfield");

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

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = textlocate::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_configuration_example() {
        setup_test_env();
        assert!(main().is_ok(), "Configuration example should run successfully");
    }
}
