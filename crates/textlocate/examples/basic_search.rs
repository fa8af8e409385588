//! Basic free-text location resolution
//!
//! This example demonstrates the fundamental operations:
//! - Building an in-memory gazetteer
//! - Creating a resolver with a language preference
//! - Simple and multi-term queries
//! - Working with typed results

use textlocate::gazetteer::{CountryRow, PlaceRow};
use textlocate::{
    CountryId, LangId, MemoryGazetteer, PlaceId, QueryMatch, QueryOptions, QueryResolver,
    QueryResult, TypeId,
};

const GB: CountryId = CountryId::new(1);
const EN: LangId = LangId::new(1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = QueryResolver::builder(build_gazetteer())
        .options(QueryOptions::builder().language(EN).build())
        .build();

    // Simple single-term query
    println!("Resolving 'Cardiff':");
    let results = resolver.resolve("Cardiff")?;
    print_results(&results);

    // Multi-term query, smallest to largest as in a postal address
    println!("\nResolving 'Swansea, Wales, United Kingdom':");
    let results = resolver.resolve("Swansea, Wales, United Kingdom")?;
    print_results(&results);

    // A bare country mention resolves to the country itself
    println!("\nResolving 'United Kingdom':");
    let results = resolver.resolve("United Kingdom")?;
    print_results(&results);

    Ok(())
}

fn build_gazetteer() -> MemoryGazetteer {
    let country_type = TypeId::new(1);
    let mut builder = MemoryGazetteer::builder();
    builder
        .semantic_type("country", country_type)
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
            admin_level: Some(4),
            population: None,
            location: None,
        })
        .name(PlaceId::new(2), EN, "Wales")
        .place(PlaceRow {
            id: PlaceId::new(3),
            country_id: GB,
            parent_id: Some(PlaceId::new(2)),
            type_id: None,
            admin_level: Some(8),
            population: Some(362_000),
            location: None,
        })
        .name(PlaceId::new(3), EN, "Cardiff")
        .place(PlaceRow {
            id: PlaceId::new(4),
            country_id: GB,
            parent_id: Some(PlaceId::new(2)),
            type_id: None,
            admin_level: Some(8),
            population: Some(246_000),
            location: None,
        })
        .name(PlaceId::new(4), EN, "Swansea");
    // Reference data carries a row for every code the built-in
    // recognizers administer
    let codes = ["IM", "GY", "JE", "AI", "IO", "FK", "GI", "PN", "GS", "SH", "TC", "US"];
    for (id, iso2) in (900..).zip(codes) {
        builder.country(CountryRow {
            id: CountryId::new(id),
            iso2: iso2.into(),
            name: iso2.into(),
        });
    }
    builder.build()
}

fn print_results(results: &[QueryResult]) {
    for (i, result) in results.iter().enumerate() {
        let kind = match &result.matched {
            QueryMatch::Country(_) => "Country",
            QueryMatch::Place(_) => "Place",
            QueryMatch::Postcode(_) => "Postcode",
        };
        println!(
            "  {}. {} ({kind}) - {}",
            i + 1,
            result.matched.name(),
            result.matched.pretty_path()
        );
        if let Some(dangling) = &result.dangling {
            println!("     unmatched prefix: {dangling:?}");
        }
    }
    if results.is_empty() {
        println!("  no results");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = textlocate::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_basic_search_example() {
        setup_test_env();
        assert!(main().is_ok(), "Basic search example should run successfully");
    }
}
