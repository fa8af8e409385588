//! Textlocate - Free-Text Location Resolution Library
//!
//! Textlocate turns free-form location text into typed gazetteer entities. It
//! consumes a query right to left, matching place names, country mentions and
//! national postcode formats, narrowing the search to the matched country as
//! it works toward the most specific entity on the left.
//!
//! # Quick Start
//!
//! **Important**: Queries read smallest to largest, the way addresses are
//! written: `"Cardiff, Wales, United Kingdom"` or `"SW1A 2AA London"`.
//!
//! ```rust
//! use textlocate::gazetteer::{CountryRow, PlaceRow};
//! use textlocate::{CountryId, LangId, MemoryGazetteer, PlaceId, QueryOptions, QueryResolver};
//!
//! // Build a tiny in-memory gazetteer
//! let mut builder = MemoryGazetteer::builder();
//! builder
//!     .country(CountryRow {
//!         id: CountryId::new(1),
//!         iso2: "GB".into(),
//!         name: "United Kingdom".into(),
//!     })
//!     .place(PlaceRow {
//!         id: PlaceId::new(7),
//!         country_id: CountryId::new(1),
//!         parent_id: None,
//!         type_id: None,
//!         admin_level: Some(8),
//!         population: Some(362_000),
//!         location: None,
//!     })
//!     .name(PlaceId::new(7), LangId::new(1), "Cardiff");
//!
//! // Reference data carries a row for every code the built-in
//! // recognizers administer
//! let codes = ["IM", "GY", "JE", "AI", "IO", "FK", "GI", "PN", "GS", "SH", "TC", "US"];
//! for (id, iso2) in (2..).zip(codes) {
//!     builder.country(CountryRow {
//!         id: CountryId::new(id),
//!         iso2: iso2.into(),
//!         name: iso2.into(),
//!     });
//! }
//!
//! // Create a resolver with a language preference
//! let resolver = QueryResolver::builder(builder.build())
//!     .options(QueryOptions::builder().language(LangId::new(1)).build())
//!     .build();
//!
//! let results = resolver.resolve("Cardiff")?;
//! assert_eq!(results[0].matched.name(), "Cardiff");
//! # Ok::<(), textlocate::error::TextLocateError>(())
//! ```
//!
//! # Features
//!
//! - **Backtracking matcher**: every interpretation of the token sequence is
//!   explored, broadest mention first, with country scope carried leftward
//! - **Postcode recognizers**: UK-style outward/full codes and US ZIP (+4)
//!   built in, with a trait to plug in further national formats
//! - **Administrative context**: results carry a pretty path rendered from
//!   the gazetteer's parent chain, filtered per country conventions
//! - **Bounded caching**: every lookup layer and the query results themselves
//!   are memoized in size-bounded maps safe to share across threads
//!
//! # Storage
//!
//! Textlocate is storage-agnostic: anything implementing
//! [`GazetteerStore`] can back a resolver. The bundled [`MemoryGazetteer`]
//! indexes rows in memory and is what the tests and examples use.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod access;
mod cache;
mod config;
pub mod error;
mod hierarchy;
mod resolver;
mod results;
mod search;

pub use access::{AccessError, GazetteerAccess, IntegrityError};
pub use cache::{BoundedCache, CacheStats, LARGE_CACHE_CAPACITY, SMALL_CACHE_CAPACITY};
pub use config::{QueryOptions, QueryOptionsBuilder};
pub use error::{MalformedInput, TextLocateError};
pub use hierarchy::HierarchyPrinter;
pub use resolver::{QueryResolver, QueryResolverBuilder};
pub use results::{CountryMatch, PlaceMatch, PostcodeMatch, QueryMatch, QueryResult};
pub use search::postcode::uk::UkPostcodes;
pub use search::postcode::us::UsPostcodes;
pub use search::postcode::{PostcodeCandidate, PostcodeRecognizer, RecognizerRegistry};
pub use search::{MatchContext, Token, tokenize};
// Re-export the storage subcrate and its core types
pub use textlocate_gazetteer as gazetteer;
pub use textlocate_gazetteer::{
    CountryId, GazetteerStore, LangId, Location, MemoryGazetteer, PlaceId, PostcodeId, TypeId,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the textlocate library.
///
/// Sets up structured logging with configurable levels and filtering. Call
/// this once at the start of your application to enable detailed logging
/// output from resolver operations.
///
/// # Arguments
///
/// * `level` - The minimum log level to display
///
/// # Examples
///
/// ```rust
/// use textlocate::init_logging;
/// use tracing::Level;
///
/// // Initialize with info-level logging
/// init_logging(Level::INFO)?;
/// # Ok::<(), textlocate::error::TextLocateError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), TextLocateError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
