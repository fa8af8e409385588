//! The read surface a gazetteer backend must expose.
//!
//! The resolver core never manages connections, transactions or schemas; it
//! issues exactly these queries and interprets the rows. Backends can be
//! anything from the bundled in-memory store to a relational database; the
//! trait is the whole contract between them.

use crate::error::Result;
use crate::rows::{
    CountryId, CountryRow, NameRow, PlaceId, PlaceRow, PostcodeId, PostcodeRow, TypeId,
};

/// Read operations over the gazetteer.
///
/// All text parameters arrive already normalized (lowercased, single tokens
/// joined with single spaces); implementations compare them against a
/// lowercased view of their stored values.
///
/// # Ordering
///
/// Every method returning a `Vec` MUST yield rows in ascending id order
/// (name rows, which carry no id of their own, order by language id and
/// then name). Callers resolve ambiguous matches by taking the first row,
/// so a stable order is what keeps results reproducible across runs. The
/// bundled [`MemoryGazetteer`](crate::MemoryGazetteer) sorts its postings at
/// build time; other backends typically get this from an `ORDER BY`.
///
/// A `scope` slice restricts a search to the given countries; an empty slice
/// means unrestricted.
pub trait GazetteerStore: Send + Sync {
    /// Countries carrying the given ISO 3166-1 alpha-2 code.
    ///
    /// Reference data is expected to hold exactly one row per code; the
    /// caller treats any other count as a data-integrity failure, so this
    /// returns whatever is found rather than guessing.
    fn countries_by_iso2(&self, iso2: &str) -> Result<Vec<CountryRow>>;

    fn country_by_id(&self, id: CountryId) -> Result<Option<CountryRow>>;

    /// Fetch one place row. This is also the parent-chain step: walking a
    /// hierarchy is repeated fetches of `parent_id`.
    fn place_by_id(&self, id: PlaceId) -> Result<Option<PlaceRow>>;

    fn postcode_by_id(&self, id: PostcodeId) -> Result<Option<PostcodeRow>>;

    /// Every localized name of a place, all languages.
    fn names_for_place(&self, place: PlaceId) -> Result<Vec<NameRow>>;

    /// Names of places of the given semantic type inside a country.
    ///
    /// Drives country display names: the "country" type selects the place
    /// row representing the country itself, whose localized names are the
    /// preferred rendering.
    fn country_place_names(&self, country: CountryId, place_type: TypeId) -> Result<Vec<NameRow>>;

    /// Resolve a semantic type label (e.g. "country") to its id.
    fn type_id_by_name(&self, name: &str) -> Result<Option<TypeId>>;

    /// Places whose name (in any language) equals `name`, scoped.
    fn places_named(&self, name: &str, scope: &[CountryId]) -> Result<Vec<PlaceRow>>;

    /// Postcodes with the given `main` component, any supplementary.
    fn postcodes_by_main(&self, main: &str, scope: &[CountryId]) -> Result<Vec<PostcodeRow>>;

    /// Postcodes matching `main` and exactly the given supplementary text.
    /// Truncated supplementaries are stored as their own rows, so a sector
    /// query like ("sw1", "2") is plain equality here too.
    fn postcodes_by_main_sup(
        &self,
        main: &str,
        sup: &str,
        scope: &[CountryId],
    ) -> Result<Vec<PostcodeRow>>;

    /// Postcodes with the given `main` component and no supplementary at
    /// all (outward-only rows).
    fn postcodes_by_main_no_sup(&self, main: &str, scope: &[CountryId])
    -> Result<Vec<PostcodeRow>>;
}
