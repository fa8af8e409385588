//! Strongly-typed gazetteer rows and identifiers.
//!
//! Every value the store hands back is one of these records. Fields mirror
//! the gazetteer schema (countries, places, postcodes, localized names);
//! identifiers are newtypes so a place id can never be passed where a
//! postcode id is expected.

use std::fmt;

/// Identifier of a country row.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryId(u32);

/// Identifier of a place row.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(u64);

/// Identifier of a postcode row.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostcodeId(u64);

/// Identifier of a language in the localized name table.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LangId(u32);

/// Identifier of a semantic place type (e.g. the "country" type).
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

macro_rules! impl_id {
    ($name:ident, $raw:ty) => {
        impl $name {
            #[must_use]
            pub const fn new(raw: $raw) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn get(self) -> $raw {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(CountryId, u32);
impl_id!(PlaceId, u64);
impl_id!(PostcodeId, u64);
impl_id!(LangId, u32);
impl_id!(TypeId, u32);

/// A WGS84 coordinate pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A country: immutable reference data, looked up in both directions.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    pub id: CountryId,
    /// ISO 3166-1 alpha-2 code (e.g. "GB")
    pub iso2: String,
    /// Canonical name, used when no localized place name exists
    pub name: String,
}

/// A place in the administrative tree.
///
/// `parent_id` chains upward to a root with no parent; the localized names
/// live in the separate name table and are fetched per place id.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRow {
    pub id: PlaceId,
    pub country_id: CountryId,
    /// Parent place, `None` at the tree root
    pub parent_id: Option<PlaceId>,
    /// Semantic type of the place (e.g. the "country" type)
    pub type_id: Option<TypeId>,
    /// Administrative boundary level, per OSM-style tagging
    pub admin_level: Option<u8>,
    pub population: Option<i64>,
    pub location: Option<Location>,
}

impl PlaceRow {
    /// Returns true when this place carries the given semantic type.
    #[must_use]
    pub fn is_type(&self, type_id: TypeId) -> bool {
        self.type_id == Some(type_id)
    }
}

/// A postal code row.
///
/// `main` and `sup` are the country-specific code components ("outward" and
/// "inward" for UK-style codes). Rows exist at several precisions: full
/// `sup`, truncated `sup` (e.g. the sector digit alone) and outward-only
/// rows with `sup = None`. `parent_id` points into the place tree.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeRow {
    pub id: PostcodeId,
    pub country_id: CountryId,
    pub parent_id: Option<PlaceId>,
    pub main: String,
    pub sup: Option<String>,
    pub location: Option<Location>,
}

impl PostcodeRow {
    /// The full stored text of the code: `main` plus `sup` when present.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.sup {
            Some(sup) => format!("{} {sup}", self.main),
            None => self.main.clone(),
        }
    }
}

/// One localized name of a place.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub place_id: PlaceId,
    pub lang_id: LangId,
    pub name: String,
}
