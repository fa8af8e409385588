//! Typed results returned by query resolution.
//!
//! Every successful parse of the query text produces a [`QueryResult`]: the
//! entity the text resolved to plus any leading tokens that were tolerated
//! as dangling. Optional fields stay optional all the way out; a serializer
//! built on top of these types must omit what is absent rather than invent
//! placeholder values, which the serde derives here respect via
//! `skip_serializing_if`.

use std::fmt;

use textlocate_gazetteer::{CountryId, Location, PlaceId, PostcodeId};

/// A country resolved from the query text.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryMatch {
    pub id: CountryId,
    pub name: String,
    pub pretty_path: String,
}

/// A place resolved from the query text.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMatch {
    pub id: PlaceId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub location: Option<Location>,
    pub country_id: CountryId,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub parent_id: Option<PlaceId>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub population: Option<i64>,
    pub pretty_path: String,
}

/// A postcode resolved from the query text. `name` is the matched text in
/// its canonical stored casing, e.g. `"SW1A 2"` for a sector-level match.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeMatch {
    pub id: PostcodeId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub location: Option<Location>,
    pub country_id: CountryId,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub parent_id: Option<PlaceId>,
    pub pretty_path: String,
}

/// The entity a parse resolved to.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMatch {
    Country(CountryMatch),
    Place(PlaceMatch),
    Postcode(PostcodeMatch),
}

impl QueryMatch {
    /// The display name of the matched entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Country(m) => &m.name,
            Self::Place(m) => &m.name,
            Self::Postcode(m) => &m.name,
        }
    }

    /// The rendered ancestor-chain path.
    #[must_use]
    pub fn pretty_path(&self) -> &str {
        match self {
            Self::Country(m) => &m.pretty_path,
            Self::Place(m) => &m.pretty_path,
            Self::Postcode(m) => &m.pretty_path,
        }
    }

    /// The country the entity belongs to. For a country match this is the
    /// country itself.
    #[must_use]
    pub fn country_id(&self) -> CountryId {
        match self {
            Self::Country(m) => m.id,
            Self::Place(m) => m.country_id,
            Self::Postcode(m) => m.country_id,
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Country(_) => None,
            Self::Place(m) => m.location,
            Self::Postcode(m) => m.location,
        }
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<PlaceId> {
        match self {
            Self::Country(_) => None,
            Self::Place(m) => m.parent_id,
            Self::Postcode(m) => m.parent_id,
        }
    }

    #[must_use]
    pub fn is_country(&self) -> bool {
        matches!(self, Self::Country(_))
    }

    #[must_use]
    pub fn is_place(&self) -> bool {
        matches!(self, Self::Place(_))
    }

    #[must_use]
    pub fn is_postcode(&self) -> bool {
        matches!(self, Self::Postcode(_))
    }
}

impl fmt::Display for QueryMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_path())
    }
}

/// One resolution of the query: a matched entity and, when dangling tokens
/// were allowed, the unmatched leading text in its original casing.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub matched: QueryMatch,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub dangling: Option<String>,
}

impl QueryResult {
    #[must_use]
    pub fn new(matched: QueryMatch) -> Self {
        Self {
            matched,
            dangling: None,
        }
    }

    #[must_use]
    pub fn with_dangling(matched: QueryMatch, dangling: impl Into<String>) -> Self {
        Self {
            matched,
            dangling: Some(dangling.into()),
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dangling {
            Some(dangling) => write!(f, "{} (dangling: {dangling})", self.matched),
            None => self.matched.fmt(f),
        }
    }
}
