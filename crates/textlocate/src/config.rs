//! Per-query options and their builder.

use textlocate_gazetteer::{CountryId, LangId};

/// Options controlling how one query is resolved.
///
/// `languages` is an ordered preference list used whenever a localized
/// name is chosen; it must contain at least one entry by the time a query
/// runs. `host_country` anchors relative rendering: matches in a foreign
/// country get that country's name appended to their pretty path.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryOptions {
    pub languages: Vec<LangId>,
    pub find_all: bool,
    pub allow_dangling: bool,
    pub show_area: bool,
    pub host_country: Option<CountryId>,
}

impl QueryOptions {
    #[must_use]
    pub fn builder() -> QueryOptionsBuilder {
        QueryOptionsBuilder::new()
    }
}

/// Builder for creating query options with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct QueryOptionsBuilder {
    options: QueryOptions,
}

impl QueryOptionsBuilder {
    /// Create a new builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: QueryOptions::default(),
        }
    }

    /// Create a builder that stops at the first full parse of the query
    #[must_use]
    pub fn first_match() -> Self {
        Self::new()
    }

    /// Create a builder that enumerates every parse and reports the
    /// surrounding area entities alongside each specific match
    #[must_use]
    pub fn exhaustive() -> Self {
        let mut builder = Self::new();
        builder.options.find_all = true;
        builder.options.show_area = true;
        builder
    }

    /// Set the ordered language preference list
    #[must_use]
    pub fn languages(mut self, langs: impl IntoIterator<Item = LangId>) -> Self {
        self.options.languages = langs.into_iter().collect();
        self
    }

    /// Append one language to the preference list
    #[must_use]
    pub fn language(mut self, lang: LangId) -> Self {
        self.options.languages.push(lang);
        self
    }

    /// Enumerate all parses instead of stopping at the first
    #[must_use]
    pub fn find_all(mut self, enabled: bool) -> Self {
        self.options.find_all = enabled;
        self
    }

    /// Tolerate unmatched leading tokens instead of failing the parse
    #[must_use]
    pub fn allow_dangling(mut self, enabled: bool) -> Self {
        self.options.allow_dangling = enabled;
        self
    }

    /// Also report the area entities that provided context for a match
    #[must_use]
    pub fn show_area(mut self, enabled: bool) -> Self {
        self.options.show_area = enabled;
        self
    }

    /// Set the country queries are considered to originate from
    #[must_use]
    pub fn host_country(mut self, country: CountryId) -> Self {
        self.options.host_country = Some(country);
        self
    }

    /// Build the final options
    #[must_use]
    pub fn build(self) -> QueryOptions {
        self.options
    }
}
