//! Query entry point: validation, option defaults and result memoization.

use textlocate_gazetteer::GazetteerStore;
use tracing::{debug, instrument};

use crate::access::GazetteerAccess;
use crate::cache::{BoundedCache, CacheStats, SMALL_CACHE_CAPACITY};
use crate::config::QueryOptions;
use crate::error::{MalformedInput, Result};
use crate::hierarchy::HierarchyPrinter;
use crate::results::QueryResult;
use crate::search::postcode::{PostcodeRecognizer, RecognizerRegistry};
use crate::search::{MatchContext, matcher, tokenize};

/// Resolves free-text location queries against a gazetteer store.
///
/// Owns the memoizing access layer, the hierarchy printer, the postcode
/// recognizers and a bounded memo of recent query results. All methods
/// take `&self`; one resolver is meant to be built once and shared.
#[derive(Debug)]
pub struct QueryResolver<S> {
    access: GazetteerAccess<S>,
    printer: HierarchyPrinter,
    registry: RecognizerRegistry<S>,
    results: BoundedCache<(String, QueryOptions), Vec<QueryResult>>,
    options: QueryOptions,
}

impl<S: GazetteerStore> QueryResolver<S> {
    /// A resolver over `store` with default options and the built-in
    /// recognizers. Defaults carry no languages, so set per-query options
    /// or use [`QueryResolver::builder`] before resolving.
    pub fn new(store: S) -> Self {
        Self::builder(store).build()
    }

    #[must_use]
    pub fn builder(store: S) -> QueryResolverBuilder<S> {
        QueryResolverBuilder::new(store)
    }

    /// Resolve `text` with the resolver's default options.
    pub fn resolve(&self, text: &str) -> Result<Vec<QueryResult>> {
        self.resolve_with_options(text, &self.options)
    }

    /// Resolve `text` with one-off options.
    ///
    /// Rejects the query up front when `options` carries no languages or
    /// `text` tokenizes to nothing; anything else that goes wrong comes
    /// from the store or from gazetteer integrity checks. Identical
    /// (text, options) pairs are served from the result memo.
    #[instrument(name = "resolve", level = "info", skip_all, fields(query = text))]
    pub fn resolve_with_options(
        &self,
        text: &str,
        options: &QueryOptions,
    ) -> Result<Vec<QueryResult>> {
        if options.languages.is_empty() {
            return Err(MalformedInput::NoLanguages.into());
        }
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(MalformedInput::EmptyQuery.into());
        }
        let key = (text.to_owned(), options.clone());
        if let Some(results) = self.results.get(&key) {
            debug!("served from result memo");
            return Ok(results);
        }

        let ctx = MatchContext {
            access: &self.access,
            printer: &self.printer,
            options,
        };
        let results = matcher::run(&ctx, &self.registry, &tokens)?;
        self.results.insert(key, results.clone());
        Ok(results)
    }

    /// Drop every cached lookup and memoized result.
    pub fn flush_caches(&self) {
        self.access.flush();
        self.printer.flush();
        self.results.clear();
        debug!("resolver caches flushed");
    }

    /// The memoizing access layer, for direct gazetteer lookups.
    pub fn access(&self) -> &GazetteerAccess<S> {
        &self.access
    }

    /// Options applied by [`resolve`](Self::resolve).
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Counters for the query result memo.
    pub fn result_cache_stats(&self) -> CacheStats {
        self.results.stats()
    }
}

/// Assembles a [`QueryResolver`].
#[derive(Debug)]
pub struct QueryResolverBuilder<S> {
    store: S,
    options: QueryOptions,
    registry: RecognizerRegistry<S>,
}

impl<S: GazetteerStore> QueryResolverBuilder<S> {
    fn new(store: S) -> Self {
        Self {
            store,
            options: QueryOptions::default(),
            registry: RecognizerRegistry::with_defaults(),
        }
    }

    /// Default options applied by [`QueryResolver::resolve`]
    #[must_use]
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a postcode recognizer after the built-in ones
    #[must_use]
    pub fn register_recognizer(mut self, recognizer: Box<dyn PostcodeRecognizer<S>>) -> Self {
        self.registry.register(recognizer);
        self
    }

    /// Replace the recognizer set entirely
    #[must_use]
    pub fn recognizers(mut self, registry: RecognizerRegistry<S>) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn build(self) -> QueryResolver<S> {
        QueryResolver {
            access: GazetteerAccess::new(self.store),
            printer: HierarchyPrinter::new(),
            registry: self.registry,
            results: BoundedCache::new(SMALL_CACHE_CAPACITY),
            options: self.options,
        }
    }
}
