//! Gazetteer data model and storage abstraction for textlocate.
//!
//! This crate defines the typed rows the resolver works with
//! ([`CountryRow`], [`PlaceRow`], [`PostcodeRow`], [`NameRow`]), the
//! [`GazetteerStore`] trait every backend implements, and a ready-made
//! in-memory backend for embedded data sets and tests.
//!
//! ```rust
//! use textlocate_gazetteer::{
//!     CountryId, CountryRow, GazetteerStore, MemoryGazetteer,
//! };
//!
//! let mut builder = MemoryGazetteer::builder();
//! builder.country(CountryRow {
//!     id: CountryId::new(1),
//!     iso2: "LU".into(),
//!     name: "Luxembourg".into(),
//! });
//! let store = builder.build();
//!
//! let rows = store.countries_by_iso2("lu").unwrap();
//! assert_eq!(rows[0].name, "Luxembourg");
//! ```

pub mod memory;
pub mod rows;
pub mod store;

pub mod error {
    //! Error types for gazetteer backends.

    use thiserror::Error;

    /// Failure raised by a [`GazetteerStore`](crate::GazetteerStore)
    /// implementation.
    ///
    /// The in-memory backend never fails; the variants exist for backends
    /// that read from disk or talk to a database.
    #[derive(Error, Debug)]
    pub enum StoreError {
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),

        #[error("backend error: {0}")]
        Backend(#[from] anyhow::Error),
    }

    pub type Result<T> = std::result::Result<T, StoreError>;
}

pub use error::{Result, StoreError};
pub use memory::{MemoryGazetteer, MemoryGazetteerBuilder};
pub use rows::{
    CountryId, CountryRow, LangId, Location, NameRow, PlaceId, PlaceRow, PostcodeId, PostcodeRow,
    TypeId,
};
pub use store::GazetteerStore;
