//! Pure collection state for the record catalog: data model, search filter,
//! normalized store and inline edit drafts. No I/O.

pub mod collection;
pub mod edit;
pub mod filter;
pub mod model;

pub use collection::{CollectionStore, StoreError};
pub use edit::{EditCommit, EditField, EditSession};
pub use filter::SearchTerm;
pub use model::{
    Artist, ArtistId, Page, RawArtist, RawRecord, Record, RecordId, ValidationError, Year,
};
