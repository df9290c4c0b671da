use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::filter::{self, SearchTerm};
use crate::model::{Artist, ArtistId, RawRecord, Record, RecordId, ValidationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Edit references a record the store never assigned
    #[error("unknown record id {0}")]
    UnknownRecord(RecordId),
    /// Edit references an artist that was never loaded
    #[error("unknown artist id {0}")]
    UnknownArtist(ArtistId),
}

/// Normalized in-memory collection of records and artists.
///
/// Pure data structure: ingests pages, applies edits and the search filter,
/// without any I/O. Records keep fetch order. Each record is held behind an
/// `Arc` that is only replaced when the record actually changes.
#[derive(Debug, Default)]
pub struct CollectionStore {
    records: Vec<Arc<Record>>,
    artists: BTreeMap<ArtistId, Arc<Artist>>,
    cursor: Option<String>,
    search_term: SearchTerm,
    last_id: RecordId,
}

impl CollectionStore {
    /// Create an empty store that will fetch its first page from `initial_cursor`.
    pub fn new(initial_cursor: Option<String>) -> Self {
        Self {
            cursor: initial_cursor,
            ..Default::default()
        }
    }

    /// Normalize and append one fetched page. Returns the number of records added.
    ///
    /// Artists are added on first sight only; an artist already in the store
    /// keeps its (possibly locally edited) value. Record ids continue from the
    /// highest id assigned so far.
    pub fn append_page(&mut self, results: Vec<RawRecord>, cursor: Option<String>) -> usize {
        let count = results.len();
        self.records.reserve(count);

        for raw in results {
            let artist_id = raw.artist.id;
            match self.artists.get(&artist_id) {
                Some(existing) => {
                    if existing.name != raw.artist.name {
                        debug!(
                            "artist id {} already loaded as {:?}, ignoring {:?}",
                            artist_id, existing.name, raw.artist.name
                        );
                    }
                }
                None => {
                    self.artists
                        .insert(artist_id, Arc::new(Artist::from(raw.artist)));
                }
            }

            self.last_id += 1;
            let record = Record {
                id: self.last_id,
                album_title: raw.album_title,
                year: raw.year,
                condition: raw.condition,
                artist: artist_id,
                show: true,
            };
            let show = filter::matches(
                &record,
                self.artists.get(&artist_id).map(|a| a.as_ref()),
                &self.search_term,
            );
            self.records.push(Arc::new(Record { show, ..record }));
        }

        self.cursor = cursor;
        count
    }

    /// Replace the record with the same id.
    ///
    /// Only that record's visibility is recomputed. Artists are never touched.
    pub fn update_record(&mut self, edited: Record) -> Result<(), StoreError> {
        if let Err(e) = edited.validate() {
            debug!("rejected edit of record {}: {} is empty", edited.id, e.field());
            return Err(e.into());
        }
        let index = self
            .position(edited.id)
            .ok_or(StoreError::UnknownRecord(edited.id))?;
        let artist = self
            .artists
            .get(&edited.artist)
            .ok_or(StoreError::UnknownArtist(edited.artist))?;

        let show = filter::matches(&edited, Some(artist.as_ref()), &self.search_term);
        self.records[index] = Arc::new(Record { show, ..edited });
        Ok(())
    }

    /// Replace the artist with the same id and re-filter every record that references it.
    pub fn update_artist(&mut self, edited: Artist) -> Result<(), StoreError> {
        if let Err(e) = edited.validate() {
            debug!("rejected edit of artist {}: {} is empty", edited.id, e.field());
            return Err(e.into());
        }
        let slot = self
            .artists
            .get_mut(&edited.id)
            .ok_or(StoreError::UnknownArtist(edited.id))?;
        *slot = Arc::new(edited);
        let artist = Arc::clone(slot);

        if !self.search_term.is_empty() {
            for record in self.records.iter_mut().filter(|r| r.artist == artist.id) {
                *record = filter::apply(record, Some(artist.as_ref()), &self.search_term);
            }
        }
        Ok(())
    }

    /// Normalize and store the search string, then re-filter the whole collection.
    pub fn set_search_term(&mut self, raw: &str) {
        self.search_term = SearchTerm::new(raw);
        debug!(
            "filtering {} records by {:?}",
            self.records.len(),
            self.search_term.as_str()
        );

        let artists = &self.artists;
        let term = &self.search_term;
        for record in self.records.iter_mut() {
            let artist = artists.get(&record.artist).map(|a| a.as_ref());
            *record = filter::apply(record, artist, term);
        }
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        // Ids are assigned in increasing order, so records are sorted by id.
        self.records.binary_search_by_key(&id, |r| r.id).ok()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    /// Records that pass the active filter, in fetch order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter().filter(|r| r.show)
    }

    pub fn record(&self, id: RecordId) -> Option<&Arc<Record>> {
        self.position(id).map(|i| &self.records[i])
    }

    pub fn artist(&self, id: ArtistId) -> Option<&Arc<Artist>> {
        self.artists.get(&id)
    }

    pub fn artists(&self) -> &BTreeMap<ArtistId, Arc<Artist>> {
        &self.artists
    }

    /// Cursor of the next page to fetch. `None` once the last page was merged.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn search_term(&self) -> &SearchTerm {
        &self.search_term
    }

    /// Highest record id assigned so far (0 before the first page).
    pub fn last_id(&self) -> RecordId {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
