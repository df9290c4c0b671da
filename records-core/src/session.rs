//! Presentation-facing catalog controller
//!
//! Owns the collection store together with the status flags a view needs
//! (`loading`, `search_loading`, `error`). Page loads are sequential, search
//! input is debounced, edits are applied atomically under one lock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use records_common::{Artist, ArtistId, CollectionStore, EditCommit, Record, StoreError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, PageSource};
use crate::debounce::Debouncer;

/// Message shown to the user when a page fails to load
pub const FETCH_ERROR_MESSAGE: &str = "Couldn't load records!";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Couldn't load records! ({0})")]
    Fetch(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a call to [`CatalogSession::load_next_page`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged with this many records
    Appended(usize),
    /// Another load is still outstanding; nothing was requested
    InFlight,
    /// The last page has already been merged
    Exhausted,
}

/// Read-only view of the session for rendering
#[derive(Clone, Debug)]
pub struct CatalogSnapshot {
    pub records: Vec<Arc<Record>>,
    pub artists: BTreeMap<ArtistId, Arc<Artist>>,
    pub loading: bool,
    pub search_loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
}

impl CatalogSnapshot {
    pub fn artist(&self, id: ArtistId) -> Option<&Arc<Artist>> {
        self.artists.get(&id)
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter().filter(|r| r.show)
    }
}

struct SessionState {
    store: CollectionStore,
    loading: bool,
    search_loading: bool,
    error: Option<String>,
    /// Bumped on every search input so a stale timer can't commit an old term
    search_generation: u64,
}

/// Clears `loading` if a load future is dropped before its fetch resolves.
struct LoadingGuard<'a> {
    state: &'a Mutex<SessionState>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            debug!("page load cancelled");
            state.loading = false;
        }
    }
}

pub struct CatalogSession<S: PageSource> {
    source: S,
    state: Arc<Mutex<SessionState>>,
    search: Debouncer,
}

impl<S: PageSource> CatalogSession<S> {
    pub fn new(source: S, first_page: impl Into<String>, search_delay: Duration) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(SessionState {
                store: CollectionStore::new(Some(first_page.into())),
                loading: false,
                search_loading: false,
                error: None,
                search_generation: 0,
            })),
            search: Debouncer::new(search_delay),
        }
    }

    /// Fetch the page at the current cursor and merge it.
    ///
    /// On failure nothing is merged, the cursor stays put and `error` is set,
    /// so calling this again retries the same page.
    pub async fn load_next_page(&self) -> Result<LoadOutcome, SessionError> {
        let cursor = {
            let mut state = self.state.lock().unwrap();
            if state.loading {
                debug!("page load already in flight");
                return Ok(LoadOutcome::InFlight);
            }
            let Some(cursor) = state.store.cursor().map(str::to_string) else {
                return Ok(LoadOutcome::Exhausted);
            };
            state.loading = true;
            state.error = None;
            cursor
        };

        let mut guard = LoadingGuard {
            state: &self.state,
            armed: true,
        };
        let result = self.source.fetch_page(&cursor).await;

        let mut state = self.state.lock().unwrap();
        guard.armed = false;
        state.loading = false;
        match result {
            Ok(page) => {
                let count = state.store.append_page(page.results, page.next_page);
                info!(
                    "merged {} records from {} ({} total, more: {})",
                    count,
                    cursor,
                    state.store.len(),
                    state.store.has_more()
                );
                Ok(LoadOutcome::Appended(count))
            }
            Err(e) => {
                warn!("failed to load page {}: {}", cursor, e);
                state.error = Some(FETCH_ERROR_MESSAGE.to_string());
                Err(SessionError::Fetch(e))
            }
        }
    }

    /// Re-request the page that last failed.
    pub async fn retry(&self) -> Result<LoadOutcome, SessionError> {
        self.load_next_page().await
    }

    /// Record a search keystroke. The term is applied once input has been
    /// quiet for the debounce delay. Must be called within a tokio runtime.
    pub fn search_input(&self, raw: &str) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            state.search_generation += 1;
            state.search_loading = true;
            state.search_generation
        };
        debug!("search {:?} scheduled in {:?}", raw, self.search.delay());

        let state = Arc::clone(&self.state);
        let query = raw.to_string();
        self.search.call(move || {
            let mut state = state.lock().unwrap();
            if state.search_generation != generation {
                return;
            }
            state.store.set_search_term(&query);
            state.search_loading = false;
        });
    }

    /// Apply `raw` right away, dropping any pending input.
    pub fn commit_search(&self, raw: &str) {
        self.search.cancel();
        let mut state = self.state.lock().unwrap();
        state.search_generation += 1;
        state.store.set_search_term(raw);
        state.search_loading = false;
    }

    /// Clear the search right away (escape key).
    pub fn reset_search(&self) {
        self.commit_search("");
    }

    pub fn save_record(&self, record: Record) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        state.store.update_record(record)?;
        Ok(())
    }

    pub fn save_artist(&self, artist: Artist) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        state.store.update_artist(artist)?;
        Ok(())
    }

    /// Apply a committed edit. Both parts are validated before either is applied.
    pub fn save_edit(&self, commit: EditCommit) -> Result<(), SessionError> {
        if let Some(record) = &commit.record {
            record.validate().map_err(StoreError::from)?;
        }
        if let Some(artist) = &commit.artist {
            artist.validate().map_err(StoreError::from)?;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(record) = &commit.record {
            if state.store.record(record.id).is_none() {
                return Err(StoreError::UnknownRecord(record.id).into());
            }
        }
        if let Some(artist) = &commit.artist {
            if state.store.artist(artist.id).is_none() {
                return Err(StoreError::UnknownArtist(artist.id).into());
            }
        }

        if let Some(record) = commit.record {
            state.store.update_record(record)?;
        }
        if let Some(artist) = commit.artist {
            state.store.update_artist(artist)?;
        }
        Ok(())
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().unwrap().store.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.lock().unwrap();
        CatalogSnapshot {
            records: state.store.records().to_vec(),
            artists: state.store.artists().clone(),
            loading: state.loading,
            search_loading: state.search_loading,
            error: state.error.clone(),
            has_more: state.store.has_more(),
        }
    }
}
