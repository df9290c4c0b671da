//! Inline edit form state for a single record and its artist

use crate::model::{Artist, Record, ValidationError, Year};

/// Editable field of the record form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    AlbumTitle,
    Year,
    Condition,
    ArtistName,
}

/// Result of a successful commit. Only changed entities are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditCommit {
    pub record: Option<Record>,
    pub artist: Option<Artist>,
}

impl EditCommit {
    /// Nothing was changed, so nothing needs saving.
    pub fn is_empty(&self) -> bool {
        self.record.is_none() && self.artist.is_none()
    }
}

/// Draft copies of a record and its artist while the user edits them.
///
/// Validation happens on commit. A rejected commit leaves the drafts in place
/// so the user can correct them.
#[derive(Debug, Clone)]
pub struct EditSession {
    original_record: Record,
    original_artist: Artist,
    record: Record,
    artist: Artist,
    error: Option<ValidationError>,
}

impl EditSession {
    pub fn begin(record: &Record, artist: &Artist) -> Self {
        Self {
            original_record: record.clone(),
            original_artist: artist.clone(),
            record: record.clone(),
            artist: artist.clone(),
            error: None,
        }
    }

    pub fn set_album_title(&mut self, value: &str) {
        self.record.album_title = value.to_string();
    }

    /// Re-entering the year as it is displayed keeps the original value.
    pub fn set_year(&mut self, value: &str) {
        self.record.year = if value == self.original_record.year.to_string() {
            self.original_record.year.clone()
        } else {
            Year::parse(value)
        };
    }

    pub fn set_condition(&mut self, value: &str) {
        self.record.condition = value.to_string();
    }

    pub fn set_artist_name(&mut self, value: &str) {
        self.artist.name = value.to_string();
    }

    pub fn set_field(&mut self, field: EditField, value: &str) {
        match field {
            EditField::AlbumTitle => self.set_album_title(value),
            EditField::Year => self.set_year(value),
            EditField::Condition => self.set_condition(value),
            EditField::ArtistName => self.set_artist_name(value),
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn artist(&self) -> &Artist {
        &self.artist
    }

    pub fn record_changed(&self) -> bool {
        self.record != self.original_record
    }

    pub fn artist_changed(&self) -> bool {
        self.artist != self.original_artist
    }

    /// Last validation failure, for display next to the form.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Validate the drafts and hand back whatever changed.
    pub fn commit(&mut self) -> Result<EditCommit, ValidationError> {
        self.error = None;
        let record_changed = self.record_changed();
        let artist_changed = self.artist_changed();
        if !record_changed && !artist_changed {
            return Ok(EditCommit::default());
        }

        if let Err(e) = self
            .record
            .validate()
            .and_then(|_| self.artist.validate())
        {
            self.error = Some(e.clone());
            return Err(e);
        }

        Ok(EditCommit {
            record: record_changed.then(|| self.record.clone()),
            artist: artist_changed.then(|| self.artist.clone()),
        })
    }

    /// Throw away all draft changes.
    pub fn cancel(&mut self) {
        self.record = self.original_record.clone();
        self.artist = self.original_artist.clone();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> EditSession {
        let record = Record {
            id: 1,
            album_title: "Album 1".into(),
            year: Year::Number(2001),
            condition: "poor".into(),
            artist: 0,
            show: true,
        };
        let artist = Artist {
            id: 0,
            name: "Artist 1".into(),
        };
        EditSession::begin(&record, &artist)
    }

    #[test]
    fn test_commit_all_fields() {
        let mut s = session();
        s.set_field(EditField::AlbumTitle, "Album changed");
        s.set_field(EditField::Year, "2000");
        s.set_field(EditField::ArtistName, "Artist changed");
        s.set_field(EditField::Condition, "condition_changed");

        let commit = s.commit().unwrap();
        assert_eq!(
            commit.record,
            Some(Record {
                id: 1,
                album_title: "Album changed".into(),
                year: Year::Number(2000),
                condition: "condition_changed".into(),
                artist: 0,
                show: true,
            })
        );
        assert_eq!(
            commit.artist,
            Some(Artist {
                id: 0,
                name: "Artist changed".into()
            })
        );
    }

    #[test]
    fn test_commit_only_record() {
        let mut s = session();
        s.set_album_title("Album changed");
        let commit = s.commit().unwrap();
        assert!(commit.record.is_some());
        assert!(commit.artist.is_none());
    }

    #[test]
    fn test_commit_only_artist() {
        let mut s = session();
        s.set_artist_name("Artist changed");
        let commit = s.commit().unwrap();
        assert!(commit.record.is_none());
        assert!(commit.artist.is_some());
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut s = session();
        s.set_album_title("Album 1");
        s.set_year("2001");
        assert!(s.commit().unwrap().is_empty());
    }

    #[test]
    fn test_year_reentered_as_displayed_is_not_a_change() {
        let record = Record {
            year: Year::Text("2001".into()),
            ..session().record().clone()
        };
        let mut s = EditSession::begin(&record, session().artist());
        s.set_year("2001");
        assert_eq!(s.record().year, Year::Text("2001".into()));
        assert!(!s.record_changed());

        s.set_year("007");
        assert_eq!(s.record().year.to_string(), "007");
        assert!(s.record_changed());
    }

    #[test]
    fn test_empty_value_rejected_and_session_stays_open() {
        let mut s = session();
        s.set_album_title("");
        let err = s.commit().unwrap_err();
        assert_eq!(err.to_string(), "Values can't be empty!");
        assert_eq!(s.error(), Some(&err));
        assert_eq!(s.record().album_title, "");

        s.set_album_title("Fixed");
        assert!(s.commit().unwrap().record.is_some());
        assert!(s.error().is_none());
    }

    #[test]
    fn test_empty_artist_blocks_record_change_too() {
        let mut s = session();
        s.set_condition("mint");
        s.set_artist_name("");
        assert!(s.commit().is_err());
    }

    #[test]
    fn test_cancel_restores_originals() {
        let mut s = session();
        s.set_album_title("Album changed");
        s.set_artist_name("");
        let _ = s.commit();
        s.cancel();
        assert_eq!(s.record().album_title, "Album 1");
        assert_eq!(s.artist().name, "Artist 1");
        assert!(s.error().is_none());
        assert!(!s.record_changed() && !s.artist_changed());
    }
}
