use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Locally assigned record id. The first record ever appended gets 1.
pub type RecordId = u64;

/// Artist id as supplied by the upstream page data.
pub type ArtistId = i64;

/// Release year. Upstream sends numbers, the edit form submits text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    /// Any JSON number that isn't an integer literal, e.g. `1999.0`
    Float(f64),
    Text(String),
}

impl Year {
    /// Parse form input. Only canonical integer text becomes `Number`, so
    /// "007" or " 2001" stay exactly as typed.
    pub fn parse(input: &str) -> Self {
        match input.parse::<i64>() {
            Ok(n) if n.to_string() == input => Year::Number(n),
            _ => Year::Text(input.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Year::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            // f64 Display already drops a zero fraction: 1999.0 prints "1999"
            Year::Float(n) => write!(f, "{}", n),
            Year::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Year {
    fn from(n: i64) -> Self {
        Year::Number(n)
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year::Text(s.to_string())
    }
}

/// Artist as embedded in a page result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawArtist {
    pub id: ArtistId,
    pub name: String,
}

/// Denormalized record as it arrives from the page API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub album_title: String,
    pub year: Year,
    pub condition: String,
    pub artist: RawArtist,
}

/// One page of the paginated record listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<RawRecord>,
    /// Cursor for the following page. `None` on the last page.
    #[serde(rename = "nextPage", default)]
    pub next_page: Option<String>,
}

/// Normalized record held by the collection store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub album_title: String,
    pub year: Year,
    pub condition: String,
    /// Reference into the store's artists
    pub artist: ArtistId,
    /// Whether the record passes the active search filter
    pub show: bool,
}

impl Record {
    /// Reject the record if any editable field is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.album_title.is_empty() {
            return Err(ValidationError::EmptyField("album_title"));
        }
        if self.year.is_empty() {
            return Err(ValidationError::EmptyField("year"));
        }
        if self.condition.is_empty() {
            return Err(ValidationError::EmptyField("condition"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

impl Artist {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        Ok(())
    }
}

impl From<RawArtist> for Artist {
    fn from(raw: RawArtist) -> Self {
        Artist {
            id: raw.id,
            name: raw.name,
        }
    }
}

/// Edit rejected before it reached the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Values can't be empty!")]
    EmptyField(&'static str),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField(field) => field,
        }
    }
}
