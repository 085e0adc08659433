//! Wire and domain types shared across pawmatch: dog records, search pages,
//! opaque cursors, sort specification, and the match response.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A shelter dog as returned by `POST /dogs`. Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub zip_code: String,
    /// Image URL.
    pub img: String,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Opaque server-issued pagination token. Never constructed or parsed client-side,
/// only echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of search results: ordered ids, total hit count, and paging cursors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "resultIds")]
    pub ids: Vec<String>,
    pub total: u64,
    #[serde(default)]
    pub prev: Option<Cursor>,
    #[serde(default)]
    pub next: Option<Cursor>,
}

/// Where a search request goes: a serialized query, or a verbatim cursor echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Query-string pairs for `GET /dogs/search`. Keys may repeat.
    Query(Vec<(String, String)>),
    Cursor(Cursor),
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Fields the search backend can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Breed,
    Name,
    Age,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breed => "breed",
            Self::Name => "name",
            Self::Age => "age",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "breed" => Some(Self::Breed),
            "name" => Some(Self::Name),
            "age" => Some(Self::Age),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A complete sort specification. Always carries both a field and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

/// A single `setSort` token: either a direction or a field, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortToken {
    Field(SortField),
    Direction(SortDirection),
}

impl SortToken {
    pub fn parse(token: &str) -> Option<Self> {
        SortDirection::parse(token)
            .map(Self::Direction)
            .or_else(|| SortField::parse(token).map(Self::Field))
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Response of `POST /dogs/match`. `{}` means the server found no match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}
