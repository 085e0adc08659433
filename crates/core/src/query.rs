//! Accumulated filter/sort specification for a dog search.
//!
//! Every update is a pure `self -> Self` transformation. Absent filters mean
//! "unfiltered" and are omitted from the serialized query rather than sent empty.

use tracing::debug;

use crate::types::{Sort, SortToken};

/// Multi-value filters accepted by `/dogs/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterProperty {
    Breeds,
    ZipCodes,
}

impl FilterProperty {
    /// Query-string key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Breeds => "breeds",
            Self::ZipCodes => "zipCodes",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "breeds" | "breed" => Some(Self::Breeds),
            "zipCodes" | "zip_codes" | "zip_code" | "zip" => Some(Self::ZipCodes),
            _ => None,
        }
    }
}

/// Values for a multi-value filter, from a list or a comma-delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterValues(Vec<String>);

impl FilterValues {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for FilterValues {
    fn from(value: &str) -> Self {
        Self(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

impl From<String> for FilterValues {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for FilterValues {
    fn from(values: Vec<String>) -> Self {
        Self(values.into_iter().filter(|s| !s.trim().is_empty()).collect())
    }
}

impl From<&[&str]> for FilterValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().filter(|s| !s.trim().is_empty()).map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    breeds: Option<Vec<String>>,
    zip_codes: Option<Vec<String>>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    sort: Sort,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical default: `sort=breed:asc`, every filter absent.
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn breeds(&self) -> Option<&[String]> {
        self.breeds.as_deref()
    }

    pub fn zip_codes(&self) -> Option<&[String]> {
        self.zip_codes.as_deref()
    }

    pub fn age_range(&self) -> Option<(u32, u32)> {
        self.age_min.zip(self.age_max)
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// True when nothing but the default sort is set.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Replace a multi-value filter entirely. An empty value list removes it.
    pub fn with_filter(mut self, property: FilterProperty, values: impl Into<FilterValues>) -> Self {
        let values = values.into().into_vec();
        let slot = match property {
            FilterProperty::Breeds => &mut self.breeds,
            FilterProperty::ZipCodes => &mut self.zip_codes,
        };
        *slot = if values.is_empty() { None } else { Some(values) };
        self
    }

    /// Like [`with_filter`](Self::with_filter) but keyed by a property name;
    /// unknown names leave the state unchanged.
    pub fn with_named_filter(self, property: &str, values: impl Into<FilterValues>) -> Self {
        match FilterProperty::parse(property) {
            Some(p) => self.with_filter(p, values),
            None => {
                debug!(property, "ignoring unknown filter property");
                self
            }
        }
    }

    /// Set both age bounds at once. Reversed input is put in order.
    pub fn with_age_range(mut self, min: u32, max: u32) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.age_min = Some(lo);
        self.age_max = Some(hi);
        self
    }

    /// Apply a sort token: `asc`/`desc` change only the direction, a field name
    /// changes only the field. Anything else is ignored.
    pub fn with_sort(mut self, token: &str) -> Self {
        match SortToken::parse(token) {
            Some(SortToken::Direction(direction)) => self.sort.direction = direction,
            Some(SortToken::Field(field)) => self.sort.field = field,
            None => debug!(token, "ignoring unknown sort token"),
        }
        self
    }

    /// Serialize to `/dogs/search` query pairs: repeated `breeds` and `zipCodes`,
    /// then `ageMin`, `ageMax`, `sort`. Absent fields are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (property, values) in
            [(FilterProperty::Breeds, &self.breeds), (FilterProperty::ZipCodes, &self.zip_codes)]
        {
            if let Some(values) = values {
                pairs.extend(values.iter().map(|v| (property.key().to_string(), v.clone())));
            }
        }
        if let Some(min) = self.age_min {
            pairs.push(("ageMin".to_string(), min.to_string()));
        }
        if let Some(max) = self.age_max {
            pairs.push(("ageMax".to_string(), max.to_string()));
        }
        pairs.push(("sort".to_string(), self.sort.to_string()));
        pairs
    }
}
