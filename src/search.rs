//! Search forms bound to the list endpoints.
//!
//! Each listing accepts one optional text parameter. When it carries
//! something other than whitespace, the listing is narrowed to rows whose
//! attribute contains it, ignoring case. The raw value is always echoed back
//! so a client can refill its search box.

use serde::{Deserialize, Serialize};

/// Longest query that still binds; anything longer is ignored
pub const MAX_QUERY_LENGTH: usize = 255;

/// Escape character used in generated `LIKE` patterns
pub const LIKE_ESCAPE: char = '\\';

/// The state of a search form as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundSearch {
    /// Query parameter name, e.g. `"name"`
    pub field: String,

    /// The value the request carried, or an empty string
    pub value: String,

    /// Hint shown in an empty search box
    pub placeholder: String,
}

/// Shared behaviour of the listing search forms
pub trait SearchForm {
    /// Query parameter this form reads
    const FIELD: &'static str;

    /// Hint shown in an empty search box
    const PLACEHOLDER: &'static str;

    /// The raw parameter value, if the request carried one
    fn raw(&self) -> Option<&str>;

    /// The query to filter on, or `None` when the listing stays unfiltered
    fn query(&self) -> Option<&str> {
        let query = self.raw()?.trim();
        if query.is_empty() || query.chars().count() > MAX_QUERY_LENGTH {
            None
        } else {
            Some(query)
        }
    }

    /// A `LIKE` pattern matching the query anywhere in the attribute
    ///
    /// Use with [`LIKE_ESCAPE`] so `%` and `_` in the query match literally.
    fn pattern(&self) -> Option<String> {
        self.query().map(contains_pattern)
    }

    /// Echo of the submitted value for the response
    fn bound(&self) -> BoundSearch {
        BoundSearch {
            field: Self::FIELD.to_string(),
            value: self.raw().unwrap_or_default().to_string(),
            placeholder: Self::PLACEHOLDER.to_string(),
        }
    }
}

/// Builds a `%...%` pattern with the `LIKE` metacharacters escaped
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Search form for the manufacturer listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerSearch {
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchForm for ManufacturerSearch {
    const FIELD: &'static str = "name";
    const PLACEHOLDER: &'static str = "Search by name";

    fn raw(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Search form for the driver listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSearch {
    #[serde(default)]
    pub username: Option<String>,
}

impl SearchForm for DriverSearch {
    const FIELD: &'static str = "username";
    const PLACEHOLDER: &'static str = "Search by username";

    fn raw(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Search form for the car listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSearch {
    #[serde(default)]
    pub model: Option<String>,
}

impl SearchForm for CarSearch {
    const FIELD: &'static str = "model";
    const PLACEHOLDER: &'static str = "Search by model";

    fn raw(&self) -> Option<&str> {
        self.model.as_deref()
    }
}
