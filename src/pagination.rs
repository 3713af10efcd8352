use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::BoundSearch;

/// Objects per page when the configuration does not say otherwise
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// `?page=` query parameter
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("That page number is less than 1")]
    LessThanOne,
    #[error("That page contains no results")]
    OutOfRange,
}

/// One page of a listing and where it sits among the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_paginated: bool,
}

impl Page {
    /// Resolves the requested page of `total` objects split `per_page` at a time.
    ///
    /// The first page always exists, even for an empty listing.
    pub fn new(total: i64, per_page: i64, requested: Option<i64>) -> Result<Self, PageError> {
        let per_page = per_page.max(1);
        let num_pages = if total <= 0 {
            1
        } else {
            (total - 1) / per_page + 1
        };
        let page = requested.unwrap_or(1);

        if page < 1 {
            return Err(PageError::LessThanOne);
        }
        if page > num_pages {
            return Err(PageError::OutOfRange);
        }

        Ok(Self {
            page,
            num_pages,
            per_page,
            total: total.max(0),
            has_next: page < num_pages,
            has_previous: page > 1,
            is_paginated: num_pages > 1,
        })
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Response body of every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<T> {
    /// The search form as submitted
    pub search_form: BoundSearch,

    /// Objects on this page
    pub object_list: Vec<T>,

    #[serde(flatten)]
    pub page: Page,
}

impl<T> ListPage<T> {
    pub fn new(search_form: BoundSearch, object_list: Vec<T>, page: Page) -> Self {
        Self {
            search_form,
            object_list,
            page,
        }
    }
}
