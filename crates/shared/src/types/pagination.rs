//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-indexed).
    pub page: u64,
    /// Number of items per page.
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Creates a page request, rejecting sizes outside `1..=MAX_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns a human readable message when `size` is out of range.
    pub fn new(page: u64, size: u64) -> Result<Self, String> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }
        Ok(Self { page, size })
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parses a client supplied direction.
    ///
    /// Only `asc` (any case) sorts ascending; anything else sorts descending.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Page envelope returned by paginated endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in the current page.
    pub content: Vec<T>,
    /// Total number of matching items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Current page index (0-indexed).
    pub number: u64,
    /// Requested page size.
    pub size: u64,
}

impl<T> Page<T> {
    /// Creates a new page from one slice of results and the total match count.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };

        Self {
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
        }
    }

    /// Maps the page content while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
