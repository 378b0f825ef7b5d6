//! Page-number pagination for the superhero list.
//!
//! The list endpoint takes `page` and `limit` as raw query text, coerces
//! them to positive integers and reports neighbouring pages as ready-made
//! URLs so clients can follow them verbatim.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page used when `page` is absent or not a positive integer.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent or not a positive integer.
pub const DEFAULT_LIMIT: i64 = 5;

/// Upper bound on the page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Path of the list endpoint, used to build page URLs.
pub const LIST_PATH: &str = "/superheroes/all";

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Coerce a raw query value to a positive integer, falling back to `default`.
pub fn coerce_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Number of pages needed to show `total` records, `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// URL of a given page of the list endpoint.
pub fn page_url(page: i64, limit: i64) -> String {
    format!("{LIST_PATH}?page={page}&limit={limit}")
}

// ---------------------------------------------------------------------------
// PageRequest / PageWindow
// ---------------------------------------------------------------------------

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from raw `page` / `limit` query values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: coerce_positive(page, DEFAULT_PAGE),
            limit: coerce_positive(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Pagination metadata for this request given the total record count.
    pub fn window(&self, total: i64) -> PageWindow {
        let total_pages = total_pages(total, self.limit);

        let next_page_url =
            (self.page < total_pages).then(|| page_url(self.page + 1, self.limit));

        // The previous link must point at a page that exists.
        let prev_page_url = (self.page > 1 && self.page - 1 <= total_pages)
            .then(|| page_url(self.page - 1, self.limit));

        PageWindow {
            current_page: self.page,
            total_pages,
            next_page_url,
            prev_page_url,
        }
    }
}

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: i64,
    pub total_pages: i64,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
