//! Pagination helper types for repository queries

use serde::{Deserialize, Serialize};

/// Page used when the caller supplies none or an invalid one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller supplies none or an invalid one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination request parameters
///
/// Deserialization goes through [`Paginator::new`], so missing or zero
/// values arrive as the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPaginator")]
pub struct Paginator {
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl Paginator {
    /// Create a new paginator. Zero values are replaced by the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::Paginator;
    ///
    /// let paginator = Paginator::new(2, 20);
    /// assert_eq!(paginator.offset(), 20);
    ///
    /// let defaulted = Paginator::new(0, 0);
    /// assert_eq!(defaulted, Paginator::default());
    /// ```
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Build a paginator from raw, possibly missing or malformed, parameters.
    ///
    /// Anything that is not a positive integer falls back to the defaults
    /// (page 1, size 10). Malformed input is never an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::Paginator;
    ///
    /// let paginator = Paginator::from_raw(Some("3"), Some("abc"));
    /// assert_eq!(paginator.page, 3);
    /// assert_eq!(paginator.page_size, 10);
    /// ```
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self::new(parse_positive(page), parse_positive(page_size))
    }

    /// Replace zero fields of a directly constructed paginator by the defaults.
    pub fn normalized(self) -> Self {
        Self::new(self.page, self.page_size)
    }

    /// Calculate the SQL OFFSET value
    pub fn offset(&self) -> u64 {
        let paginator = self.normalized();
        u64::from(paginator.page - 1) * u64::from(paginator.page_size)
    }

    /// Get the LIMIT value (page_size, or the default when zero)
    pub fn limit(&self) -> u32 {
        self.normalized().page_size
    }
}

#[derive(Deserialize)]
struct RawPaginator {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    page_size: u32,
}

impl From<RawPaginator> for Paginator {
    fn from(raw: RawPaginator) -> Self {
        Self::new(raw.page, raw.page_size)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Paginated response containing items and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Create a new paginated response
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::{Page, Paginator};
    ///
    /// let page = Page::new(vec![1, 2, 3], 25, Paginator::new(1, 10));
    ///
    /// assert_eq!(page.items.len(), 3);
    /// assert_eq!(page.total, 25);
    /// assert_eq!(page.total_pages, 3);
    /// ```
    pub fn new(items: Vec<T>, total: u64, paginator: Paginator) -> Self {
        let paginator = paginator.normalized();
        let total_pages = total.div_ceil(u64::from(paginator.page_size)) as u32;

        Self {
            items,
            total,
            page: paginator.page,
            total_pages,
            page_size: paginator.page_size,
        }
    }

    /// Check if there are more pages after the current one
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Check if there are pages before the current one
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Map the items to a different type
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginator_default() {
        let paginator = Paginator::default();
        assert_eq!(paginator.page, 1);
        assert_eq!(paginator.page_size, 10);
        assert_eq!(paginator.offset(), 0);
    }

    #[test]
    fn test_paginator_offset() {
        assert_eq!(Paginator::new(1, 20).offset(), 0);
        assert_eq!(Paginator::new(3, 20).offset(), 40);
        assert_eq!(Paginator::new(2, 10).limit(), 10);
    }

    #[test]
    fn test_paginator_from_raw_defaults() {
        assert_eq!(Paginator::from_raw(None, None), Paginator::default());
        assert_eq!(Paginator::from_raw(Some("x"), Some("")), Paginator::default());
        assert_eq!(Paginator::from_raw(Some("0"), Some("-5")), Paginator::default());
        assert_eq!(Paginator::from_raw(Some("2"), Some("25")), Paginator::new(2, 25));
        assert_eq!(Paginator::from_raw(Some(" 4 "), None), Paginator::new(4, 10));
    }

    #[test]
    fn test_paginator_deserialize_applies_defaults() {
        let zeroed: Paginator = serde_json::from_str(r#"{"page":0,"page_size":0}"#).unwrap();
        assert_eq!(zeroed, Paginator::default());

        let partial: Paginator = serde_json::from_str(r#"{"page":3}"#).unwrap();
        assert_eq!(partial, Paginator::new(3, 10));

        let explicit: Paginator = serde_json::from_str(r#"{"page":2,"page_size":25}"#).unwrap();
        assert_eq!(explicit, Paginator::new(2, 25));
    }

    #[test]
    fn test_directly_built_zero_paginator_uses_defaults() {
        let paginator = Paginator {
            page: 0,
            page_size: 0,
        };

        assert_eq!(paginator.limit(), 10);
        assert_eq!(paginator.offset(), 0);

        let page: Page<i32> = Page::new(Vec::new(), 25, paginator);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(vec![1, 2, 3], 25, Paginator::new(1, 10));

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_page_has_next_and_previous() {
        let page = Page::new(vec![1, 2, 3], 25, Paginator::new(1, 10));
        assert!(page.has_next());
        assert!(!page.has_previous());

        let page = Page::new(vec![1, 2, 3], 25, Paginator::new(3, 10));
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], 25, Paginator::new(1, 10));
        let mapped = page.map(|x| x * 2);

        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 25);
        assert_eq!(mapped.page, 1);
    }

    #[test]
    fn test_page_empty_total() {
        let page: Page<i32> = Page::new(Vec::new(), 0, Paginator::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }
}
