//! Page/limit query handling for the list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
pub const MAX_PAGE: u64 = 1_000_000_000;

/// `?page=&limit=` query parameters.
///
/// Both are optional. Out-of-range values are clamped rather than rejected:
/// page to `1..=MAX_PAGE`, limit to `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Number of records to skip before this page.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        Self {
            page: query.page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

/// One page of records as returned by a repository.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            total: self.total,
            request: self.request,
        })
    }
}

/// Page metadata serialised next to the items: `totalPages`, `currentPage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            total_pages: page.total_pages(),
            current_page: page.request.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::from(PageQuery::default());
        assert_eq!(request, PageRequest { page: 1, limit: 10 });
        assert_eq!(request.skip(), 0);
    }

    #[test]
    fn test_clamping() {
        let request = PageRequest::from(PageQuery { page: Some(0), limit: Some(1000) });
        assert_eq!(request, PageRequest { page: 1, limit: MAX_LIMIT });

        let request = PageRequest::from(PageQuery { page: Some(3), limit: Some(0) });
        assert_eq!(request, PageRequest { page: 3, limit: 1 });
        assert_eq!(request.skip(), 2);
    }

    #[test]
    fn test_huge_page_stays_in_range() {
        let request = PageRequest::from(PageQuery { page: Some(u64::MAX), limit: Some(100) });
        assert_eq!(request.page, MAX_PAGE);
        assert_eq!(request.skip(), (MAX_PAGE - 1) * 100);
        assert!(request.skip() <= i64::MAX as u64);

        let unclamped = PageRequest { page: u64::MAX, limit: MAX_LIMIT };
        assert_eq!(unclamped.skip(), u64::MAX);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page {
            items: vec![1, 2],
            total: 11,
            request: PageRequest { page: 2, limit: 5 },
        };
        assert_eq!(page.total_pages(), 3);

        let meta = PageMeta::from(&page);
        assert_eq!(meta.current_page, 2);

        let empty: Page<u8> = Page { items: vec![], total: 0, request: PageRequest { page: 1, limit: 10 } };
        assert_eq!(empty.total_pages(), 0);
    }
}
