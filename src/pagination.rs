//! Page/limit normalization for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Clamp page to >= 1 and limit into [MIN_LIMIT, MAX_LIMIT]; offset = (page - 1) * limit.
pub fn validate_pagination_params(page: i64, limit: i64) -> PageParams {
    let page = page.max(1);
    let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);
    PageParams {
        page,
        limit,
        offset: (page - 1).saturating_mul(limit),
    }
}

/// Raw `?page=&limit=` query values. Unparseable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn normalize(&self) -> PageParams {
        let page = self
            .page
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PAGE);
        let limit = self
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_LIMIT);
        validate_pagination_params(page, limit)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(params: PageParams, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + params.limit - 1) / params.limit;
        Pagination {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(
            validate_pagination_params(-1, 100),
            PageParams { page: 1, limit: 50, offset: 0 }
        );
        assert_eq!(
            validate_pagination_params(0, 0),
            PageParams { page: 1, limit: 1, offset: 0 }
        );
    }

    #[test]
    fn computes_offset() {
        assert_eq!(
            validate_pagination_params(3, 5),
            PageParams { page: 3, limit: 5, offset: 10 }
        );
    }

    #[test]
    fn invariants_hold_over_a_range() {
        for page in -5..20 {
            for limit in -5..80 {
                let p = validate_pagination_params(page, limit);
                assert!(p.page >= 1);
                assert!((MIN_LIMIT..=MAX_LIMIT).contains(&p.limit));
                assert_eq!(p.offset, (p.page - 1) * p.limit);
            }
        }
    }

    #[test]
    fn query_defaults_and_garbage() {
        let q = PageQuery::default();
        assert_eq!(q.normalize(), PageParams { page: 1, limit: 10, offset: 0 });
        let q = PageQuery {
            page: Some("abc".into()),
            limit: Some(" 20 ".into()),
        };
        assert_eq!(q.normalize(), PageParams { page: 1, limit: 20, offset: 0 });
    }

    #[test]
    fn pagination_meta() {
        let meta = Pagination::new(validate_pagination_params(2, 10), 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let empty = Pagination::new(validate_pagination_params(1, 10), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }
}
