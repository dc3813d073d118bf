//! Offset pagination utilities.
//!
//! Listing endpoints take raw `page`/`limit` query strings and clamp them
//! rather than rejecting them:
//! - `page` defaults to 1 and never drops below 1.
//! - `limit` defaults to 10, is capped at 100, and falls back to the default
//!   (not the floor) when it is below 1.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// A clamped page request.
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
    /// Builds a page request from already-parsed values.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        };

        let limit = match limit {
            Some(l) if l > MAX_LIMIT => MAX_LIMIT,
            Some(l) if l >= 1 => l,
            _ => DEFAULT_LIMIT,
        };

        Self { page, limit }
    }

    /// Builds a page request from raw query-string values.
    ///
    /// Only the leading integer counts, so `"2.5"` is 2 and `"10abc"` is 10.
    /// Values with no leading digits are treated as absent.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_lenient(page), parse_lenient(limit))
    }

    /// Row offset for the SQL `OFFSET` clause.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` rows.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }

    /// Builds the response metadata for `total` matching rows.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            current_page: self.page,
            limit: self.limit,
            total_pages: self.total_pages(total),
            total_guests: total,
        }
    }
}

/// Pagination block of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_guests: i64,
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    let value = raw?.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    // out of range saturates; the caller clamps anyway
    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::default(), req);
    }

    #[test]
    fn test_page_clamps_to_one() {
        assert_eq!(PageRequest::new(Some(0), None).page, 1);
        assert_eq!(PageRequest::new(Some(-7), None).page, 1);
        assert_eq!(PageRequest::new(Some(3), None).page, 3);
    }

    #[test]
    fn test_limit_boundaries() {
        assert_eq!(PageRequest::new(None, Some(0)).limit, 10);
        assert_eq!(PageRequest::new(None, Some(-5)).limit, 10);
        assert_eq!(PageRequest::new(None, Some(1)).limit, 1);
        assert_eq!(PageRequest::new(None, Some(100)).limit, 100);
        assert_eq!(PageRequest::new(None, Some(101)).limit, 100);
        assert_eq!(PageRequest::new(None, Some(1000)).limit, 100);
    }

    #[test]
    fn test_from_raw_lenient_parsing() {
        let req = PageRequest::from_raw(Some("2"), Some("25"));
        assert_eq!(req, PageRequest { page: 2, limit: 25 });

        let req = PageRequest::from_raw(Some("abc"), Some(""));
        assert_eq!(req, PageRequest { page: 1, limit: 10 });

        let req = PageRequest::from_raw(Some(" 4 "), Some("-5"));
        assert_eq!(req, PageRequest { page: 4, limit: 10 });
    }

    #[test]
    fn test_from_raw_takes_leading_integer() {
        let req = PageRequest::from_raw(Some("2.5"), Some("10abc"));
        assert_eq!(req, PageRequest { page: 2, limit: 10 });

        let req = PageRequest::from_raw(Some("+3"), Some("25 rows"));
        assert_eq!(req, PageRequest { page: 3, limit: 25 });

        let req = PageRequest::from_raw(Some("x2"), Some(".5"));
        assert_eq!(req, PageRequest { page: 1, limit: 10 });

        let req = PageRequest::from_raw(Some("-"), Some("99999999999999999999999"));
        assert_eq!(req, PageRequest { page: 1, limit: 100 });
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient(None), None);
        assert_eq!(parse_lenient(Some("  7")), Some(7));
        assert_eq!(parse_lenient(Some("-12px")), Some(-12));
        assert_eq!(parse_lenient(Some("1e3")), Some(1));
        assert_eq!(parse_lenient(Some("")), None);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
        assert_eq!(PageRequest::new(Some(2), Some(100)).offset(), 100);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(None, Some(10));
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(1), 1);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(11), 2);
        assert_eq!(req.total_pages(95), 10);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PageRequest::new(Some(2), Some(5)).meta(12);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["limit"], 5);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalGuests"], 12);
    }
}
