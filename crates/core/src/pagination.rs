//! Pagination limits for subscription listing.

/// Page size used when the client sends no usable limit.
pub const DEFAULT_PAGE_LIMIT: i64 = 15;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 99;

/// Clamp a user-provided limit.
///
/// Absent or non-positive values fall back to [`DEFAULT_PAGE_LIMIT`];
/// anything above [`MAX_PAGE_LIMIT`] is capped.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    }
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Lenient integer parsing for query strings: garbage counts as absent.
pub fn parse_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}
