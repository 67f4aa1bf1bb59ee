use serde::Serialize;

pub(crate) const fn default_limit() -> i64 {
    100
}

/// Clamps a requested page to `skip >= 0` and `1 <= limit <= max_limit`.
pub(crate) fn window(skip: i64, limit: i64, max_limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(1, max_limit.max(1)))
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}
