use chrono::{DateTime, Utc};

/// A page of records ordered by creation time
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Builds a page from a result set fetched with `LIMIT limit + 1`
    pub fn from_overfetched(mut items: Vec<T>, limit: u16) -> Self {
        let limit = usize::from(limit);
        let has_more = items.len() > limit;
        items.truncate(limit);
        Self { items, has_more }
    }

    /// Cursor for the next page: creation time of the last record
    pub fn next_cursor(
        &self,
        get_created_at: impl Fn(&T) -> DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.items.last().map(get_created_at)
    }
}

pub(crate) fn overfetch_limit(limit: u16) -> i64 {
    i64::from(limit) + 1
}
