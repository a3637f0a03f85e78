//! Listing window

use serde::Deserialize;

/// `limit`/`offset`/`query` from the listing endpoints
///
/// `limit` 0 means unbounded. `query` is a free-text filter; empty matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub query: String,
}

impl Paging {
    pub fn all() -> Self {
        Self::default()
    }

    /// Apply the window to an already sorted sequence
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset as usize);
        if self.limit == 0 {
            iter.collect()
        } else {
            iter.take(self.limit as usize).collect()
        }
    }

    /// SQLite `LIMIT` value (-1 is unbounded)
    pub fn sql_limit(&self) -> i64 {
        if self.limit == 0 {
            -1
        } else {
            i64::from(self.limit)
        }
    }

    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }
}
