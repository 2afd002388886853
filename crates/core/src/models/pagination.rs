//! Offset pagination block shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned next to list results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

impl Pagination {
    /// Offset of the following page, if there is one.
    #[must_use]
    pub fn next_offset(&self) -> Option<u64> {
        self.has_next.then(|| self.offset + u64::from(self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_offset() {
        let page = Pagination {
            total: 45,
            limit: 20,
            offset: 20,
            has_next: true,
            has_prev: true,
        };
        assert_eq!(page.next_offset(), Some(40));

        let last = Pagination {
            has_next: false,
            ..page
        };
        assert_eq!(last.next_offset(), None);
    }
}
