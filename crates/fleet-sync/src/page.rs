use serde::Serialize;

use crate::provider::Paging;

/// Wire value the remote source uses for "count not computed on this pass".
pub const UNKNOWN_COUNT: i64 = -1;

/// Total number of matches on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TotalCount {
    Unknown,
    Known(usize),
}

impl TotalCount {
    /// Negative wire counts are treated as the unknown sentinel.
    pub fn from_wire(count: i64) -> Self {
        usize::try_from(count).map_or(Self::Unknown, Self::Known)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn known(self) -> Option<usize> {
        match self {
            Self::Known(count) => Some(count),
            Self::Unknown => None,
        }
    }

    /// Whether items may exist at or past `end`. Unknown is optimistic.
    pub fn has_more_after(self, end: usize) -> bool {
        match self {
            Self::Known(count) => end < count,
            Self::Unknown => true,
        }
    }
}

/// One page fetch: `limit` entities matching `filter_text`, starting at `skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub filter_text: String,
    pub skip: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(filter_text: impl Into<String>, skip: usize, limit: usize) -> Self {
        debug_assert!(limit > 0, "page limit must be positive");
        Self {
            filter_text: filter_text.into(),
            skip,
            limit,
        }
    }

    pub fn paging(&self) -> Paging {
        Paging {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: TotalCount,
}

impl<T> PageResult<T> {
    /// What a request returns when the user may not see any entity.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: TotalCount::Known(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire() {
        assert_eq!(TotalCount::from_wire(UNKNOWN_COUNT), TotalCount::Unknown);
        assert_eq!(TotalCount::from_wire(-7), TotalCount::Unknown);
        assert_eq!(TotalCount::from_wire(0), TotalCount::Known(0));
        assert_eq!(TotalCount::from_wire(42), TotalCount::Known(42));
    }

    #[test]
    fn test_has_more_after() {
        assert!(TotalCount::Known(5).has_more_after(4));
        assert!(!TotalCount::Known(5).has_more_after(5));
        assert!(!TotalCount::Known(5).has_more_after(6));
        assert!(TotalCount::Unknown.has_more_after(1_000));
    }

    #[test]
    fn test_request_paging() {
        let request = PageRequest::new("zoe", 4, 2);
        assert_eq!(request.paging(), Paging { skip: 4, limit: 2 });
    }
}
