//! Pagination shared between the gateway and the server.
//!
//! The REST surface uses offset-style `from`/`size` query parameters; the
//! storage layer pages with `page_index = from / size`.

use serde::Deserialize;

/// Validated pagination parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// index of the first element to return, >= 0
    pub from: u64,
    /// page size, >= 1
    pub size: u64,
}

impl Pagination {
    /// Convert to a (page index, page size) pair for the paginator.
    pub fn page(self) -> (u64, u64) {
        let size = self.size.max(1);
        (self.from / size, size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { from: 0, size: 20 }
    }
}

/// Raw `?from&size` query shape with the documented defaults.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub from: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    20
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        Self { from: q.from, size: q.size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_is_floor_of_from_over_size() {
        assert_eq!(Pagination { from: 0, size: 20 }.page(), (0, 20));
        assert_eq!(Pagination { from: 19, size: 20 }.page(), (0, 20));
        assert_eq!(Pagination { from: 20, size: 20 }.page(), (1, 20));
        assert_eq!(Pagination { from: 7, size: 3 }.page(), (2, 3));
    }

    #[test]
    fn zero_size_is_clamped() {
        assert_eq!(Pagination { from: 5, size: 0 }.page(), (5, 1));
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.from, 0);
        assert_eq!(d.size, 20);
    }
}
