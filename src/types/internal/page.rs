/// Sort direction for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    /// Parse a direction string; anything other than "desc" sorts ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

/// Pagination parameters supplied by the transport layer.
///
/// Pages are 0-based. The sort field is matched against the entity's
/// columns by the store; unknown fields fall back to the id column.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_by: Option<String>,
    pub sort_dir: SortDir,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 20;
    pub const MAX_SIZE: u64 = 100;

    /// Build from raw query parameters, clamping the page size to 1..=100.
    pub fn from_query(
        page: Option<u64>,
        size: Option<u64>,
        sort_by: Option<String>,
        sort_dir: Option<String>,
    ) -> Self {
        let size = size.unwrap_or(Self::DEFAULT_SIZE).clamp(1, Self::MAX_SIZE);
        Self {
            page: page.unwrap_or(0),
            size,
            sort_by,
            sort_dir: SortDir::parse(sort_dir.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_dir_parse_is_case_insensitive() {
        assert_eq!(SortDir::parse(Some("DESC")), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("desc")), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("asc")), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("sideways")), SortDir::Asc);
        assert_eq!(SortDir::parse(None), SortDir::Asc);
    }

    #[test]
    fn test_page_request_clamps_size() {
        let req = PageRequest::from_query(None, Some(0), None, None);
        assert_eq!(req.size, 1);

        let req = PageRequest::from_query(None, Some(5000), None, None);
        assert_eq!(req.size, PageRequest::MAX_SIZE);

        let req = PageRequest::from_query(None, None, None, None);
        assert_eq!(req.size, PageRequest::DEFAULT_SIZE);
        assert_eq!(req.page, 0);
    }
}
