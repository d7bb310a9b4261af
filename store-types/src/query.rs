//! Query parameters, pagination and list pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Page size used until a caller asks for something else.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Wire representation (`"asc"` / `"desc"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseEnumError {
                field: "sort direction",
                value: s.to_string(),
            }),
        }
    }
}

/// The full set of parameters of a list request.
///
/// A feature keeps the last-applied set so that a re-fetch only has to name
/// what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Zero-based page to fetch.
    pub page_index: u32,
    /// Number of entities per page.
    pub page_size: u32,
    /// Field the collaborator sorts by.
    pub sort_field: String,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Optional free-form filter (search text, status, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl QueryParams {
    /// First page, default size, sorted by `sort_field`.
    pub fn new(sort_field: &str, sort_direction: SortDirection) -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: sort_field.to_string(),
            sort_direction,
            filter: None,
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Shallow merge: every field the patch names replaces ours.
    pub fn merged(&self, patch: &QueryPatch) -> Self {
        Self {
            page_index: patch.page_index.unwrap_or(self.page_index),
            page_size: patch.page_size.unwrap_or(self.page_size),
            sort_field: patch
                .sort_field
                .clone()
                .unwrap_or_else(|| self.sort_field.clone()),
            sort_direction: patch.sort_direction.unwrap_or(self.sort_direction),
            filter: match &patch.filter {
                Some(filter) => filter.clone(),
                None => self.filter.clone(),
            },
        }
    }
}

/// A partial [`QueryParams`]; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    /// New page index.
    pub page_index: Option<u32>,
    /// New page size.
    pub page_size: Option<u32>,
    /// New sort field.
    pub sort_field: Option<String>,
    /// New sort direction.
    pub sort_direction: Option<SortDirection>,
    /// `Some(None)` clears the filter, `Some(Some(_))` replaces it.
    pub filter: Option<Option<String>>,
}

impl QueryPatch {
    /// An empty patch (re-fetch with the stored parameters).
    pub fn none() -> Self {
        Self::default()
    }

    /// Patch only the page index.
    pub fn page(page_index: u32) -> Self {
        Self {
            page_index: Some(page_index),
            ..Self::default()
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the sort field and direction.
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort_field = Some(field.to_string());
        self.sort_direction = Some(direction);
        self
    }

    /// Replace the filter.
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(Some(filter.to_string()));
        self
    }

    /// Remove any filter.
    pub fn without_filter(mut self) -> Self {
        self.filter = Some(None);
        self
    }

    /// True if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<E> {
    /// Entities on this page, in collaborator order.
    pub content: Vec<E>,
    /// Total entities across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Zero-based index of this page.
    #[serde(rename = "number")]
    pub page_index: u32,
    /// Requested page size.
    #[serde(rename = "size")]
    pub page_size: u32,
}

impl<E> Page<E> {
    /// A page with nothing on it.
    pub fn empty(page_index: u32, page_size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            page_index,
            page_size,
        }
    }
}

/// Pagination as reported by the last successful list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (always `< total_pages` once `total_pages > 0`).
    pub page_index: u32,
    /// Page size.
    pub page_size: u32,
    /// Authoritative entity count.
    pub total_elements: u64,
    /// Number of pages.
    pub total_pages: u32,
}

impl Pagination {
    /// Zero pagination with the given page size.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
            total_elements: 0,
            total_pages: 0,
        }
    }

    /// Build from a page, clamping an out-of-range page index.
    pub fn from_page<E>(page: &Page<E>) -> Self {
        let page_index = if page.total_pages > 0 {
            page.page_index.min(page.total_pages - 1)
        } else {
            page.page_index
        };
        Self {
            page_index,
            page_size: page.page_size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }

    /// Whether the page index invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.total_pages == 0 || self.page_index < self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> QueryParams {
        QueryParams::new("addressId", SortDirection::Asc)
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let base = params();
        assert_eq!(base.merged(&QueryPatch::none()), base);
        assert!(QueryPatch::none().is_empty());
    }

    #[test]
    fn patch_replaces_only_named_fields() {
        let base = params().with_page_size(25);
        let merged = base.merged(&QueryPatch::page(2));

        assert_eq!(merged.page_index, 2);
        assert_eq!(merged.page_size, 25);
        assert_eq!(merged.sort_field, "addressId");
        assert_eq!(merged.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn filter_can_be_set_and_cleared() {
        let base = params();
        let filtered = base.merged(&QueryPatch::none().with_filter("Lyon"));
        assert_eq!(filtered.filter.as_deref(), Some("Lyon"));

        let kept = filtered.merged(&QueryPatch::page(1));
        assert_eq!(kept.filter.as_deref(), Some("Lyon"));

        let cleared = kept.merged(&QueryPatch::none().without_filter());
        assert_eq!(cleared.filter, None);
    }

    #[test]
    fn page_deserializes_server_field_names() {
        let json = r#"{
            "content": [1, 2],
            "totalElements": 12,
            "totalPages": 2,
            "number": 1,
            "size": 10,
            "empty": false
        }"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn pagination_clamps_out_of_range_page() {
        let page: Page<u32> = Page {
            content: vec![],
            total_elements: 20,
            total_pages: 2,
            page_index: 5,
            page_size: 10,
        };
        let pagination = Pagination::from_page(&page);
        assert_eq!(pagination.page_index, 1);
        assert!(pagination.is_consistent());
    }

    #[test]
    fn pagination_with_no_pages_is_consistent() {
        let pagination = Pagination::from_page(&Page::<u32>::empty(0, 10));
        assert_eq!(pagination.total_pages, 0);
        assert!(pagination.is_consistent());
    }

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
