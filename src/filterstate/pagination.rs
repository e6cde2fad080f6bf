//! # Pagination
//!
//! Page number and page size are read from the query on every render and are
//! never stored anywhere else. Both parsers are total: anything malformed
//! falls back to a default instead of producing an error.
//!
//! Bounding `page` against the number of results is left to whoever fetches
//! the data; this module only guarantees `page >= 1`.

use crate::codec::{update_params, FieldValue};
use crate::query::QueryState;
use serde::{Deserialize, Serialize};

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// The closed set of page sizes the list view offers.
pub const PAGE_SIZES: [u32; 5] = [10, 20, 30, 40, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const FIRST_PAGE: u32 = 1;

/// Parse a page number, falling back to `1` for anything that isn't a finite
/// number >= 1. Fractions truncate toward zero.
pub fn parse_page(raw: &str) -> u32 {
    match parse_number(raw) {
        // `as` saturates, so huge values clamp to u32::MAX
        Some(n) if n >= 1.0 => n.trunc() as u32,
        _ => FIRST_PAGE,
    }
}

/// Parse a page size, returning it only if it is one of [`PAGE_SIZES`].
pub fn parse_page_size(raw: &str) -> u32 {
    match parse_number(raw) {
        Some(n) => PAGE_SIZES
            .iter()
            .copied()
            .find(|size| f64::from(*size) == n)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        None => DEFAULT_PAGE_SIZE,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    /// Read `page` and `pageSize` from the query; absent params use defaults.
    pub fn from_query(query: &QueryState) -> Self {
        Self {
            page: query.first(PAGE_PARAM).map(parse_page).unwrap_or(FIRST_PAGE),
            page_size: query
                .first(PAGE_SIZE_PARAM)
                .map(parse_page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Move to `page`. Invalid page numbers are normalized before writing.
pub fn with_page(query: &QueryState, page: u32) -> QueryState {
    let page = FieldValue::One(page.max(FIRST_PAGE).to_string());
    update_params(query, [(PAGE_PARAM, &page)])
}

/// Change the page size and go back to the first page in the same write.
/// Sizes outside [`PAGE_SIZES`] fall back to the default.
pub fn with_page_size(query: &QueryState, size: u32) -> QueryState {
    let size = parse_page_size(&size.to_string());
    let size = FieldValue::One(size.to_string());
    let reset = FieldValue::Absent;
    update_params(query, [(PAGE_SIZE_PARAM, &size), (PAGE_PARAM, &reset)])
}
