use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Paramètres bruts `?page=&page_size=`.
/// Gardés en String : une valeur illisible retombe sur le défaut au lieu d'un 400.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    /// page < 1 -> 1, page_size hors [1, 100] -> 20
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page as u64 };
        let page_size = if page_size < 1 || page_size as u64 > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            page_size as u64
        };

        Self { page, page_size }
    }

    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: u64| -> i64 {
            match raw {
                None => default as i64,
                Some(value) => value.trim().parse::<i64>().unwrap_or(0),
            }
        };

        Self::new(parse(page, DEFAULT_PAGE), parse(page_size, DEFAULT_PAGE_SIZE))
    }

    pub fn from_query(query: &PaginationQuery) -> Self {
        Self::from_raw(query.page.as_deref(), query.page_size.as_deref())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages: total_items.div_ceil(pagination.page_size),
        }
    }
}
