use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=` / `?limit=` query parameters shared by the paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.limit())
    }
}

/// Paginated response envelope: `{ count, next, previous, results }` with
/// absolute-path links, the layout existing clients already consume.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn new(path: &str, query: &PageQuery, count: i64, results: Vec<T>) -> Self {
        let page = query.page();
        let limit = query.limit();

        let has_next = i64::from(page) * i64::from(limit) < count;
        let next = has_next.then(|| format!("{path}?page={}&limit={limit}", page + 1));
        let previous = (page > 1).then(|| format!("{path}?page={}&limit={limit}", page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}
