//! Page-number pagination envelope.
//!
//! Query parameters: `page` (1-based, default 1) and `limit` (page size,
//! default [`DEFAULT_PAGE_SIZE`]). Responses wrap results in
//! `{count, next, previous, results}` with relative URLs preserving the
//! request's other query parameters.

use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};

use crate::domain::ports::PageWindow;

/// Default page size when the request carries no `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Page-number query parameters shared by all paginated endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// The 1-based page number, clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// The page size, clamped to at least 1.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// The limit/offset window handed to ports.
    pub fn window(&self) -> PageWindow {
        let limit = i64::from(self.limit());
        PageWindow {
            limit,
            offset: i64::from(self.page() - 1) * limit,
        }
    }
}

/// Pagination envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Rebuild the request URL with a different `page` value, keeping all other
/// query parameters intact.
fn page_url(req: &HttpRequest, page: u32) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(req.query_string().as_bytes()) {
        if key != "page" {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.append_pair("page", &page.to_string());
    format!("{}?{}", req.path(), serializer.finish())
}

/// Wrap one page of results in the envelope.
pub fn envelope<T>(req: &HttpRequest, query: PageQuery, count: i64, results: Vec<T>) -> Page<T> {
    let page = query.page();
    let window = query.window();
    let next = if window.offset + window.limit < count {
        Some(page_url(req, page + 1))
    } else {
        None
    };
    let previous = if page > 1 {
        Some(page_url(req, page - 1))
    } else {
        None
    };
    Page {
        count,
        next,
        previous,
        results,
    }
}
