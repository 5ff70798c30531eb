//! Search query and result types.

use serde::{Deserialize, Serialize};

use crate::config::search::DEFAULT_PER_PAGE;

/// Sort direction for search results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters of one search request.
///
/// Only `q` is required. Absent or blank optional parameters are never
/// serialized: the backend treats an explicitly empty filter differently
/// from a missing one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub doc_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn sorted_by(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(key.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Restrict results to documents modified in `[from, to]` (ISO dates).
    pub fn with_date_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Whether the query is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.q.trim().is_empty()
    }

    /// Requested page, 1-based.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size, falling back to the configured default.
    pub fn per_page(&self) -> u32 {
        self.per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Query-string pairs in wire order, omitting absent and blank values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        fn text(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        }

        let mut pairs = vec![("q", self.q.trim().to_string())];
        let optional = [
            ("page", self.page.map(|p| p.max(1).to_string())),
            ("per_page", self.per_page.filter(|n| *n > 0).map(|n| n.to_string())),
            ("sort_by", text(&self.sort_by)),
            ("sort_order", self.sort_order.map(|o| o.as_str().to_string())),
            ("doc_type", text(&self.doc_type)),
            ("date_from", text(&self.date_from)),
            ("date_to", text(&self.date_to)),
        ];
        pairs.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
        );
        pairs
    }
}

/// A single matched fragment inside a result document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Where the match was found (e.g. "title", "content")
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub line: u32,
}

/// One document returned by a search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub relevance_score: f64,
}

/// Paging metadata accompanying a result page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMeta {
    pub total: u64,
    pub total_matches: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl SearchMeta {
    /// Canonical empty state.
    pub fn zero(per_page: u32) -> Self {
        Self {
            total: 0,
            total_matches: 0,
            page: 1,
            per_page,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl Default for SearchMeta {
    fn default() -> Self {
        Self::zero(DEFAULT_PER_PAGE)
    }
}

/// Results and their metadata, always replaced together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResultSet {
    pub results: Vec<SearchResult>,
    pub meta: SearchMeta,
}

impl SearchResultSet {
    pub fn empty(per_page: u32) -> Self {
        Self {
            results: Vec::new(),
            meta: SearchMeta::zero(per_page),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Body of `GET /search`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_matches: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl SearchResponse {
    /// Split into a result set for the page that was requested.
    ///
    /// Fields the backend left at zero fall back to the request, and the
    /// page never holds more than `per_page` results.
    pub fn into_result_set(self, params: &SearchParams) -> SearchResultSet {
        let per_page = if self.per_page > 0 {
            self.per_page
        } else {
            params.per_page()
        };
        let page = if self.page > 0 { self.page } else { params.page() };

        let mut results = self.results;
        results.truncate(per_page as usize);

        SearchResultSet {
            results,
            meta: SearchMeta {
                total: self.total,
                total_matches: self.total_matches,
                page,
                per_page,
                total_pages: self.total_pages,
            },
        }
    }
}
