//! `GET /search/users`.
//!
//! See <https://docs.github.com/en/rest/search/search#search-users>.

use crate::http::{HttpMethod, QueryParameters};
use crate::request::Request;
use crate::types::{ItemsResponse, User};

/// Field the search results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Followers,
    Repositories,
    Joined,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Followers => "followers",
            Sort::Repositories => "repositories",
            Sort::Joined => "joined",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Search users by `query`, optionally sorted and paged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUsersRequest {
    pub query: String,
    pub sort: Option<Sort>,
    pub order: Option<Order>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    base_url: Option<String>,
}

impl SearchUsersRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: None,
            order: None,
            page: None,
            per_page: None,
            base_url: None,
        }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Target another authority, e.g. a GitHub Enterprise host or a mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl Request for SearchUsersRequest {
    type Response = ItemsResponse<User>;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> &str {
        "/search/users"
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(crate::request::DEFAULT_BASE_URL)
    }

    fn query_parameters(&self) -> Option<QueryParameters> {
        let mut params = vec![("q".to_string(), Some(self.query.clone()))];
        if let Some(sort) = self.sort {
            params.push(("sort".to_string(), Some(sort.as_str().to_string())));
        }
        if let Some(order) = self.order {
            params.push(("order".to_string(), Some(order.as_str().to_string())));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), Some(page.to_string())));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), Some(per_page.to_string())));
        }
        Some(params)
    }
}
