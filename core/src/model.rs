//! Domain-facing adapter over `Session` for user search.
//!
//! Presentation code talks to `SearchUserModel` instead of the session so it
//! can be swapped for a stub. Errors are always passed through to the
//! completion; deciding what to show for them is the caller's job.

use crate::error::SessionError;
use crate::pagination::Pagination;
use crate::search::SearchUsersRequest;
use crate::session::{Session, TaskHandle};
use crate::types::User;

/// Fetches users matching a free-text query.
#[derive(Debug, Clone, Default)]
pub struct SearchUserModel {
    session: Session,
    base_url: Option<String>,
}

impl SearchUserModel {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            base_url: None,
        }
    }

    /// Send every search to `base_url` instead of the public API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// First page of users for `query`.
    pub fn fetch_users<F>(&self, query: &str, completion: F) -> Option<TaskHandle>
    where
        F: FnOnce(Result<Vec<User>, SessionError>) + Send + 'static,
    {
        self.fetch_users_page(self.request(query), move |result| {
            completion(result.map(|(users, _)| users))
        })
    }

    /// Users for an explicit search request, plus links to adjacent pages.
    pub fn fetch_users_page<F>(&self, request: SearchUsersRequest, completion: F) -> Option<TaskHandle>
    where
        F: FnOnce(Result<(Vec<User>, Pagination), SessionError>) + Send + 'static,
    {
        let request = match &self.base_url {
            Some(base_url) => request.with_base_url(base_url.clone()),
            None => request,
        };
        self.session.send(&request, move |result| {
            completion(result.map(|(response, pagination)| (response.items, pagination)))
        })
    }

    /// Search request for `query`. The base URL is applied on send.
    pub fn request(&self, query: &str) -> SearchUsersRequest {
        SearchUsersRequest::new(query)
    }
}
