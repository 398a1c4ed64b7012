//! Strongly-typed client core for the GitHub REST API.
//!
//! # Overview
//! A `Request` declares one API call and the type its body decodes into.
//! `Session::send` turns any `Request` into an HTTP call on a worker thread,
//! classifies the response, and hands the completion handler either the
//! decoded value with its `Pagination` links or a `SessionError`.
//!
//! # Design
//! - Descriptors are plain values; defaults (base URL, `Accept` header, no
//!   query) come from the trait's provided methods.
//! - `Session` splits each call into `build_request` and `parse_response`
//!   around an injectable `Transport`, so both halves test without I/O.
//! - Every failure is one `SessionError` variant; nothing escapes unwrapped.
//! - The completion runs off the caller's thread. Callers that touch
//!   thread-affine state must redispatch inside the handler.

pub mod error;
pub mod http;
pub mod model;
pub mod pagination;
pub mod request;
pub mod search;
pub mod session;
pub mod transport;
pub mod types;

pub use error::{ErrorMessage, ResponseMetadata, SessionError, TransportError};
pub use http::{HeaderFields, HttpMethod, HttpRequest, HttpResponse, QueryParameters};
pub use model::SearchUserModel;
pub use pagination::Pagination;
pub use request::{Request, DEFAULT_BASE_URL};
pub use search::{Order, SearchUsersRequest, Sort};
pub use session::{AccessToken, Session, SessionBuilder, SessionResult, TaskHandle};
pub use transport::{Transport, UreqTransport};
pub use types::{ItemsResponse, User};
